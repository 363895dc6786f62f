//! Persistence gateway.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  services / http handlers                               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ dyn FullRepository
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  repository: one trait per collection + errors          │
//! └───────────────────┬─────────────────────────────────────┘
//!          ┌──────────┴───────────┐
//!   LocalRepository        PostgresRepository
//!   (in-memory)            (Diesel + r2d2)
//! ```
//!
//! Backends are picked by [`RepositoryFactory`], from `repository.toml` or
//! from the environment.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AttendanceRepository, CourseRepository, ErrorContext, FullRepository, HealthRepository,
    RecordCounts, RepositoryError, RepositoryResult, SessionRepository, StudentRepository,
    UniqueConstraint,
};
pub use services::{health_check, seed_demo_data, statistics, SeedSummary};
