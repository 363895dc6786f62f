//! axum HTTP surface.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                              │
//! │  - path/query/body extraction                            │
//! │  - ServiceError -> status code + ApiError body           │
//! │  - CORS, compression, request tracing                    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  services (registration, reporting, catalog)             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  db (LocalRepository / PostgresRepository)               │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
