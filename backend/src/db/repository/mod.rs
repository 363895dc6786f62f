//! Persistence gateway traits.
//!
//! One trait per record collection, combined into [`FullRepository`] which
//! every backend gets through a blanket impl. Services and handlers only ever
//! see `dyn FullRepository`.

pub mod attendance;
pub mod course;
pub mod error;
pub mod health;
pub mod session;
pub mod student;

pub use attendance::AttendanceRepository;
pub use course::CourseRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult, UniqueConstraint};
pub use health::{HealthRepository, RecordCounts};
pub use session::SessionRepository;
pub use student::StudentRepository;

/// Everything a backend has to provide.
pub trait FullRepository:
    HealthRepository + StudentRepository + CourseRepository + SessionRepository + AttendanceRepository
{
}

impl<T> FullRepository for T where
    T: HealthRepository
        + StudentRepository
        + CourseRepository
        + SessionRepository
        + AttendanceRepository
{
}
