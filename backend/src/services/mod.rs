//! Service layer.
//!
//! Sits between the HTTP handlers and the repository. Services take a
//! `&dyn FullRepository` plus whatever collaborators they need (a [`Clock`],
//! an RNG) and return [`ServiceError`] kinds that the handlers translate to
//! status codes.
//!
//! [`Clock`]: crate::models::Clock

pub mod catalog;
pub mod error;
pub mod join_code;
pub mod registration;
pub mod reporting;

#[cfg(test)]
mod catalog_tests;

pub use error::{ServiceError, ServiceResult};
pub use join_code::generate_join_code;
pub use registration::{
    delete_attendance, get_attendance_by_id, get_attendances, get_student_history,
    register_attendance,
};
pub use reporting::{
    compute_alerts, compute_course_report, generate_alerts, generate_reports, round_rate,
};
