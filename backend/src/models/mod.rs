//! Domain entities stored by the persistence gateway.
//!
//! Each entity comes with a `New*` insert shape and, where the record is
//! editable, an update shape. Field limits mirror the storage schema.

pub mod attendance;
pub mod course;
pub mod macros;
pub mod session;
pub mod student;
pub mod time;

pub use attendance::{Attendance, NewAttendance};
pub use course::{Course, CourseUpdate, NewCourse};
pub use session::{NewSession, Session, SessionUpdate};
pub use student::{NewStudent, Student};
pub use time::{Clock, FixedClock, SystemClock};

/// Check a required text field: non-blank and at most `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    check_length(field, value, max)
}

/// Check an optional text field against its maximum length.
pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}
