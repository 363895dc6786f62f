//! Public API surface for the attendance backend.
//!
//! This file consolidates the identifier types and the DTOs exchanged over
//! the HTTP API. All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    Attendance, Course, CourseUpdate, NewAttendance, NewCourse, NewSession, NewStudent, Session,
    SessionUpdate, Student,
};
pub use crate::routes::attendance::{AttendanceFilter, AttendanceRecord, RegisterAttendanceRequest};
pub use crate::routes::catalog::{CourseWithSessions, SessionFilter};
pub use crate::routes::portal::{AttendanceStatus, PortalCourse, PortalSession, StudentPortal};
pub use crate::routes::reports::{
    AlertLevel, AlertRecord, CourseReport, StudentAttendanceSummary, DEFAULT_ALERT_THRESHOLD,
};

crate::define_id_type!(i64, StudentId, "Student identifier (database primary key).");
crate::define_id_type!(i64, CourseId, "Course identifier (database primary key).");
crate::define_id_type!(i64, SessionId, "Session identifier (database primary key).");
crate::define_id_type!(i64, AttendanceId, "Attendance identifier (database primary key).");
