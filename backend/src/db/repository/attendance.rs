//! Attendance storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{
    Attendance, AttendanceFilter, AttendanceId, NewAttendance, SessionId, StudentId,
};

/// Repository trait for attendance marks.
///
/// # Atomicity
/// `insert_attendance` must reject a second row for the same
/// `(student_id, session_id)` with
/// `ConstraintViolation(AttendanceStudentSession)`, even when two inserts race.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert a mark. Unknown student or session is a `ValidationError`.
    async fn insert_attendance(&self, attendance: &NewAttendance)
        -> RepositoryResult<Attendance>;

    async fn get_attendance(&self, id: AttendanceId) -> RepositoryResult<Option<Attendance>>;

    async fn find_attendance(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> RepositoryResult<Option<Attendance>>;

    /// Rows matching every given filter, ascending by id (insertion order).
    async fn list_attendances(
        &self,
        filter: &AttendanceFilter,
    ) -> RepositoryResult<Vec<Attendance>>;

    async fn delete_attendance(&self, id: AttendanceId) -> RepositoryResult<bool>;
}
