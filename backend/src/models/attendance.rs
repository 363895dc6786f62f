use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check_length;
use crate::api::{AttendanceId, SessionId, StudentId};

pub const MAX_NOTES_LEN: usize = 500;

/// One student's attendance mark for one session.
///
/// At most one row exists per `(student_id, session_id)`; storage enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub session_id: SessionId,
    pub registered_at: DateTime<Utc>,
    pub is_present: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub student_id: StudentId,
    pub session_id: SessionId,
    pub registered_at: DateTime<Utc>,
    pub is_present: bool,
    pub notes: Option<String>,
}

impl NewAttendance {
    /// A present mark stamped at `registered_at`.
    pub fn present(
        student_id: StudentId,
        session_id: SessionId,
        registered_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            student_id,
            session_id,
            registered_at,
            is_present: true,
            notes,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.notes {
            Some(notes) => check_length("notes", notes, MAX_NOTES_LEN),
            None => Ok(()),
        }
    }
}
