use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AttendanceId, CourseId, SessionId, StudentId};
use crate::models::{Attendance, Course, Session, Student};

/// Attendance row joined with its student, session and course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub session_id: SessionId,
    pub session_title: String,
    pub course_code: String,
    pub course_name: String,
    pub registered_at: DateTime<Utc>,
    pub is_present: bool,
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn compose(
        attendance: &Attendance,
        student: &Student,
        session: &Session,
        course: &Course,
    ) -> Self {
        Self {
            id: attendance.id,
            student_id: student.id,
            student_name: student.full_name(),
            student_code: student.student_code.clone(),
            session_id: session.id,
            session_title: session.title.clone(),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            registered_at: attendance.registered_at,
            is_present: attendance.is_present,
            notes: attendance.notes.clone(),
        }
    }
}

/// Body of `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendanceRequest {
    pub student_id: StudentId,
    pub session_code: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Conjunctive filter over attendance rows; `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilter {
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub student_id: Option<StudentId>,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl AttendanceFilter {
    pub fn for_student(student_id: StudentId) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    pub fn for_course(course_id: CourseId) -> Self {
        Self {
            course_id: Some(course_id),
            ..Default::default()
        }
    }

    /// Match a row given the course that owns its session.
    pub fn matches(&self, attendance: &Attendance, session_course: CourseId) -> bool {
        self.course_id.is_none_or(|c| c == session_course)
            && self.student_id.is_none_or(|s| s == attendance.student_id)
            && self.session_id.is_none_or(|s| s == attendance.session_id)
    }
}
