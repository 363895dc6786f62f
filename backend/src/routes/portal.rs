//! Student-facing view: upcoming sessions per course with the student's mark.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{CourseId, SessionId};
use crate::models::{Attendance, Course, Session, Student};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPortal {
    pub student: Student,
    pub courses: Vec<PortalCourse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalCourse {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub instructor_name: String,
    pub sessions: Vec<PortalSession>,
}

impl PortalCourse {
    pub fn new(course: &Course, sessions: Vec<PortalSession>) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            code: course.code.clone(),
            description: course.description.clone(),
            instructor_name: course.instructor_name.clone(),
            sessions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSession {
    pub id: SessionId,
    pub title: String,
    pub unique_code: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_today: bool,
    pub is_active: bool,
    pub attendance_status: Option<AttendanceStatus>,
}

impl PortalSession {
    pub fn new(session: &Session, today: NaiveDate, attendance: Option<&Attendance>) -> Self {
        Self {
            id: session.id,
            title: session.title.clone(),
            unique_code: session.unique_code.clone(),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            is_today: session.is_open_on(today),
            is_active: session.is_active,
            attendance_status: attendance.map(AttendanceStatus::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    pub is_present: bool,
    pub registered_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<&Attendance> for AttendanceStatus {
    fn from(attendance: &Attendance) -> Self {
        Self {
            is_present: attendance.is_present,
            registered_at: attendance.registered_at,
            notes: attendance.notes.clone(),
        }
    }
}
