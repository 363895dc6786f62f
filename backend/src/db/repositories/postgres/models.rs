use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{attendances, courses, sessions, students};
use crate::api::{
    Attendance, AttendanceId, Course, CourseId, Session, SessionId, Student, StudentId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_code: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape; also used as the changeset for full-replace updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = students)]
pub struct StudentValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_code: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudentRow {
    #[diesel(embed)]
    pub values: StudentValues,
    pub created_at: DateTime<Utc>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: StudentId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            student_code: row.student_code,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: String,
    pub instructor_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow {
    pub name: String,
    pub code: String,
    pub description: String,
    pub instructor_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = courses)]
pub struct CourseChanges {
    pub name: String,
    pub code: String,
    pub description: String,
    pub instructor_name: String,
    pub is_active: bool,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: CourseId(row.id),
            name: row.name,
            code: row.code,
            description: row.description,
            instructor_name: row.instructor_name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub unique_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSessionRow {
    pub course_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub unique_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// `unique_code: None` leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sessions)]
pub struct SessionChanges {
    pub course_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub unique_code: Option<String>,
    pub is_active: bool,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId(row.id),
            course_id: CourseId(row.course_id),
            title: row.title,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            unique_code: row.unique_code,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendanceRow {
    pub id: i64,
    pub student_id: i64,
    pub session_id: i64,
    pub registered_at: DateTime<Utc>,
    pub is_present: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendances)]
pub struct NewAttendanceRow {
    pub student_id: i64,
    pub session_id: i64,
    pub registered_at: DateTime<Utc>,
    pub is_present: bool,
    pub notes: Option<String>,
}

impl From<AttendanceRow> for Attendance {
    fn from(row: AttendanceRow) -> Self {
        Attendance {
            id: AttendanceId(row.id),
            student_id: StudentId(row.student_id),
            session_id: SessionId(row.session_id),
            registered_at: row.registered_at,
            is_present: row.is_present,
            notes: row.notes,
        }
    }
}
