//! Attendance registration and attendance queries.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::error::{ServiceError, ServiceResult};
use crate::api::{
    AttendanceFilter, AttendanceId, AttendanceRecord, CourseId, RegisterAttendanceRequest,
    SessionId, StudentId,
};
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{Attendance, Clock, Course, NewAttendance, Session, Student};

/// Register a student's presence for the session identified by its join code.
///
/// Checks run in order and the first failure wins: the code must match an
/// active session, the session must be dated today, the student must exist,
/// and the pair must not already be registered. A uniqueness violation on
/// insert (a concurrent registration that slipped past the lookup) is
/// reported as [`ServiceError::DuplicateAttendance`] too.
pub async fn register_attendance(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    request: &RegisterAttendanceRequest,
) -> ServiceResult<AttendanceRecord> {
    let code = request.session_code.as_str();

    let session = match repo.get_session_by_code(code).await? {
        Some(session) if session.is_active => session,
        _ => {
            warn!("Rejected registration: no active session with code {:?}", code);
            return Err(ServiceError::InvalidSessionCode);
        }
    };

    let today = clock.today();
    if !session.is_open_on(today) {
        warn!(
            "Rejected registration: session {} is dated {}, today is {}",
            session.id, session.date, today
        );
        return Err(ServiceError::SessionNotActiveToday);
    }

    let student = repo
        .get_student(request.student_id)
        .await?
        .ok_or_else(|| {
            warn!("Rejected registration: student {} not found", request.student_id);
            ServiceError::StudentNotFound
        })?;

    if repo
        .find_attendance(student.id, session.id)
        .await?
        .is_some()
    {
        warn!(
            "Rejected registration: student {} already registered for session {}",
            student.id, session.id
        );
        return Err(ServiceError::DuplicateAttendance);
    }

    let new_attendance = NewAttendance::present(
        student.id,
        session.id,
        clock.now(),
        request.notes.clone(),
    );
    new_attendance.validate().map_err(ServiceError::Validation)?;

    let attendance = repo.insert_attendance(&new_attendance).await?;
    let course = load_course(repo, session.course_id).await?;

    info!(
        "Registered attendance {} for student {} in session {}",
        attendance.id, student.id, session.id
    );
    Ok(AttendanceRecord::compose(
        &attendance,
        &student,
        &session,
        &course,
    ))
}

/// Attendance rows matching every given filter, in insertion order.
pub async fn get_attendances(
    repo: &dyn FullRepository,
    filter: &AttendanceFilter,
) -> ServiceResult<Vec<AttendanceRecord>> {
    let rows = repo.list_attendances(filter).await?;
    debug!("Attendance query {:?} matched {} rows", filter, rows.len());
    compose_all(repo, rows).await
}

pub async fn get_attendance_by_id(
    repo: &dyn FullRepository,
    id: AttendanceId,
) -> ServiceResult<AttendanceRecord> {
    let attendance = repo
        .get_attendance(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Attendance", id))?;
    let mut records = compose_all(repo, vec![attendance]).await?;
    records
        .pop()
        .ok_or_else(|| ServiceError::not_found("Attendance", id))
}

/// Every attendance of one student, newest registration first.
pub async fn get_student_history(
    repo: &dyn FullRepository,
    student_id: StudentId,
) -> ServiceResult<Vec<AttendanceRecord>> {
    if repo.get_student(student_id).await?.is_none() {
        return Err(ServiceError::StudentNotFound);
    }

    let mut rows = repo
        .list_attendances(&AttendanceFilter::for_student(student_id))
        .await?;
    rows.sort_by(|a, b| {
        b.registered_at
            .cmp(&a.registered_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    compose_all(repo, rows).await
}

pub async fn delete_attendance(repo: &dyn FullRepository, id: AttendanceId) -> ServiceResult<()> {
    if repo.delete_attendance(id).await? {
        info!("Deleted attendance {}", id);
        Ok(())
    } else {
        Err(ServiceError::not_found("Attendance", id))
    }
}

async fn load_course(repo: &dyn FullRepository, id: CourseId) -> ServiceResult<Course> {
    repo.get_course(id).await?.ok_or_else(|| {
        RepositoryError::internal(format!("Session references missing course {}", id)).into()
    })
}

/// Join attendance rows with their student, session and course, loading each
/// related record once.
async fn compose_all(
    repo: &dyn FullRepository,
    rows: Vec<Attendance>,
) -> ServiceResult<Vec<AttendanceRecord>> {
    let mut students: HashMap<StudentId, Student> = HashMap::new();
    let mut sessions: HashMap<SessionId, Session> = HashMap::new();
    let mut courses: HashMap<CourseId, Course> = HashMap::new();
    let mut records = Vec::with_capacity(rows.len());

    for attendance in &rows {
        if !students.contains_key(&attendance.student_id) {
            let student = repo.get_student(attendance.student_id).await?.ok_or_else(|| {
                RepositoryError::internal(format!(
                    "Attendance {} references missing student {}",
                    attendance.id, attendance.student_id
                ))
            })?;
            students.insert(student.id, student);
        }
        if !sessions.contains_key(&attendance.session_id) {
            let session = repo.get_session(attendance.session_id).await?.ok_or_else(|| {
                RepositoryError::internal(format!(
                    "Attendance {} references missing session {}",
                    attendance.id, attendance.session_id
                ))
            })?;
            sessions.insert(session.id, session);
        }

        let session = &sessions[&attendance.session_id];
        if !courses.contains_key(&session.course_id) {
            let course = load_course(repo, session.course_id).await?;
            courses.insert(course.id, course);
        }

        records.push(AttendanceRecord::compose(
            attendance,
            &students[&attendance.student_id],
            session,
            &courses[&session.course_id],
        ));
    }

    Ok(records)
}
