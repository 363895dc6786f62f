//! Student, course and session management plus the student portal view.

use std::collections::HashMap;

use log::{info, warn};
use rand::Rng;

use super::error::{ServiceError, ServiceResult};
use super::join_code::generate_join_code;
use crate::api::{
    AttendanceFilter, CourseId, CourseWithSessions, PortalCourse, PortalSession, SessionFilter,
    SessionId, StudentId, StudentPortal,
};
use crate::db::repository::FullRepository;
use crate::models::{
    Clock, Course, CourseUpdate, NewCourse, NewSession, NewStudent, Session, SessionUpdate,
    Student,
};

// -- students ---------------------------------------------------------------

pub async fn list_students(repo: &dyn FullRepository) -> ServiceResult<Vec<Student>> {
    Ok(repo.list_students().await?)
}

pub async fn get_student(repo: &dyn FullRepository, id: StudentId) -> ServiceResult<Student> {
    repo.get_student(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student", id))
}

pub async fn get_student_by_code(repo: &dyn FullRepository, code: &str) -> ServiceResult<Student> {
    repo.get_student_by_code(code)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student", code))
}

pub async fn create_student(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    student: &NewStudent,
) -> ServiceResult<Student> {
    student.validate().map_err(ServiceError::Validation)?;
    let created = repo.insert_student(student, clock.now()).await?;
    info!("Created student {} ({})", created.id, created.student_code);
    Ok(created)
}

pub async fn update_student(
    repo: &dyn FullRepository,
    id: StudentId,
    student: &NewStudent,
) -> ServiceResult<Student> {
    student.validate().map_err(ServiceError::Validation)?;
    Ok(repo.update_student(id, student).await?)
}

/// Hard delete; the student's attendances go with it.
pub async fn delete_student(repo: &dyn FullRepository, id: StudentId) -> ServiceResult<()> {
    if repo.delete_student(id).await? {
        info!("Deleted student {}", id);
        Ok(())
    } else {
        Err(ServiceError::not_found("Student", id))
    }
}

// -- courses ----------------------------------------------------------------

async fn with_active_sessions(
    repo: &dyn FullRepository,
    course: Course,
) -> ServiceResult<CourseWithSessions> {
    let sessions = repo
        .list_sessions(&SessionFilter::active().for_course(Some(course.id)))
        .await?;
    Ok(CourseWithSessions { course, sessions })
}

/// Active courses, each with its active sessions.
pub async fn list_courses(repo: &dyn FullRepository) -> ServiceResult<Vec<CourseWithSessions>> {
    let courses = repo.list_courses(true).await?;
    let sessions = repo.list_sessions(&SessionFilter::active()).await?;

    let mut by_course: HashMap<CourseId, Vec<Session>> = HashMap::new();
    for session in sessions {
        by_course.entry(session.course_id).or_default().push(session);
    }

    Ok(courses
        .into_iter()
        .map(|course| CourseWithSessions {
            sessions: by_course.remove(&course.id).unwrap_or_default(),
            course,
        })
        .collect())
}

/// A course by id, active or not, with its active sessions.
pub async fn get_course(
    repo: &dyn FullRepository,
    id: CourseId,
) -> ServiceResult<CourseWithSessions> {
    let course = repo
        .get_course(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course", id))?;
    with_active_sessions(repo, course).await
}

pub async fn create_course(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    course: &NewCourse,
) -> ServiceResult<Course> {
    course.validate().map_err(ServiceError::Validation)?;
    let created = repo.insert_course(course, clock.now()).await?;
    info!("Created course {} ({})", created.id, created.code);
    Ok(created)
}

pub async fn update_course(
    repo: &dyn FullRepository,
    id: CourseId,
    course: &CourseUpdate,
) -> ServiceResult<Course> {
    course.validate().map_err(ServiceError::Validation)?;
    Ok(repo.update_course(id, course).await?)
}

/// Soft delete: the course stays queryable by id but leaves every listing.
pub async fn deactivate_course(repo: &dyn FullRepository, id: CourseId) -> ServiceResult<()> {
    if repo.deactivate_course(id).await? {
        info!("Deactivated course {}", id);
        Ok(())
    } else {
        Err(ServiceError::not_found("Course", id))
    }
}

// -- sessions ---------------------------------------------------------------

/// Active sessions, optionally of one course, by date then start time.
pub async fn list_sessions(
    repo: &dyn FullRepository,
    course_id: Option<CourseId>,
) -> ServiceResult<Vec<Session>> {
    Ok(repo
        .list_sessions(&SessionFilter::active().for_course(course_id))
        .await?)
}

pub async fn get_session(repo: &dyn FullRepository, id: SessionId) -> ServiceResult<Session> {
    repo.get_session(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Session", id))
}

/// Resolve a join code the way a student would before registering.
///
/// Unknown and inactive codes are not found; a session not dated today is
/// [`ServiceError::SessionNotActiveToday`].
pub async fn get_session_by_code(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    code: &str,
) -> ServiceResult<Session> {
    let session = repo
        .get_session_by_code(code)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| ServiceError::not_found("Session", code))?;

    if !session.is_open_on(clock.today()) {
        return Err(ServiceError::SessionNotActiveToday);
    }
    Ok(session)
}

async fn require_course(repo: &dyn FullRepository, id: CourseId) -> ServiceResult<()> {
    match repo.get_course(id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Validation(format!("Course {} does not exist", id))),
    }
}

/// Create a session, generating a join code when none is given.
pub async fn create_session<R>(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    rng: &mut R,
    session: &NewSession,
) -> ServiceResult<Session>
where
    R: Rng + Send,
{
    session.validate().map_err(ServiceError::Validation)?;
    require_course(repo, session.course_id).await?;

    let mut session = session.clone();
    if session.unique_code.is_none() {
        session.unique_code = Some(generate_join_code(repo, rng).await?);
    }

    let created = repo.insert_session(&session, clock.now()).await?;
    info!(
        "Created session {} for course {} with code {}",
        created.id, created.course_id, created.unique_code
    );
    Ok(created)
}

pub async fn update_session(
    repo: &dyn FullRepository,
    id: SessionId,
    session: &SessionUpdate,
) -> ServiceResult<Session> {
    session.validate().map_err(ServiceError::Validation)?;
    require_course(repo, session.course_id).await?;
    Ok(repo.update_session(id, session).await?)
}

pub async fn deactivate_session(repo: &dyn FullRepository, id: SessionId) -> ServiceResult<()> {
    if repo.deactivate_session(id).await? {
        info!("Deactivated session {}", id);
        Ok(())
    } else {
        Err(ServiceError::not_found("Session", id))
    }
}

// -- portal -----------------------------------------------------------------

/// The student's active courses with their upcoming active sessions
/// (dated today or later) and the student's mark on each.
pub async fn student_portal(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    student_id: StudentId,
) -> ServiceResult<StudentPortal> {
    let student = repo.get_student(student_id).await?.ok_or_else(|| {
        warn!("Portal requested for unknown student {}", student_id);
        ServiceError::StudentNotFound
    })?;

    let today = clock.today();
    let courses = repo.list_courses(true).await?;
    let upcoming: Vec<Session> = repo
        .list_sessions(&SessionFilter::active())
        .await?
        .into_iter()
        .filter(|s| s.date >= today)
        .collect();
    let attendances: HashMap<SessionId, _> = repo
        .list_attendances(&AttendanceFilter::for_student(student_id))
        .await?
        .into_iter()
        .map(|a| (a.session_id, a))
        .collect();

    let portal_courses = courses
        .iter()
        .filter_map(|course| {
            let sessions: Vec<PortalSession> = upcoming
                .iter()
                .filter(|s| s.course_id == course.id)
                .map(|s| PortalSession::new(s, today, attendances.get(&s.id)))
                .collect();
            (!sessions.is_empty()).then(|| PortalCourse::new(course, sessions))
        })
        .collect();

    Ok(StudentPortal {
        student,
        courses: portal_courses,
    })
}
