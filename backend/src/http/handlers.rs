//! HTTP handlers for the REST API.
//!
//! Handlers parse the request, call one service function and map the
//! result. Create endpoints answer 201, deletes 204.

use axum::{extract::State, http::StatusCode, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::dto::{
    AlertsQuery, DatabaseHealth, DetailedHealthResponse, HealthResponse, ReportsQuery,
    SessionsQuery, SystemInfo,
};
use super::error::AppError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::state::AppState;
use crate::api::{
    AlertRecord, AttendanceFilter, AttendanceId, AttendanceRecord, Course, CourseId,
    CourseReport, CourseUpdate, CourseWithSessions, NewCourse, NewSession, NewStudent,
    RegisterAttendanceRequest, Session, SessionId, SessionUpdate, Student, StudentId,
    StudentPortal,
};
use crate::db::services as db_services;
use crate::services::{self, catalog};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

fn created<T>(value: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(value)))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health and GET /api/health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo = state.repository.as_ref();
    let (database, statistics) = match db_services::health_check(repo).await {
        Ok(true) => (
            "connected".to_string(),
            db_services::statistics(repo).await.ok(),
        ),
        Ok(false) => ("disconnected".to_string(), None),
        Err(e) => (format!("error: {}", e), None),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        statistics,
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> HandlerResult<DetailedHealthResponse> {
    let repo = state.repository.as_ref();
    let database = match db_services::health_check(repo).await {
        Ok(true) => DatabaseHealth {
            status: "connected".to_string(),
            error: None,
            statistics: db_services::statistics(repo).await.ok(),
        },
        Ok(false) => DatabaseHealth {
            status: "disconnected".to_string(),
            error: None,
            statistics: None,
        },
        Err(e) => DatabaseHealth {
            status: "disconnected".to_string(),
            error: Some(e.to_string()),
            statistics: None,
        },
    };

    Ok(Json(DetailedHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        backend: state.backend.map(|b| b.as_str().to_string()),
        database,
        system: SystemInfo::current(),
    }))
}

// =============================================================================
// Students
// =============================================================================

/// GET /api/students and GET /api/attendance/students
pub async fn list_students(State(state): State<AppState>) -> HandlerResult<Vec<Student>> {
    Ok(Json(catalog::list_students(state.repository.as_ref()).await?))
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> HandlerResult<Student> {
    Ok(Json(catalog::get_student(state.repository.as_ref(), id).await?))
}

/// GET /api/students/by-code/{code}
pub async fn get_student_by_code(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> HandlerResult<Student> {
    Ok(Json(
        catalog::get_student_by_code(state.repository.as_ref(), &code).await?,
    ))
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewStudent>,
) -> CreatedResult<Student> {
    created(catalog::create_student(state.repository.as_ref(), state.clock.as_ref(), &body).await?)
}

/// PUT /api/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
    ApiJson(body): ApiJson<NewStudent>,
) -> HandlerResult<Student> {
    Ok(Json(
        catalog::update_student(state.repository.as_ref(), id, &body).await?,
    ))
}

/// DELETE /api/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<StatusCode, AppError> {
    catalog::delete_student(state.repository.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/students/{id}/courses-with-sessions
pub async fn get_student_portal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> HandlerResult<StudentPortal> {
    catalog::student_portal(state.repository.as_ref(), state.clock.as_ref(), id)
        .await
        .map(Json)
        .map_err(AppError::student_as_resource)
}

/// GET /api/students/{id}/attendance,
/// GET /api/attendance/student/{id}/history and
/// GET /api/reports/attendance/student/{id}
pub async fn get_student_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> HandlerResult<Vec<AttendanceRecord>> {
    services::get_student_history(state.repository.as_ref(), id)
        .await
        .map(Json)
        .map_err(AppError::student_as_resource)
}

// =============================================================================
// Courses
// =============================================================================

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> HandlerResult<Vec<CourseWithSessions>> {
    Ok(Json(catalog::list_courses(state.repository.as_ref()).await?))
}

/// GET /api/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> HandlerResult<CourseWithSessions> {
    Ok(Json(catalog::get_course(state.repository.as_ref(), id).await?))
}

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCourse>,
) -> CreatedResult<Course> {
    created(catalog::create_course(state.repository.as_ref(), state.clock.as_ref(), &body).await?)
}

/// PUT /api/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
    ApiJson(body): ApiJson<CourseUpdate>,
) -> HandlerResult<Course> {
    Ok(Json(
        catalog::update_course(state.repository.as_ref(), id, &body).await?,
    ))
}

/// DELETE /api/courses/{id} (soft delete)
pub async fn delete_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<StatusCode, AppError> {
    catalog::deactivate_course(state.repository.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sessions
// =============================================================================

/// GET /api/sessions?courseId=
pub async fn list_sessions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SessionsQuery>,
) -> HandlerResult<Vec<Session>> {
    Ok(Json(
        catalog::list_sessions(state.repository.as_ref(), query.course_id).await?,
    ))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> HandlerResult<Session> {
    Ok(Json(catalog::get_session(state.repository.as_ref(), id).await?))
}

/// GET /api/sessions/by-code/{code}
pub async fn get_session_by_code(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> HandlerResult<Session> {
    Ok(Json(
        catalog::get_session_by_code(state.repository.as_ref(), state.clock.as_ref(), &code)
            .await?,
    ))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewSession>,
) -> CreatedResult<Session> {
    let mut rng = StdRng::from_entropy();
    created(
        catalog::create_session(
            state.repository.as_ref(),
            state.clock.as_ref(),
            &mut rng,
            &body,
        )
        .await?,
    )
}

/// PUT /api/sessions/{id}
pub async fn update_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
    ApiJson(body): ApiJson<SessionUpdate>,
) -> HandlerResult<Session> {
    Ok(Json(
        catalog::update_session(state.repository.as_ref(), id, &body).await?,
    ))
}

/// DELETE /api/sessions/{id} (soft delete)
pub async fn delete_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> Result<StatusCode, AppError> {
    catalog::deactivate_session(state.repository.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Attendance
// =============================================================================

/// POST /api/attendance
pub async fn register_attendance(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterAttendanceRequest>,
) -> CreatedResult<AttendanceRecord> {
    created(
        services::register_attendance(state.repository.as_ref(), state.clock.as_ref(), &body)
            .await?,
    )
}

/// GET /api/attendance?courseId=&studentId=&sessionId=
pub async fn list_attendances(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<AttendanceFilter>,
) -> HandlerResult<Vec<AttendanceRecord>> {
    Ok(Json(
        services::get_attendances(state.repository.as_ref(), &filter).await?,
    ))
}

/// GET /api/attendance/{id}
pub async fn get_attendance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AttendanceId>,
) -> HandlerResult<AttendanceRecord> {
    Ok(Json(
        services::get_attendance_by_id(state.repository.as_ref(), id).await?,
    ))
}

/// DELETE /api/attendance/{id}
pub async fn delete_attendance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AttendanceId>,
) -> Result<StatusCode, AppError> {
    services::delete_attendance(state.repository.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/attendance/reports?courseId= (also /api/reports/attendance)
pub async fn get_reports(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportsQuery>,
) -> HandlerResult<Vec<CourseReport>> {
    Ok(Json(
        services::generate_reports(state.repository.as_ref(), query.course_id).await?,
    ))
}

/// GET /api/attendance/alerts?threshold= (also /api/reports/attendance/alerts)
pub async fn get_alerts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AlertsQuery>,
) -> HandlerResult<Vec<AlertRecord>> {
    let threshold = query.threshold.unwrap_or(state.alert_threshold);
    if !threshold.is_finite() {
        return Err(AppError::BadRequest(format!(
            "threshold must be a finite number, got {}",
            threshold
        )));
    }
    Ok(Json(
        services::generate_alerts(state.repository.as_ref(), threshold).await?,
    ))
}
