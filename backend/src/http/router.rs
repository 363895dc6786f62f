//! Route table and middleware.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// `/health` plus the `/api` tree, wrapped in compression, tracing and CORS.
pub fn create_router(state: AppState) -> Router {
    // Browser clients are served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/detailed", get(handlers::health_detailed))
        // Students
        .route(
            "/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/students/{id}",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route("/students/by-code/{code}", get(handlers::get_student_by_code))
        .route(
            "/students/{id}/courses-with-sessions",
            get(handlers::get_student_portal),
        )
        .route("/students/{id}/attendance", get(handlers::get_student_history))
        // Courses
        .route(
            "/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        // Sessions
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::get_session)
                .put(handlers::update_session)
                .delete(handlers::delete_session),
        )
        .route("/sessions/by-code/{code}", get(handlers::get_session_by_code))
        // Attendance
        .route(
            "/attendance",
            get(handlers::list_attendances).post(handlers::register_attendance),
        )
        .route("/attendance/students", get(handlers::list_students))
        .route("/attendance/reports", get(handlers::get_reports))
        .route("/attendance/alerts", get(handlers::get_alerts))
        .route(
            "/attendance/student/{id}/history",
            get(handlers::get_student_history),
        )
        .route(
            "/attendance/{id}",
            get(handlers::get_attendance).delete(handlers::delete_attendance),
        )
        // Reports
        .route("/reports/attendance", get(handlers::get_reports))
        .route("/reports/attendance/alerts", get(handlers::get_alerts))
        .route(
            "/reports/attendance/student/{id}",
            get(handlers::get_student_history),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
