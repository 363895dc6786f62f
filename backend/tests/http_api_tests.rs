//! HTTP surface driven through the axum router without a socket.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use attendance_rust::db::repository::FullRepository;
use attendance_rust::db::{seed_demo_data, LocalRepository, RepositoryType};
use attendance_rust::http::{create_router, AppState};

struct TestApp {
    router: Router,
    repo: Arc<LocalRepository>,
}

impl TestApp {
    fn new() -> Self {
        let repo = Arc::new(LocalRepository::new());
        let state = AppState::new(Arc::clone(&repo) as Arc<dyn FullRepository>)
            .with_clock(Arc::new(support::clock()));
        Self {
            router: create_router(state),
            repo,
        }
    }

    async fn seeded() -> Self {
        let app = Self::new();
        seed_demo_data(app.repo.as_ref(), Utc::now()).await.unwrap();
        app
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Create a session for course 1 dated `offset` days from today.
    async fn session(&self, code: &str, offset: i64) -> Value {
        let date = support::today() + Duration::days(offset);
        let (status, body) = self
            .post(
                "/api/sessions",
                json!({
                    "courseId": 1,
                    "title": format!("Clase {}", code),
                    "date": date.to_string(),
                    "startTime": "08:00:00",
                    "endTime": "10:00:00",
                    "uniqueCode": code,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

#[tokio::test]
async fn test_health_reports_statistics() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["statistics"]["students"], 3);
    assert_eq!(body["statistics"]["courses"], 2);
}

#[tokio::test]
async fn test_health_when_store_is_down() {
    let app = TestApp::new();
    app.repo.set_healthy(false);
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "disconnected");
    assert!(body.get("statistics").is_none());
}

#[tokio::test]
async fn test_register_attendance_flow() {
    let app = TestApp::seeded().await;
    app.session("482913", 0).await;

    let (status, body) = app
        .post(
            "/api/attendance",
            json!({"studentId": 1, "sessionCode": "482913", "notes": "primera fila"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["studentName"], "Juan Pérez");
    assert_eq!(body["studentCode"], "EST001");
    assert_eq!(body["courseCode"], "PW001");
    assert_eq!(body["sessionTitle"], "Clase 482913");
    assert_eq!(body["isPresent"], true);
    assert_eq!(body["notes"], "primera fila");
    assert!(body["registeredAt"].as_str().unwrap().ends_with('Z'));

    let id = body["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/api/attendance/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);

    let (status, dup) = app
        .post(
            "/api/attendance",
            json!({"studentId": 1, "sessionCode": "482913"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup["code"], "DUPLICATE_ATTENDANCE");
}

#[tokio::test]
async fn test_registration_rejections() {
    let app = TestApp::seeded().await;
    app.session("111111", -1).await;
    app.session("222222", 0).await;

    let cases = [
        (json!({"studentId": 1, "sessionCode": "000000"}), "INVALID_SESSION_CODE"),
        (json!({"studentId": 1, "sessionCode": "111111"}), "SESSION_NOT_ACTIVE_TODAY"),
        (json!({"studentId": 99, "sessionCode": "222222"}), "STUDENT_NOT_FOUND"),
        (json!({"studentId": 99, "sessionCode": "000000"}), "INVALID_SESSION_CODE"),
    ];
    for (body, code) in cases {
        let (status, error) = app.post("/api/attendance", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], code);
        assert!(!error["message"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_attendance_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/attendance/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_history_status_codes() {
    let app = TestApp::seeded().await;
    app.session("482913", 0).await;
    app.post(
        "/api/attendance",
        json!({"studentId": 2, "sessionCode": "482913"}),
    )
    .await;

    let (status, body) = app.get("/api/attendance/student/2/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, same) = app.get("/api/students/2/attendance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, body);

    let (status, _) = app.get("/api/attendance/student/77/history").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_filters() {
    let app = TestApp::seeded().await;
    app.session("482913", 0).await;
    for student in 1..=3 {
        app.post(
            "/api/attendance",
            json!({"studentId": student, "sessionCode": "482913"}),
        )
        .await;
    }

    let (_, all) = app.get("/api/attendance").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, filtered) = app.get("/api/attendance?courseId=1&studentId=3").await;
    assert_eq!(status, StatusCode::OK);
    let rows = filtered.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["studentId"], 3);

    let (_, other_course) = app.get("/api/attendance?courseId=2").await;
    assert!(other_course.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reports_and_alerts() {
    let app = TestApp::seeded().await;
    app.session("100001", 0).await;
    app.session("100002", 1).await;
    app.post(
        "/api/attendance",
        json!({"studentId": 1, "sessionCode": "100001"}),
    )
    .await;

    let (status, reports) = app.get("/api/attendance/reports?courseId=1").await;
    assert_eq!(status, StatusCode::OK);
    let report = &reports.as_array().unwrap()[0];
    assert_eq!(report["courseCode"], "PW001");
    assert_eq!(report["totalSessions"], 2);
    assert_eq!(report["totalStudents"], 3);
    assert_eq!(report["studentSummaries"][0]["attendanceRate"], 50.0);

    let (status, alerts) = app.get("/api/attendance/alerts").await;
    assert_eq!(status, StatusCode::OK);
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0]["attendanceRate"], 0.0);
    assert_eq!(alerts[0]["alertLevel"], "Critical");
    assert_eq!(alerts[2]["attendanceRate"], 50.0);
    assert_eq!(alerts[2]["alertLevel"], "Warning");

    let (_, strict) = app.get("/api/attendance/alerts?threshold=50").await;
    assert_eq!(strict.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_student_crud_over_http() {
    let app = TestApp::new();
    let (status, created) = app
        .post(
            "/api/students",
            json!({
                "firstName": "Ana",
                "lastName": "Ruiz",
                "email": "ana.ruiz@email.com",
                "studentCode": "EST010"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, by_code) = app.get("/api/students/by-code/EST010").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_code["id"], id);

    let (status, conflict) = app
        .post(
            "/api/students",
            json!({
                "firstName": "Otra",
                "lastName": "Persona",
                "email": "ana.ruiz@email.com",
                "studentCode": "EST011"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "CONFLICT");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/students/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/students/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_soft_delete_over_http() {
    let app = TestApp::seeded().await;
    let (status, _) = app.send(Method::DELETE, "/api/courses/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, courses) = app.get("/api/courses").await;
    let codes: Vec<&str> = courses
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["PW001"]);

    let (status, course) = app.get("/api/courses/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(course["isActive"], false);
}

#[tokio::test]
async fn test_session_by_code_and_generated_code() {
    let app = TestApp::seeded().await;
    let (status, created) = app
        .post(
            "/api/sessions",
            json!({
                "courseId": 1,
                "title": "Sin código",
                "date": support::today().to_string(),
                "startTime": "08:00:00",
                "endTime": "10:00:00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = created["uniqueCode"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);

    let (status, found) = app.get(&format!("/api/sessions/by-code/{}", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], created["id"]);

    app.session("333333", 2).await;
    let (status, _) = app.get("/api/sessions/by-code/333333").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/api/sessions/by-code/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, err) = app
        .post(
            "/api/sessions",
            json!({
                "courseId": 42,
                "title": "Huérfana",
                "date": support::today().to_string(),
                "startTime": "08:00:00",
                "endTime": "10:00:00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_student_portal_over_http() {
    let app = TestApp::seeded().await;
    app.session("100001", -2).await;
    app.session("100002", 0).await;
    app.session("100003", 3).await;
    app.post(
        "/api/attendance",
        json!({"studentId": 1, "sessionCode": "100002"}),
    )
    .await;

    let (status, portal) = app.get("/api/students/1/courses-with-sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(portal["student"]["studentCode"], "EST001");
    let courses = portal["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    let sessions = courses[0]["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["uniqueCode"], "100002");
    assert_eq!(sessions[0]["isToday"], true);
    assert_eq!(sessions[0]["attendanceStatus"]["isPresent"], true);
    assert!(sessions[1]["attendanceStatus"].is_null());

    let (status, _) = app.get("/api/students/9/courses-with-sessions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_health_aliases() {
    let app = TestApp::seeded().await;
    let (status, root) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let (status, nested) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nested, root);

    let (status, detailed) = app.get("/api/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detailed["status"], "ok");
    assert_eq!(detailed["database"]["status"], "connected");
    assert_eq!(detailed["database"]["statistics"]["students"], 3);
    assert!(detailed["system"]["processorCount"].as_u64().unwrap() >= 1);
    assert!(!detailed["environment"].as_str().unwrap().is_empty());
    // The test state does not record a backend.
    assert!(detailed.get("backend").is_none());
}

#[tokio::test]
async fn test_detailed_health_reports_backend_and_outage() {
    let repo = Arc::new(LocalRepository::new());
    repo.set_healthy(false);
    let state = AppState::new(Arc::clone(&repo) as Arc<dyn FullRepository>)
        .with_backend(RepositoryType::Local);
    let app = TestApp {
        router: create_router(state),
        repo,
    };

    let (status, detailed) = app.get("/api/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detailed["backend"], "local");
    assert_eq!(detailed["database"]["status"], "disconnected");
    assert!(detailed["database"].get("statistics").is_none());
}

#[tokio::test]
async fn test_reports_routes_mirror_attendance_routes() {
    let app = TestApp::seeded().await;
    app.session("100001", 0).await;
    app.session("100002", 1).await;
    app.post(
        "/api/attendance",
        json!({"studentId": 1, "sessionCode": "100001"}),
    )
    .await;

    let pairs = [
        ("/api/attendance/reports", "/api/reports/attendance"),
        (
            "/api/attendance/reports?courseId=1",
            "/api/reports/attendance?courseId=1",
        ),
        ("/api/attendance/alerts", "/api/reports/attendance/alerts"),
        (
            "/api/attendance/alerts?threshold=40",
            "/api/reports/attendance/alerts?threshold=40",
        ),
        (
            "/api/attendance/student/1/history",
            "/api/reports/attendance/student/1",
        ),
    ];
    for (primary, alias) in pairs {
        let (status, expected) = app.get(primary).await;
        assert_eq!(status, StatusCode::OK, "{primary}");
        let (status, actual) = app.get(alias).await;
        assert_eq!(status, StatusCode::OK, "{alias}");
        assert_eq!(actual, expected, "{alias}");
    }

    let (status, _) = app.get("/api/reports/attendance/student/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_students_lists_roster() {
    let app = TestApp::seeded().await;
    let (status, students) = app.get("/api/attendance/students").await;
    assert_eq!(status, StatusCode::OK);
    let (_, roster) = app.get("/api/students").await;
    assert_eq!(students, roster);
    assert_eq!(students.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_padded_session_code_is_invalid() {
    let app = TestApp::seeded().await;
    app.session("482913", 0).await;

    let (status, body) = app
        .post(
            "/api/attendance",
            json!({"studentId": 1, "sessionCode": "  482913 "}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SESSION_CODE");
    assert_eq!(app.repo.attendance_count(), 0);
}

#[tokio::test]
async fn test_malformed_requests_use_error_body() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .post("/api/attendance", json!({"sessionCode": "482913"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let (status, body) = app.get("/api/attendance/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = app.get("/api/attendance?courseId=web").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/students")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}
