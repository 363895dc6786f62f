//! Request and response bodies that only exist at the HTTP boundary.
//!
//! Entity and report shapes live in `crate::api`.

use serde::{Deserialize, Serialize};

use crate::api::CourseId;
use crate::db::repository::RecordCounts;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error: ...`
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<RecordCounts>,
}

/// `GET /api/health/detailed`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub version: String,
    /// `APP_ENV`, `development` when unset.
    pub environment: String,
    /// `local` or `postgres`; absent when the server did not record it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub database: DatabaseHealth,
    pub system: SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<RecordCounts>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub processor_count: usize,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            processor_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// `GET /api/attendance/alerts?threshold=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AlertsQuery {
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// `GET /api/attendance/reports?courseId=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsQuery {
    #[serde(default)]
    pub course_id: Option<CourseId>,
}

/// `GET /api/sessions?courseId=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsQuery {
    #[serde(default)]
    pub course_id: Option<CourseId>,
}
