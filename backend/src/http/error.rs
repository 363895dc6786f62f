//! HTTP error mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable code, e.g. `DUPLICATE_ATTENDANCE`.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// A registration or lookup rule rejected the request (400).
    Rejected { code: &'static str, message: String },
    Conflict(String),
    Internal(String),
    Repository(RepositoryError),
}

impl AppError {
    /// Treat a missing student as the primary resource of the request.
    pub fn student_as_resource(err: ServiceError) -> Self {
        match err {
            ServiceError::StudentNotFound => AppError::NotFound(err.to_string()),
            other => other.into(),
        }
    }

    fn rejected(code: &'static str, err: &ServiceError) -> Self {
        AppError::Rejected {
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Rejected { code, message } => {
                (StatusCode::BAD_REQUEST, ApiError::new(code, message))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
            AppError::Repository(e) => {
                let message = e.to_string();
                if e.is_not_found() {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
                } else if e.violated_constraint().is_some() {
                    (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
                } else if matches!(e, RepositoryError::ValidationError { .. }) {
                    (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message))
                } else {
                    error!("Repository failure: {}", message);
                    let body = ApiError::new("REPOSITORY_ERROR", "Storage operation failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, body.with_details(message))
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidSessionCode => Self::rejected("INVALID_SESSION_CODE", &err),
            ServiceError::SessionNotActiveToday => {
                Self::rejected("SESSION_NOT_ACTIVE_TODAY", &err)
            }
            ServiceError::StudentNotFound => Self::rejected("STUDENT_NOT_FOUND", &err),
            ServiceError::DuplicateAttendance => Self::rejected("DUPLICATE_ATTENDANCE", &err),
            ServiceError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
