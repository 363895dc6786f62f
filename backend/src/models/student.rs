use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::api::StudentId;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_STUDENT_CODE_LEN: usize = 20;

/// A registered student. `email` and `student_code` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_code: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// Display name used in attendance records and reports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert and full-replace shape for students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_code: String,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), String> {
        require_text("firstName", &self.first_name, MAX_NAME_LEN)?;
        require_text("lastName", &self.last_name, MAX_NAME_LEN)?;
        require_text("email", &self.email, MAX_EMAIL_LEN)?;
        require_text("studentCode", &self.student_code, MAX_STUDENT_CODE_LEN)?;
        Ok(())
    }
}
