use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_length, require_text};
use crate::api::CourseId;

pub const MAX_COURSE_NAME_LEN: usize = 200;
pub const MAX_COURSE_CODE_LEN: usize = 20;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_INSTRUCTOR_LEN: usize = 200;

/// A course. Deleting through the API only clears `is_active`; the row stays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub instructor_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub instructor_name: String,
}

impl NewCourse {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name, MAX_COURSE_NAME_LEN)?;
        require_text("code", &self.code, MAX_COURSE_CODE_LEN)?;
        check_length("description", &self.description, MAX_DESCRIPTION_LEN)?;
        require_text("instructorName", &self.instructor_name, MAX_INSTRUCTOR_LEN)?;
        Ok(())
    }
}

/// Full-replace update. `is_active` defaults to true when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub instructor_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<(), String> {
        NewCourse {
            name: self.name.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
            instructor_name: self.instructor_name.clone(),
        }
        .validate()
    }
}

fn default_active() -> bool {
    true
}
