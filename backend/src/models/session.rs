use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::api::{CourseId, SessionId};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_JOIN_CODE_LEN: usize = 10;

/// A single class meeting of a course.
///
/// Students register against a session by its `unique_code` (the join code),
/// and only on the calendar day equal to `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub course_id: CourseId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub unique_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Date-only comparison; time of day is ignored.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

/// Insert shape. A missing `unique_code` is filled by the join-code generator
/// before the row reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub course_id: CourseId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub unique_code: Option<String>,
}

impl NewSession {
    pub fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title, MAX_TITLE_LEN)?;
        if let Some(code) = &self.unique_code {
            require_text("uniqueCode", code, MAX_JOIN_CODE_LEN)?;
        }
        Ok(())
    }
}

/// Full-replace update. `unique_code: None` keeps the current join code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub course_id: CourseId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub unique_code: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl SessionUpdate {
    pub fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title, MAX_TITLE_LEN)?;
        if let Some(code) = &self.unique_code {
            require_text("uniqueCode", code, MAX_JOIN_CODE_LEN)?;
        }
        Ok(())
    }
}

fn default_active() -> bool {
    true
}
