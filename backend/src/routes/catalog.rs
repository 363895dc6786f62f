//! Students, courses and sessions as exposed by the CRUD endpoints.

use serde::{Deserialize, Serialize};

use crate::api::CourseId;
use crate::models::{Course, Session};

/// A course together with its active sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithSessions {
    #[serde(flatten)]
    pub course: Course,
    pub sessions: Vec<Session>,
}

/// Session listing filter. Results are ordered by date, then start time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub course_id: Option<CourseId>,
    pub active_only: bool,
}

impl SessionFilter {
    pub fn active() -> Self {
        Self {
            course_id: None,
            active_only: true,
        }
    }

    pub fn for_course(mut self, course_id: Option<CourseId>) -> Self {
        self.course_id = course_id;
        self
    }

    pub fn matches(&self, session: &Session) -> bool {
        (!self.active_only || session.is_active)
            && self.course_id.is_none_or(|c| c == session.course_id)
    }
}
