//! Shared handler state.

use std::sync::Arc;

use crate::api::DEFAULT_ALERT_THRESHOLD;
use crate::db::factory::RepositoryType;
use crate::db::repository::FullRepository;
use crate::models::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    /// Source of "today" for registration and the portal.
    pub clock: Arc<dyn Clock>,
    /// Used by `/attendance/alerts` when the request has no `threshold`.
    pub alert_threshold: f64,
    /// Reported by `/api/health/detailed`.
    pub backend: Option<RepositoryType>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            backend: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    pub fn with_backend(mut self, backend: RepositoryType) -> Self {
        self.backend = Some(backend);
        self
    }
}
