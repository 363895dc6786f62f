//! Liveness and record statistics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;

/// Row counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    pub students: usize,
    /// Courses with `is_active = true`.
    pub courses: usize,
    /// Sessions with `is_active = true`.
    pub sessions: usize,
    pub attendances: usize,
}

#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Check whether the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    async fn record_counts(&self) -> RepositoryResult<RecordCounts>;
}
