//! Session storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{NewSession, Session, SessionFilter, SessionId, SessionUpdate};

/// Repository trait for class sessions.
///
/// Join codes are unique across every session, active or not.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert an active session.
    ///
    /// The join code must already be assigned; a missing code or an unknown
    /// course is a `ValidationError`.
    async fn insert_session(
        &self,
        session: &NewSession,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Session>;

    /// Lookup by id, including inactive sessions.
    async fn get_session(&self, id: SessionId) -> RepositoryResult<Option<Session>>;

    /// Lookup by join code regardless of the active flag.
    async fn get_session_by_code(&self, code: &str) -> RepositoryResult<Option<Session>>;

    /// Matching sessions ordered by date, start time, then id.
    async fn list_sessions(&self, filter: &SessionFilter) -> RepositoryResult<Vec<Session>>;

    /// Full replace. `unique_code: None` keeps the current code.
    async fn update_session(
        &self,
        id: SessionId,
        session: &SessionUpdate,
    ) -> RepositoryResult<Session>;

    /// Soft delete. `false` if unknown.
    async fn deactivate_session(&self, id: SessionId) -> RepositoryResult<bool>;

    /// Hard delete, cascading to attendances.
    async fn delete_session(&self, id: SessionId) -> RepositoryResult<bool>;

    async fn session_code_exists(&self, code: &str) -> RepositoryResult<bool>;
}
