//! Course storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{Course, CourseId, CourseUpdate, NewCourse};

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert an active course. `code` is unique.
    async fn insert_course(
        &self,
        course: &NewCourse,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Course>;

    async fn get_course(&self, id: CourseId) -> RepositoryResult<Option<Course>>;

    /// Courses ascending by id, optionally only the active ones.
    async fn list_courses(&self, active_only: bool) -> RepositoryResult<Vec<Course>>;

    async fn update_course(&self, id: CourseId, course: &CourseUpdate)
        -> RepositoryResult<Course>;

    /// Soft delete: clear `is_active`, keep the row. `false` if unknown.
    async fn deactivate_course(&self, id: CourseId) -> RepositoryResult<bool>;

    /// Hard delete, cascading to the course's sessions and their attendances.
    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool>;
}
