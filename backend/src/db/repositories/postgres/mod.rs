//! Postgres repository implementation using Diesel.
//!
//! Four tables (`students`, `courses`, `sessions`, `attendances`) with the
//! uniqueness rules declared as named unique indexes, so a
//! `UniqueViolation` can be mapped back to its [`UniqueConstraint`]. Child rows
//! are removed by `ON DELETE CASCADE`.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
//!
//! [`UniqueConstraint`]: crate::db::repository::UniqueConstraint

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::api::{
    Attendance, AttendanceFilter, AttendanceId, Course, CourseId, CourseUpdate, NewAttendance,
    NewCourse, NewSession, NewStudent, Session, SessionFilter, SessionId, SessionUpdate, Student,
    StudentId,
};
use crate::db::repository::{
    AttendanceRepository, CourseRepository, ErrorContext, HealthRepository, RecordCounts,
    RepositoryError, RepositoryResult, SessionRepository, StudentRepository,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }
        info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size, config.min_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times on retryable errors (connection
    /// errors, timeouts, serialization failures), doubling the delay each time.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Returns (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn count_as_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}

fn missing(entity: &str, id: impl ToString, operation: &str) -> RepositoryError {
    let id = id.to_string();
    RepositoryError::not_found_with_context(
        format!("{} {} not found", entity, id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn student_values(student: &NewStudent) -> StudentValues {
    StudentValues {
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        email: student.email.clone(),
        student_code: student.student_code.clone(),
    }
}

#[async_trait]
impl HealthRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn record_counts(&self) -> RepositoryResult<RecordCounts> {
        self.with_conn(|conn| {
            let students: i64 = students::table
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            let courses: i64 = courses::table
                .filter(courses::is_active.eq(true))
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            let sessions: i64 = sessions::table
                .filter(sessions::is_active.eq(true))
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            let attendances: i64 = attendances::table
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;

            Ok(RecordCounts {
                students: count_as_usize(students),
                courses: count_as_usize(courses),
                sessions: count_as_usize(sessions),
                attendances: count_as_usize(attendances),
            })
        })
        .await
    }
}

#[async_trait]
impl StudentRepository for PostgresRepository {
    async fn insert_student(
        &self,
        student: &NewStudent,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Student> {
        let row = NewStudentRow {
            values: student_values(student),
            created_at,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(students::table)
                .values(&row)
                .returning(StudentRow::as_returning())
                .get_result::<StudentRow>(conn)
                .map(Student::from)
                .map_err(|e| map_diesel_error(e).with_operation("insert_student"))
        })
        .await
    }

    async fn get_student(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        self.with_conn(move |conn| {
            students::table
                .find(id.value())
                .select(StudentRow::as_select())
                .first::<StudentRow>(conn)
                .optional()
                .map(|row| row.map(Student::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_student_by_code(&self, code: &str) -> RepositoryResult<Option<Student>> {
        let code = code.to_string();
        self.with_conn(move |conn| {
            students::table
                .filter(students::student_code.eq(&code))
                .select(StudentRow::as_select())
                .first::<StudentRow>(conn)
                .optional()
                .map(|row| row.map(Student::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        self.with_conn(|conn| {
            let rows = students::table
                .order(students::id.asc())
                .select(StudentRow::as_select())
                .load::<StudentRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Student::from).collect())
        })
        .await
    }

    async fn update_student(
        &self,
        id: StudentId,
        student: &NewStudent,
    ) -> RepositoryResult<Student> {
        let changes = student_values(student);
        self.with_conn(move |conn| {
            diesel::update(students::table.find(id.value()))
                .set(&changes)
                .returning(StudentRow::as_returning())
                .get_result::<StudentRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("update_student"))?
                .map(Student::from)
                .ok_or_else(|| missing("student", id, "update_student"))
        })
        .await
    }

    async fn delete_student(&self, id: StudentId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::delete(students::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl CourseRepository for PostgresRepository {
    async fn insert_course(
        &self,
        course: &NewCourse,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Course> {
        let row = NewCourseRow {
            name: course.name.clone(),
            code: course.code.clone(),
            description: course.description.clone(),
            instructor_name: course.instructor_name.clone(),
            is_active: true,
            created_at,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(courses::table)
                .values(&row)
                .returning(CourseRow::as_returning())
                .get_result::<CourseRow>(conn)
                .map(Course::from)
                .map_err(|e| map_diesel_error(e).with_operation("insert_course"))
        })
        .await
    }

    async fn get_course(&self, id: CourseId) -> RepositoryResult<Option<Course>> {
        self.with_conn(move |conn| {
            courses::table
                .find(id.value())
                .select(CourseRow::as_select())
                .first::<CourseRow>(conn)
                .optional()
                .map(|row| row.map(Course::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_courses(&self, active_only: bool) -> RepositoryResult<Vec<Course>> {
        self.with_conn(move |conn| {
            let mut query = courses::table
                .select(CourseRow::as_select())
                .order(courses::id.asc())
                .into_boxed();
            if active_only {
                query = query.filter(courses::is_active.eq(true));
            }
            let rows = query.load::<CourseRow>(conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Course::from).collect())
        })
        .await
    }

    async fn update_course(
        &self,
        id: CourseId,
        course: &CourseUpdate,
    ) -> RepositoryResult<Course> {
        let changes = CourseChanges {
            name: course.name.clone(),
            code: course.code.clone(),
            description: course.description.clone(),
            instructor_name: course.instructor_name.clone(),
            is_active: course.is_active,
        };
        self.with_conn(move |conn| {
            diesel::update(courses::table.find(id.value()))
                .set(&changes)
                .returning(CourseRow::as_returning())
                .get_result::<CourseRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("update_course"))?
                .map(Course::from)
                .ok_or_else(|| missing("course", id, "update_course"))
        })
        .await
    }

    async fn deactivate_course(&self, id: CourseId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::update(courses::table.find(id.value()))
                .set(courses::is_active.eq(false))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::delete(courses::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl SessionRepository for PostgresRepository {
    async fn insert_session(
        &self,
        session: &NewSession,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Session> {
        let unique_code = session.unique_code.clone().ok_or_else(|| {
            RepositoryError::validation_with_context(
                "Session join code must be assigned before insert",
                ErrorContext::new("insert_session").with_entity("session"),
            )
        })?;
        let row = NewSessionRow {
            course_id: session.course_id.value(),
            title: session.title.clone(),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            unique_code,
            is_active: true,
            created_at,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(sessions::table)
                .values(&row)
                .returning(SessionRow::as_returning())
                .get_result::<SessionRow>(conn)
                .map(Session::from)
                .map_err(|e| map_diesel_error(e).with_operation("insert_session"))
        })
        .await
    }

    async fn get_session(&self, id: SessionId) -> RepositoryResult<Option<Session>> {
        self.with_conn(move |conn| {
            sessions::table
                .find(id.value())
                .select(SessionRow::as_select())
                .first::<SessionRow>(conn)
                .optional()
                .map(|row| row.map(Session::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_session_by_code(&self, code: &str) -> RepositoryResult<Option<Session>> {
        let code = code.to_string();
        self.with_conn(move |conn| {
            sessions::table
                .filter(sessions::unique_code.eq(&code))
                .select(SessionRow::as_select())
                .first::<SessionRow>(conn)
                .optional()
                .map(|row| row.map(Session::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> RepositoryResult<Vec<Session>> {
        let filter = *filter;
        self.with_conn(move |conn| {
            let mut query = sessions::table
                .select(SessionRow::as_select())
                .order((
                    sessions::date.asc(),
                    sessions::start_time.asc(),
                    sessions::id.asc(),
                ))
                .into_boxed();
            if filter.active_only {
                query = query.filter(sessions::is_active.eq(true));
            }
            if let Some(course_id) = filter.course_id {
                query = query.filter(sessions::course_id.eq(course_id.value()));
            }
            let rows = query.load::<SessionRow>(conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Session::from).collect())
        })
        .await
    }

    async fn update_session(
        &self,
        id: SessionId,
        session: &SessionUpdate,
    ) -> RepositoryResult<Session> {
        let changes = SessionChanges {
            course_id: session.course_id.value(),
            title: session.title.clone(),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            unique_code: session.unique_code.clone(),
            is_active: session.is_active,
        };
        self.with_conn(move |conn| {
            diesel::update(sessions::table.find(id.value()))
                .set(&changes)
                .returning(SessionRow::as_returning())
                .get_result::<SessionRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("update_session"))?
                .map(Session::from)
                .ok_or_else(|| missing("session", id, "update_session"))
        })
        .await
    }

    async fn deactivate_session(&self, id: SessionId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::update(sessions::table.find(id.value()))
                .set(sessions::is_active.eq(false))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_session(&self, id: SessionId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::delete(sessions::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn session_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        let code = code.to_string();
        self.with_conn(move |conn| {
            diesel::select(diesel::dsl::exists(
                sessions::table.filter(sessions::unique_code.eq(&code)),
            ))
            .get_result::<bool>(conn)
            .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn insert_attendance(
        &self,
        attendance: &NewAttendance,
    ) -> RepositoryResult<Attendance> {
        let row = NewAttendanceRow {
            student_id: attendance.student_id.value(),
            session_id: attendance.session_id.value(),
            registered_at: attendance.registered_at,
            is_present: attendance.is_present,
            notes: attendance.notes.clone(),
        };
        self.with_conn(move |conn| {
            // The unique index on (student_id, session_id) settles races.
            diesel::insert_into(attendances::table)
                .values(&row)
                .returning(AttendanceRow::as_returning())
                .get_result::<AttendanceRow>(conn)
                .map(Attendance::from)
                .map_err(|e| map_diesel_error(e).with_operation("insert_attendance"))
        })
        .await
    }

    async fn get_attendance(&self, id: AttendanceId) -> RepositoryResult<Option<Attendance>> {
        self.with_conn(move |conn| {
            attendances::table
                .find(id.value())
                .select(AttendanceRow::as_select())
                .first::<AttendanceRow>(conn)
                .optional()
                .map(|row| row.map(Attendance::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_attendance(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> RepositoryResult<Option<Attendance>> {
        self.with_conn(move |conn| {
            attendances::table
                .filter(attendances::student_id.eq(student_id.value()))
                .filter(attendances::session_id.eq(session_id.value()))
                .select(AttendanceRow::as_select())
                .first::<AttendanceRow>(conn)
                .optional()
                .map(|row| row.map(Attendance::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_attendances(
        &self,
        filter: &AttendanceFilter,
    ) -> RepositoryResult<Vec<Attendance>> {
        let filter = *filter;
        self.with_conn(move |conn| {
            let mut query = attendances::table
                .inner_join(sessions::table)
                .select(AttendanceRow::as_select())
                .order(attendances::id.asc())
                .into_boxed();
            if let Some(course_id) = filter.course_id {
                query = query.filter(sessions::course_id.eq(course_id.value()));
            }
            if let Some(student_id) = filter.student_id {
                query = query.filter(attendances::student_id.eq(student_id.value()));
            }
            if let Some(session_id) = filter.session_id {
                query = query.filter(attendances::session_id.eq(session_id.value()));
            }
            let rows = query.load::<AttendanceRow>(conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Attendance::from).collect())
        })
        .await
    }

    async fn delete_attendance(&self, id: AttendanceId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::delete(attendances::table.find(id.value()))
                .execute(conn)
                .map(|n| n > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/attendance");
        assert_eq!(config.database_url, "postgres://localhost/attendance");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 100);
    }

    #[test]
    fn test_count_as_usize_clamps_negative() {
        assert_eq!(count_as_usize(7), 7);
        assert_eq!(count_as_usize(-1), 0);
    }
}
