//! In-memory repository for tests and local development.
//!
//! All collections live behind one `RwLock`, so a uniqueness check and the
//! insert that follows it happen under the same write guard. Ids are assigned
//! from per-collection counters starting at 1 and are never reused.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;

use crate::api::{
    Attendance, AttendanceFilter, AttendanceId, Course, CourseId, CourseUpdate, NewAttendance,
    NewCourse, NewSession, NewStudent, Session, SessionFilter, SessionId, SessionUpdate, Student,
    StudentId,
};
use crate::db::repository::{
    AttendanceRepository, CourseRepository, ErrorContext, HealthRepository, RecordCounts,
    RepositoryError, RepositoryResult, SessionRepository, StudentRepository, UniqueConstraint,
};

#[derive(Debug, Default)]
struct LocalData {
    students: BTreeMap<i64, Student>,
    courses: BTreeMap<i64, Course>,
    sessions: BTreeMap<i64, Session>,
    attendances: BTreeMap<i64, Attendance>,
    next_student_id: i64,
    next_course_id: i64,
    next_session_id: i64,
    next_attendance_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl LocalData {
    fn check_student_unique(
        &self,
        student: &NewStudent,
        except: Option<StudentId>,
    ) -> RepositoryResult<()> {
        for existing in self.students.values() {
            if Some(existing.id) == except {
                continue;
            }
            if existing.email == student.email {
                return Err(violation(UniqueConstraint::StudentEmail, "student"));
            }
            if existing.student_code == student.student_code {
                return Err(violation(UniqueConstraint::StudentCode, "student"));
            }
        }
        Ok(())
    }

    fn check_course_unique(&self, code: &str, except: Option<CourseId>) -> RepositoryResult<()> {
        if self
            .courses
            .values()
            .any(|c| Some(c.id) != except && c.code == code)
        {
            return Err(violation(UniqueConstraint::CourseCode, "course"));
        }
        Ok(())
    }

    fn check_session_code_unique(
        &self,
        code: &str,
        except: Option<SessionId>,
    ) -> RepositoryResult<()> {
        if self
            .sessions
            .values()
            .any(|s| Some(s.id) != except && s.unique_code == code)
        {
            return Err(violation(UniqueConstraint::SessionCode, "session"));
        }
        Ok(())
    }

    fn require_course(&self, id: CourseId, operation: &str) -> RepositoryResult<()> {
        if self.courses.contains_key(&id.value()) {
            Ok(())
        } else {
            Err(RepositoryError::validation_with_context(
                format!("Course {} does not exist", id),
                ErrorContext::new(operation)
                    .with_entity("course")
                    .with_entity_id(id),
            ))
        }
    }

    fn remove_attendances_where(&mut self, predicate: impl Fn(&Attendance) -> bool) -> usize {
        let before = self.attendances.len();
        self.attendances.retain(|_, a| !predicate(a));
        before - self.attendances.len()
    }
}

fn violation(constraint: UniqueConstraint, entity: &str) -> RepositoryError {
    RepositoryError::constraint_with_context(constraint, ErrorContext::default().with_entity(entity))
}

fn not_found(entity: &str, id: impl ToString, operation: &str) -> RepositoryError {
    let id = id.to_string();
    RepositoryError::not_found_with_context(
        format!("{} {} not found", entity, id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

/// In-memory implementation of every repository trait.
///
/// Cloning shares the same underlying data.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    healthy: Arc<AtomicBool>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Force the health check result, for exercising failure paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Drop all records. Id counters keep counting.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.students.clear();
        data.courses.clear();
        data.sessions.clear();
        data.attendances.clear();
    }

    pub fn student_count(&self) -> usize {
        self.data.read().students.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.data.read().attendances.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn record_counts(&self) -> RepositoryResult<RecordCounts> {
        let data = self.data.read();
        Ok(RecordCounts {
            students: data.students.len(),
            courses: data.courses.values().filter(|c| c.is_active).count(),
            sessions: data.sessions.values().filter(|s| s.is_active).count(),
            attendances: data.attendances.len(),
        })
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn insert_student(
        &self,
        student: &NewStudent,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Student> {
        let mut data = self.data.write();
        data.check_student_unique(student, None)
            .map_err(|e| e.with_operation("insert_student"))?;

        let id = next_id(&mut data.next_student_id);
        let row = Student {
            id: StudentId::new(id),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            student_code: student.student_code.clone(),
            created_at,
        };
        data.students.insert(id, row.clone());
        Ok(row)
    }

    async fn get_student(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        Ok(self.data.read().students.get(&id.value()).cloned())
    }

    async fn get_student_by_code(&self, code: &str) -> RepositoryResult<Option<Student>> {
        Ok(self
            .data
            .read()
            .students
            .values()
            .find(|s| s.student_code == code)
            .cloned())
    }

    async fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        Ok(self.data.read().students.values().cloned().collect())
    }

    async fn update_student(
        &self,
        id: StudentId,
        student: &NewStudent,
    ) -> RepositoryResult<Student> {
        let mut data = self.data.write();
        if !data.students.contains_key(&id.value()) {
            return Err(not_found("student", id, "update_student"));
        }
        data.check_student_unique(student, Some(id))
            .map_err(|e| e.with_operation("update_student"))?;

        let row = data
            .students
            .get_mut(&id.value())
            .ok_or_else(|| not_found("student", id, "update_student"))?;
        row.first_name = student.first_name.clone();
        row.last_name = student.last_name.clone();
        row.email = student.email.clone();
        row.student_code = student.student_code.clone();
        Ok(row.clone())
    }

    async fn delete_student(&self, id: StudentId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        if data.students.remove(&id.value()).is_none() {
            return Ok(false);
        }
        let removed = data.remove_attendances_where(|a| a.student_id == id);
        debug!("Deleted student {} and {} attendance rows", id, removed);
        Ok(true)
    }
}

#[async_trait]
impl CourseRepository for LocalRepository {
    async fn insert_course(
        &self,
        course: &NewCourse,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Course> {
        let mut data = self.data.write();
        data.check_course_unique(&course.code, None)
            .map_err(|e| e.with_operation("insert_course"))?;

        let id = next_id(&mut data.next_course_id);
        let row = Course {
            id: CourseId::new(id),
            name: course.name.clone(),
            code: course.code.clone(),
            description: course.description.clone(),
            instructor_name: course.instructor_name.clone(),
            is_active: true,
            created_at,
        };
        data.courses.insert(id, row.clone());
        Ok(row)
    }

    async fn get_course(&self, id: CourseId) -> RepositoryResult<Option<Course>> {
        Ok(self.data.read().courses.get(&id.value()).cloned())
    }

    async fn list_courses(&self, active_only: bool) -> RepositoryResult<Vec<Course>> {
        Ok(self
            .data
            .read()
            .courses
            .values()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect())
    }

    async fn update_course(
        &self,
        id: CourseId,
        course: &CourseUpdate,
    ) -> RepositoryResult<Course> {
        let mut data = self.data.write();
        if !data.courses.contains_key(&id.value()) {
            return Err(not_found("course", id, "update_course"));
        }
        data.check_course_unique(&course.code, Some(id))
            .map_err(|e| e.with_operation("update_course"))?;

        let row = data
            .courses
            .get_mut(&id.value())
            .ok_or_else(|| not_found("course", id, "update_course"))?;
        row.name = course.name.clone();
        row.code = course.code.clone();
        row.description = course.description.clone();
        row.instructor_name = course.instructor_name.clone();
        row.is_active = course.is_active;
        Ok(row.clone())
    }

    async fn deactivate_course(&self, id: CourseId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        match data.courses.get_mut(&id.value()) {
            Some(course) => {
                course.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        if data.courses.remove(&id.value()).is_none() {
            return Ok(false);
        }
        let session_ids: Vec<SessionId> = data
            .sessions
            .values()
            .filter(|s| s.course_id == id)
            .map(|s| s.id)
            .collect();
        data.sessions.retain(|_, s| s.course_id != id);
        let removed = data.remove_attendances_where(|a| session_ids.contains(&a.session_id));
        debug!(
            "Deleted course {} with {} sessions and {} attendance rows",
            id,
            session_ids.len(),
            removed
        );
        Ok(true)
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn insert_session(
        &self,
        session: &NewSession,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Session> {
        let code = session.unique_code.clone().ok_or_else(|| {
            RepositoryError::validation_with_context(
                "Session join code must be assigned before insert",
                ErrorContext::new("insert_session").with_entity("session"),
            )
        })?;

        let mut data = self.data.write();
        data.require_course(session.course_id, "insert_session")?;
        data.check_session_code_unique(&code, None)
            .map_err(|e| e.with_operation("insert_session"))?;

        let id = next_id(&mut data.next_session_id);
        let row = Session {
            id: SessionId::new(id),
            course_id: session.course_id,
            title: session.title.clone(),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            unique_code: code,
            is_active: true,
            created_at,
        };
        data.sessions.insert(id, row.clone());
        Ok(row)
    }

    async fn get_session(&self, id: SessionId) -> RepositoryResult<Option<Session>> {
        Ok(self.data.read().sessions.get(&id.value()).cloned())
    }

    async fn get_session_by_code(&self, code: &str) -> RepositoryResult<Option<Session>> {
        Ok(self
            .data
            .read()
            .sessions
            .values()
            .find(|s| s.unique_code == code)
            .cloned())
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> RepositoryResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .data
            .read()
            .sessions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.date, s.start_time, s.id));
        Ok(sessions)
    }

    async fn update_session(
        &self,
        id: SessionId,
        session: &SessionUpdate,
    ) -> RepositoryResult<Session> {
        let mut data = self.data.write();
        if !data.sessions.contains_key(&id.value()) {
            return Err(not_found("session", id, "update_session"));
        }
        data.require_course(session.course_id, "update_session")?;
        if let Some(code) = &session.unique_code {
            data.check_session_code_unique(code, Some(id))
                .map_err(|e| e.with_operation("update_session"))?;
        }

        let row = data
            .sessions
            .get_mut(&id.value())
            .ok_or_else(|| not_found("session", id, "update_session"))?;
        row.course_id = session.course_id;
        row.title = session.title.clone();
        row.date = session.date;
        row.start_time = session.start_time;
        row.end_time = session.end_time;
        if let Some(code) = &session.unique_code {
            row.unique_code = code.clone();
        }
        row.is_active = session.is_active;
        Ok(row.clone())
    }

    async fn deactivate_session(&self, id: SessionId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        match data.sessions.get_mut(&id.value()) {
            Some(session) => {
                session.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_session(&self, id: SessionId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        if data.sessions.remove(&id.value()).is_none() {
            return Ok(false);
        }
        data.remove_attendances_where(|a| a.session_id == id);
        Ok(true)
    }

    async fn session_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        Ok(self
            .data
            .read()
            .sessions
            .values()
            .any(|s| s.unique_code == code))
    }
}

#[async_trait]
impl AttendanceRepository for LocalRepository {
    async fn insert_attendance(
        &self,
        attendance: &NewAttendance,
    ) -> RepositoryResult<Attendance> {
        let mut data = self.data.write();
        let context = || ErrorContext::new("insert_attendance").with_entity("attendance");

        if !data.students.contains_key(&attendance.student_id.value()) {
            return Err(RepositoryError::validation_with_context(
                format!("Student {} does not exist", attendance.student_id),
                context(),
            ));
        }
        if !data.sessions.contains_key(&attendance.session_id.value()) {
            return Err(RepositoryError::validation_with_context(
                format!("Session {} does not exist", attendance.session_id),
                context(),
            ));
        }
        if data.attendances.values().any(|a| {
            a.student_id == attendance.student_id && a.session_id == attendance.session_id
        }) {
            return Err(RepositoryError::constraint_with_context(
                UniqueConstraint::AttendanceStudentSession,
                context(),
            ));
        }

        let id = next_id(&mut data.next_attendance_id);
        let row = Attendance {
            id: AttendanceId::new(id),
            student_id: attendance.student_id,
            session_id: attendance.session_id,
            registered_at: attendance.registered_at,
            is_present: attendance.is_present,
            notes: attendance.notes.clone(),
        };
        data.attendances.insert(id, row.clone());
        Ok(row)
    }

    async fn get_attendance(&self, id: AttendanceId) -> RepositoryResult<Option<Attendance>> {
        Ok(self.data.read().attendances.get(&id.value()).cloned())
    }

    async fn find_attendance(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> RepositoryResult<Option<Attendance>> {
        Ok(self
            .data
            .read()
            .attendances
            .values()
            .find(|a| a.student_id == student_id && a.session_id == session_id)
            .cloned())
    }

    async fn list_attendances(
        &self,
        filter: &AttendanceFilter,
    ) -> RepositoryResult<Vec<Attendance>> {
        let data = self.data.read();
        Ok(data
            .attendances
            .values()
            .filter(|a| {
                data.sessions
                    .get(&a.session_id.value())
                    .is_some_and(|session| filter.matches(a, session.course_id))
            })
            .cloned()
            .collect())
    }

    async fn delete_attendance(&self, id: AttendanceId) -> RepositoryResult<bool> {
        Ok(self.data.write().attendances.remove(&id.value()).is_some())
    }
}
