#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime, Utc};

use attendance_rust::api::{
    Course, NewCourse, NewSession, NewStudent, Session, Student, StudentId,
};
use attendance_rust::db::repository::{CourseRepository, SessionRepository, StudentRepository};
use attendance_rust::db::LocalRepository;
use attendance_rust::models::FixedClock;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily changed.
///
/// Access is serialized across tests and the previous values come back on
/// drop, including when `f` panics. `None` removes a variable.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// -- fixtures ---------------------------------------------------------------

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock::on(today())
}

pub fn new_student(code: &str) -> NewStudent {
    NewStudent {
        first_name: "Estudiante".into(),
        last_name: code.into(),
        email: format!("{}@email.com", code.to_lowercase()),
        student_code: code.into(),
    }
}

pub fn new_course(code: &str) -> NewCourse {
    NewCourse {
        name: format!("Curso {}", code),
        code: code.into(),
        description: String::new(),
        instructor_name: "Dr. Ana López".into(),
    }
}

pub fn new_session(course: &Course, code: &str, date: NaiveDate) -> NewSession {
    NewSession {
        course_id: course.id,
        title: format!("{} {}", course.code, date),
        date,
        start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        unique_code: Some(code.into()),
    }
}

pub async fn add_student(repo: &LocalRepository, code: &str) -> Student {
    repo.insert_student(&new_student(code), Utc::now())
        .await
        .unwrap()
}

pub async fn add_course(repo: &LocalRepository, code: &str) -> Course {
    repo.insert_course(&new_course(code), Utc::now())
        .await
        .unwrap()
}

pub async fn add_session(
    repo: &LocalRepository,
    course: &Course,
    code: &str,
    date: NaiveDate,
) -> Session {
    repo.insert_session(&new_session(course, code, date), Utc::now())
        .await
        .unwrap()
}

pub async fn add_students(repo: &LocalRepository, count: usize) -> Vec<StudentId> {
    let mut ids = Vec::with_capacity(count);
    for i in 1..=count {
        ids.push(add_student(repo, &format!("EST{:03}", i)).await.id);
    }
    ids
}
