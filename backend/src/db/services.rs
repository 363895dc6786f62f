//! Repository-level helpers shared by the server and tests.

use chrono::{DateTime, Utc};
use log::info;

use super::repository::{FullRepository, RecordCounts, RepositoryResult};
use crate::api::{NewCourse, NewStudent};

pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

pub async fn statistics(repo: &dyn FullRepository) -> RepositoryResult<RecordCounts> {
    repo.record_counts().await
}

/// Outcome of [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub students: usize,
    pub courses: usize,
}

fn demo_students() -> Vec<NewStudent> {
    [
        ("Juan", "Pérez", "juan.perez@email.com", "EST001"),
        ("María", "González", "maria.gonzalez@email.com", "EST002"),
        ("Carlos", "Rodríguez", "carlos.rodriguez@email.com", "EST003"),
    ]
    .into_iter()
    .map(|(first, last, email, code)| NewStudent {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        student_code: code.to_string(),
    })
    .collect()
}

fn demo_courses() -> Vec<NewCourse> {
    [
        (
            "Programación Web",
            "PW001",
            "Curso de desarrollo web con tecnologías modernas",
            "Dr. Ana López",
        ),
        (
            "Base de Datos",
            "BD001",
            "Fundamentos de bases de datos relacionales",
            "Ing. Roberto Silva",
        ),
    ]
    .into_iter()
    .map(|(name, code, description, instructor)| NewCourse {
        name: name.to_string(),
        code: code.to_string(),
        description: description.to_string(),
        instructor_name: instructor.to_string(),
    })
    .collect()
}

/// Insert the demo roster and courses. Records whose code already exists
/// are skipped, so running it twice is harmless.
pub async fn seed_demo_data(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
) -> RepositoryResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for student in demo_students() {
        if repo
            .get_student_by_code(&student.student_code)
            .await?
            .is_none()
        {
            repo.insert_student(&student, now).await?;
            summary.students += 1;
        }
    }

    let existing: Vec<String> = repo
        .list_courses(false)
        .await?
        .into_iter()
        .map(|c| c.code)
        .collect();
    for course in demo_courses() {
        if !existing.contains(&course.code) {
            repo.insert_course(&course, now).await?;
            summary.courses += 1;
        }
    }

    info!(
        "Seeded {} students and {} courses",
        summary.students, summary.courses
    );
    Ok(summary)
}
