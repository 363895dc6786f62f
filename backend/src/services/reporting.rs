//! Attendance-rate reports and low-attendance alerts.
//!
//! Everything here is read-only. Rates are percentages rounded half away
//! from zero to two decimals. The student population of a course report is
//! every registered student, since there is no enrollment record.

use std::collections::HashSet;

use log::debug;

use super::error::ServiceResult;
use crate::api::{
    AlertLevel, AlertRecord, AttendanceFilter, CourseId, CourseReport, SessionFilter,
    SessionId, StudentAttendanceSummary,
};
use crate::db::repository::FullRepository;
use crate::models::{Attendance, Course, Session, Student};

/// Round to two decimal places, half away from zero.
pub fn round_rate(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(attended: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_rate(attended as f64 / total as f64 * 100.0)
    }
}

/// Build the report for one course.
///
/// `active_sessions` must be the course's active sessions. Attendance rows for
/// any other session are ignored, as is the presence flag.
pub fn compute_course_report(
    course: &Course,
    active_sessions: &[Session],
    students: &[Student],
    attendances: &[Attendance],
) -> CourseReport {
    let session_ids: HashSet<SessionId> = active_sessions
        .iter()
        .filter(|s| s.course_id == course.id)
        .map(|s| s.id)
        .collect();
    let total_sessions = session_ids.len();

    let student_summaries: Vec<StudentAttendanceSummary> = students
        .iter()
        .map(|student| {
            let attended_sessions = attendances
                .iter()
                .filter(|a| a.student_id == student.id && session_ids.contains(&a.session_id))
                .count();
            StudentAttendanceSummary {
                student_id: student.id,
                student_name: student.full_name(),
                student_code: student.student_code.clone(),
                attended_sessions,
                total_sessions,
                attendance_rate: percentage(attended_sessions, total_sessions),
            }
        })
        .collect();

    let attendance_rate = if student_summaries.is_empty() {
        0.0
    } else {
        let sum: f64 = student_summaries.iter().map(|s| s.attendance_rate).sum();
        round_rate(sum / student_summaries.len() as f64)
    };

    CourseReport {
        course_id: course.id,
        course_name: course.name.clone(),
        course_code: course.code.clone(),
        total_sessions,
        total_students: students.len(),
        attendance_rate,
        student_summaries,
    }
}

/// Reports for every active course (or only `course_id`), by ascending id.
pub async fn generate_reports(
    repo: &dyn FullRepository,
    course_id: Option<CourseId>,
) -> ServiceResult<Vec<CourseReport>> {
    let mut courses = repo.list_courses(true).await?;
    if let Some(id) = course_id {
        courses.retain(|c| c.id == id);
    }
    courses.sort_by_key(|c| c.id);

    let students = repo.list_students().await?;
    let mut reports = Vec::with_capacity(courses.len());
    for course in &courses {
        let sessions = repo
            .list_sessions(&SessionFilter::active().for_course(Some(course.id)))
            .await?;
        let attendances = repo
            .list_attendances(&AttendanceFilter::for_course(course.id))
            .await?;
        reports.push(compute_course_report(
            course,
            &sessions,
            &students,
            &attendances,
        ));
    }

    debug!(
        "Generated {} course reports over {} students",
        reports.len(),
        students.len()
    );
    Ok(reports)
}

/// Every student/course pair whose rate is strictly below `threshold`,
/// worst first. Courses without active sessions never alert.
pub fn compute_alerts(reports: &[CourseReport], threshold: f64) -> Vec<AlertRecord> {
    let mut alerts: Vec<AlertRecord> = reports
        .iter()
        .filter(|report| report.total_sessions > 0)
        .flat_map(|report| {
            report
                .student_summaries
                .iter()
                .filter(move |s| s.attendance_rate < threshold)
                .map(move |s| AlertRecord {
                    student_id: s.student_id,
                    student_name: s.student_name.clone(),
                    student_code: s.student_code.clone(),
                    course_id: report.course_id,
                    course_name: report.course_name.clone(),
                    course_code: report.course_code.clone(),
                    attendance_rate: s.attendance_rate,
                    attended_sessions: s.attended_sessions,
                    total_sessions: s.total_sessions,
                    alert_level: AlertLevel::for_rate(s.attendance_rate),
                })
        })
        .collect();

    alerts.sort_by(|a, b| a.attendance_rate.total_cmp(&b.attendance_rate));
    alerts
}

pub async fn generate_alerts(
    repo: &dyn FullRepository,
    threshold: f64,
) -> ServiceResult<Vec<AlertRecord>> {
    let reports = generate_reports(repo, None).await?;
    let alerts = compute_alerts(&reports, threshold);
    debug!("{} attendance alerts below {}", alerts.len(), threshold);
    Ok(alerts)
}
