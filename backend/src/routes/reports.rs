use serde::{Deserialize, Serialize};

use crate::api::{CourseId, StudentId};

/// Threshold used when a caller does not pass one.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 70.0;

/// Rates strictly below this are `Critical`.
pub const CRITICAL_RATE: f64 = 50.0;

/// Per-course attendance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReport {
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub total_sessions: usize,
    pub total_students: usize,
    pub attendance_rate: f64,
    pub student_summaries: Vec<StudentAttendanceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceSummary {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub attended_sessions: usize,
    pub total_sessions: usize,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn for_rate(rate: f64) -> Self {
        if rate < CRITICAL_RATE {
            AlertLevel::Critical
        } else {
            AlertLevel::Warning
        }
    }
}

/// A student/course pair whose rate fell below the requested threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub attendance_rate: f64,
    pub attended_sessions: usize,
    pub total_sessions: usize,
    pub alert_level: AlertLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_level_boundaries() {
        assert_eq!(AlertLevel::for_rate(49.99), AlertLevel::Critical);
        assert_eq!(AlertLevel::for_rate(50.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::for_rate(69.99), AlertLevel::Warning);
        assert_eq!(AlertLevel::for_rate(0.0), AlertLevel::Critical);
    }

    #[test]
    fn test_alert_level_wire_names() {
        assert_eq!(
            serde_json::to_string(&AlertLevel::Critical).unwrap(),
            "\"Critical\""
        );
        assert_eq!(
            serde_json::to_string(&AlertLevel::Warning).unwrap(),
            "\"Warning\""
        );
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CourseReport {
            course_id: CourseId::new(1),
            course_name: "Programación Web".to_string(),
            course_code: "PW001".to_string(),
            total_sessions: 0,
            total_students: 0,
            attendance_rate: 0.0,
            student_summaries: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["courseCode"], "PW001");
        assert_eq!(json["totalSessions"], 0);
        assert!(json["studentSummaries"].as_array().unwrap().is_empty());
    }
}
