#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveTime, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::api::{
        CourseId, CourseUpdate, NewAttendance, NewCourse, NewSession, NewStudent, SessionId,
        SessionUpdate, StudentId,
    };
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::AttendanceRepository;
    use crate::models::FixedClock;
    use crate::services::catalog::*;
    use crate::services::ServiceError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::on(today())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn juan() -> NewStudent {
        NewStudent {
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            email: "juan.perez@email.com".into(),
            student_code: "EST001".into(),
        }
    }

    fn web_course() -> NewCourse {
        NewCourse {
            name: "Programación Web".into(),
            code: "PW001".into(),
            description: "Curso de desarrollo web con tecnologías modernas".into(),
            instructor_name: "Dr. Ana López".into(),
        }
    }

    fn new_session(course_id: CourseId, date: NaiveDate, hour: u32) -> NewSession {
        NewSession {
            course_id,
            title: format!("Clase {}", hour),
            date,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 2, 0, 0).unwrap(),
            unique_code: None,
        }
    }

    #[tokio::test]
    async fn test_student_crud() {
        let repo = LocalRepository::new();
        let created = create_student(&repo, &clock(), &juan()).await.unwrap();
        assert_eq!(get_student(&repo, created.id).await.unwrap(), created);
        assert_eq!(
            get_student_by_code(&repo, "EST001").await.unwrap().id,
            created.id
        );

        let mut changed = juan();
        changed.last_name = "Pérez Gómez".into();
        let updated = update_student(&repo, created.id, &changed).await.unwrap();
        assert_eq!(updated.full_name(), "Juan Pérez Gómez");
        assert_eq!(list_students(&repo).await.unwrap().len(), 1);

        delete_student(&repo, created.id).await.unwrap();
        assert!(matches!(
            get_student(&repo, created.id).await,
            Err(ServiceError::NotFound { entity: "Student", .. })
        ));
        assert!(matches!(
            delete_student(&repo, created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = LocalRepository::new();
        create_student(&repo, &clock(), &juan()).await.unwrap();
        let mut other = juan();
        other.student_code = "EST002".into();
        let err = create_student(&repo, &clock(), &other).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blank_name_is_validation_error() {
        let repo = LocalRepository::new();
        let mut student = juan();
        student.first_name = "   ".into();
        let err = create_student(&repo, &clock(), &student).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_student_not_found() {
        let repo = LocalRepository::new();
        let err = update_student(&repo, StudentId::new(3), &juan())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_course_soft_delete() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        assert!(course.is_active);
        create_session(&repo, &clock(), &mut rng(), &new_session(course.id, today(), 8))
            .await
            .unwrap();

        let listed = list_courses(&repo).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].sessions.len(), 1);

        deactivate_course(&repo, course.id).await.unwrap();
        assert!(list_courses(&repo).await.unwrap().is_empty());

        let fetched = get_course(&repo, course.id).await.unwrap();
        assert!(!fetched.course.is_active);
        assert_eq!(fetched.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_update_course() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let update = CourseUpdate {
            name: "Programación Web II".into(),
            code: "PW002".into(),
            description: String::new(),
            instructor_name: "Dr. Ana López".into(),
            is_active: true,
        };
        let updated = update_course(&repo, course.id, &update).await.unwrap();
        assert_eq!(updated.code, "PW002");
        assert!(matches!(
            update_course(&repo, CourseId::new(77), &update).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_gets_generated_code() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let session =
            create_session(&repo, &clock(), &mut rng(), &new_session(course.id, today(), 8))
                .await
                .unwrap();
        assert_eq!(session.unique_code.len(), 6);
        assert!(session.unique_code.chars().all(|c| c.is_ascii_digit()));
        assert!(session.is_active);
    }

    #[tokio::test]
    async fn test_explicit_code_kept_and_unique() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let mut request = new_session(course.id, today(), 8);
        request.unique_code = Some("654321".into());
        let session = create_session(&repo, &clock(), &mut rng(), &request)
            .await
            .unwrap();
        assert_eq!(session.unique_code, "654321");

        let err = create_session(&repo, &clock(), &mut rng(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_session_needs_existing_course() {
        let repo = LocalRepository::new();
        let err = create_session(
            &repo,
            &clock(),
            &mut rng(),
            &new_session(CourseId::new(9), today(), 8),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_session_lookup_by_code() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let mut request = new_session(course.id, today(), 8);
        request.unique_code = Some("111111".into());
        let todays = create_session(&repo, &clock(), &mut rng(), &request)
            .await
            .unwrap();
        let mut request = new_session(course.id, today() + Duration::days(1), 8);
        request.unique_code = Some("222222".into());
        create_session(&repo, &clock(), &mut rng(), &request)
            .await
            .unwrap();

        assert_eq!(
            get_session_by_code(&repo, &clock(), "111111").await.unwrap().id,
            todays.id
        );
        assert!(matches!(
            get_session_by_code(&repo, &clock(), "222222").await,
            Err(ServiceError::SessionNotActiveToday)
        ));
        assert!(matches!(
            get_session_by_code(&repo, &clock(), "999999").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            get_session_by_code(&repo, &clock(), " 111111 ").await,
            Err(ServiceError::NotFound { .. })
        ));

        deactivate_session(&repo, todays.id).await.unwrap();
        assert!(matches!(
            get_session_by_code(&repo, &clock(), "111111").await,
            Err(ServiceError::NotFound { .. })
        ));
        // Still reachable by id after the soft delete.
        assert!(!get_session(&repo, todays.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_list_sessions_filters_and_orders() {
        let repo = LocalRepository::new();
        let web = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let mut db_course = web_course();
        db_course.code = "BD001".into();
        let db = create_course(&repo, &clock(), &db_course).await.unwrap();

        let later = create_session(
            &repo,
            &clock(),
            &mut rng(),
            &new_session(web.id, today() + Duration::days(2), 8),
        )
        .await
        .unwrap();
        let afternoon =
            create_session(&repo, &clock(), &mut rng(), &new_session(web.id, today(), 14))
                .await
                .unwrap();
        let morning =
            create_session(&repo, &clock(), &mut rng(), &new_session(web.id, today(), 8))
                .await
                .unwrap();
        create_session(&repo, &clock(), &mut rng(), &new_session(db.id, today(), 8))
            .await
            .unwrap();

        let ids: Vec<SessionId> = list_sessions(&repo, Some(web.id))
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![morning.id, afternoon.id, later.id]);
        assert_eq!(list_sessions(&repo, None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_session_keeps_code_when_absent() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let session =
            create_session(&repo, &clock(), &mut rng(), &new_session(course.id, today(), 8))
                .await
                .unwrap();

        let update = SessionUpdate {
            course_id: course.id,
            title: "Laboratorio".into(),
            date: today(),
            start_time: session.start_time,
            end_time: session.end_time,
            unique_code: None,
            is_active: true,
        };
        let updated = update_session(&repo, session.id, &update).await.unwrap();
        assert_eq!(updated.title, "Laboratorio");
        assert_eq!(updated.unique_code, session.unique_code);
    }

    #[tokio::test]
    async fn test_student_portal() {
        let repo = LocalRepository::new();
        let student = create_student(&repo, &clock(), &juan()).await.unwrap();
        let web = create_course(&repo, &clock(), &web_course()).await.unwrap();
        let mut past_only = web_course();
        past_only.code = "BD001".into();
        let past_course = create_course(&repo, &clock(), &past_only).await.unwrap();

        let yesterday =
            create_session(&repo, &clock(), &mut rng(), &new_session(web.id, today() - Duration::days(1), 8))
                .await
                .unwrap();
        let next_week = create_session(
            &repo,
            &clock(),
            &mut rng(),
            &new_session(web.id, today() + Duration::days(7), 8),
        )
        .await
        .unwrap();
        let todays =
            create_session(&repo, &clock(), &mut rng(), &new_session(web.id, today(), 10))
                .await
                .unwrap();
        create_session(
            &repo,
            &clock(),
            &mut rng(),
            &new_session(past_course.id, today() - Duration::days(3), 8),
        )
        .await
        .unwrap();

        repo.insert_attendance(&NewAttendance::present(
            student.id,
            todays.id,
            Utc::now(),
            Some("presente".into()),
        ))
        .await
        .unwrap();

        let portal = student_portal(&repo, &clock(), student.id).await.unwrap();
        assert_eq!(portal.student.id, student.id);
        assert_eq!(portal.courses.len(), 1);

        let sessions = &portal.courses[0].sessions;
        let ids: Vec<SessionId> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![todays.id, next_week.id]);
        assert!(!ids.contains(&yesterday.id));

        assert!(sessions[0].is_today);
        let status = sessions[0].attendance_status.as_ref().unwrap();
        assert!(status.is_present);
        assert_eq!(status.notes.as_deref(), Some("presente"));
        assert!(!sessions[1].is_today);
        assert!(sessions[1].attendance_status.is_none());
    }

    #[tokio::test]
    async fn test_portal_unknown_student() {
        let repo = LocalRepository::new();
        let err = student_portal(&repo, &clock(), StudentId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::StudentNotFound));
    }
}
