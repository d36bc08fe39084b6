//! Attendance marking against a real database

use library_admin_server::{
    models::{
        attendance::{AttendanceEntry, MarkAttendance},
        AttendanceStatus,
    },
    AppError,
};

use crate::common::{date, spawn_app};

fn entry(student_id: i32, status: AttendanceStatus) -> AttendanceEntry {
    AttendanceEntry {
        student_id,
        status,
        remarks: None,
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn marking_records_every_active_student_and_defaults_to_absent() {
    let day = date(2024, 5, 6);
    let app = spawn_app(day).await;
    let present = app.add_student().await;
    let late = app.add_student().await;
    let unmarked = app.add_student().await;
    let attendance = &app.state.services.attendance;

    let result = attendance
        .mark(
            MarkAttendance {
                attendance_date: day,
                entries: vec![
                    entry(present.id, AttendanceStatus::Present),
                    AttendanceEntry {
                        remarks: Some("bus delayed".to_string()),
                        ..entry(late.id, AttendanceStatus::Late)
                    },
                ],
            },
            &app.admin,
        )
        .await
        .unwrap();
    assert_eq!(result.attendance_date, day);
    assert!(result.marked >= 3);

    let sheet = attendance.sheet(Some(day)).await.unwrap();
    let status_of = |id: i32| sheet.iter().find(|row| row.student_id == id).and_then(|row| row.status);
    assert_eq!(status_of(present.id), Some(AttendanceStatus::Present));
    assert_eq!(status_of(late.id), Some(AttendanceStatus::Late));
    assert_eq!(status_of(unmarked.id), Some(AttendanceStatus::Absent));

    let summary = attendance.summary(Some(day)).await.unwrap();
    assert!(summary.present >= 1 && summary.late >= 1 && summary.absent >= 1);
    assert_eq!(summary.total, summary.present + summary.absent + summary.late);
}

#[tokio::test]
#[ignore]
async fn remarking_a_day_replaces_the_previous_mark() {
    let day = date(2024, 5, 7);
    let app = spawn_app(day).await;
    let student = app.add_student().await;
    let attendance = &app.state.services.attendance;

    for status in [AttendanceStatus::Present, AttendanceStatus::Absent] {
        attendance
            .mark(
                MarkAttendance {
                    attendance_date: day,
                    entries: vec![entry(student.id, status)],
                },
                &app.admin,
            )
            .await
            .unwrap();
    }

    let records: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE student_id = $1 AND attendance_date = $2",
    )
    .bind(student.id)
    .bind(day)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(records, 1);

    let sheet = attendance.sheet(Some(day)).await.unwrap();
    let row = sheet.iter().find(|row| row.student_id == student.id).unwrap();
    assert_eq!(row.status, Some(AttendanceStatus::Absent));
}

#[tokio::test]
#[ignore]
async fn future_dates_cannot_be_marked() {
    let app = spawn_app(date(2024, 5, 8)).await;
    let student = app.add_student().await;

    let err = app
        .state
        .services
        .attendance
        .mark(
            MarkAttendance {
                attendance_date: date(2024, 5, 9),
                entries: vec![entry(student.id, AttendanceStatus::Present)],
            },
            &app.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
#[ignore]
async fn entries_for_inactive_students_are_rejected_without_writing() {
    let day = date(2024, 5, 10);
    let app = spawn_app(day).await;
    let active = app.add_student().await;
    let inactive = app.add_student().await;
    app.deactivate(inactive.id).await;

    let err = app
        .state
        .services
        .attendance
        .mark(
            MarkAttendance {
                attendance_date: day,
                entries: vec![
                    entry(active.id, AttendanceStatus::Present),
                    entry(inactive.id, AttendanceStatus::Present),
                ],
            },
            &app.admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let records: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE student_id = $1 AND attendance_date = $2",
    )
    .bind(active.id)
    .bind(day)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(records, 0);
}
