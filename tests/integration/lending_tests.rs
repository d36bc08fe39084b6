//! Issue and return workflow against a real database

use std::collections::HashSet;

use rust_decimal::Decimal;

use library_admin_server::{
    config::FineBasis,
    models::{
        issue::{CreateIssue, ReturnIssue},
        IssueStatus,
    },
    AppError,
};

use crate::common::{date, spawn_app, spawn_app_with, TestApp};

fn request(book_id: i32, student_id: i32) -> CreateIssue {
    CreateIssue {
        book_id,
        student_id,
        issue_date: None,
        due_date: None,
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn issue_takes_a_copy_and_defaults_due_date() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let book = app.add_book(2).await;
    let student = app.add_student().await;

    let issue = app
        .state
        .services
        .lending
        .issue_book(request(book.id, student.id), &app.admin)
        .await
        .unwrap();

    assert_eq!(issue.status, IssueStatus::Issued);
    assert_eq!(issue.issue_date, date(2024, 1, 1));
    assert_eq!(issue.due_date, date(2024, 1, 15));
    assert_eq!(issue.fine_amount, Decimal::ZERO);
    assert_eq!(issue.issued_by, Some(app.admin.admin_id));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn issue_without_copies_is_refused() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let book = app.add_book(1).await;
    let first = app.add_student().await;
    let second = app.add_student().await;
    let lending = &app.state.services.lending;

    lending.issue_book(request(book.id, first.id), &app.admin).await.unwrap();
    let err = lending
        .issue_book(request(book.id, second.id), &app.admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoCopiesAvailable(_)));
    assert_eq!(app.available_copies(book.id).await, 0);
}

#[tokio::test]
#[ignore]
async fn issue_to_inactive_student_is_a_business_rule_violation() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    app.deactivate(student.id).await;

    let err = app
        .state
        .services
        .lending
        .issue_book(request(book.id, student.id), &app.admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn issue_with_unknown_book_or_student_is_not_found() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let lending = &app.state.services.lending;

    let err = lending
        .issue_book(request(i32::MAX, student.id), &app.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = lending
        .issue_book(request(book.id, i32::MAX), &app.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn due_date_before_issue_date_is_rejected() {
    let app = spawn_app(date(2024, 1, 10)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;

    let err = app
        .state
        .services
        .lending
        .issue_book(
            CreateIssue {
                book_id: book.id,
                student_id: student.id,
                issue_date: Some(date(2024, 1, 10)),
                due_date: Some(date(2024, 1, 9)),
            },
            &app.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn late_return_is_fined_five_per_day_and_restores_the_copy() {
    let app = spawn_app(date(2024, 1, 20)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let lending = &app.state.services.lending;

    let issue = lending
        .issue_book(
            CreateIssue {
                book_id: book.id,
                student_id: student.id,
                issue_date: Some(date(2024, 1, 1)),
                due_date: None,
            },
            &app.admin,
        )
        .await
        .unwrap();
    assert_eq!(issue.due_date, date(2024, 1, 15));

    let receipt = lending
        .return_book(issue.id, ReturnIssue::default(), &app.admin)
        .await
        .unwrap();

    assert_eq!(receipt.days_overdue, 5);
    assert_eq!(receipt.fine_amount, Decimal::from(25));
    assert_eq!(receipt.issue.status, IssueStatus::Returned);
    assert_eq!(receipt.issue.return_date, Some(date(2024, 1, 20)));
    assert_eq!(receipt.issue.fine_amount, Decimal::from(25));
    assert_eq!(receipt.issue.returned_by, Some(app.admin.admin_id));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn on_time_return_has_no_fine() {
    let app = spawn_app(date(2024, 1, 15)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let lending = &app.state.services.lending;

    let issue = lending
        .issue_book(
            CreateIssue {
                book_id: book.id,
                student_id: student.id,
                issue_date: Some(date(2024, 1, 1)),
                due_date: None,
            },
            &app.admin,
        )
        .await
        .unwrap();

    let receipt = lending
        .return_book(issue.id, ReturnIssue::default(), &app.admin)
        .await
        .unwrap();

    assert_eq!(receipt.days_overdue, 0);
    assert_eq!(receipt.fine_amount, Decimal::ZERO);
}

#[tokio::test]
#[ignore]
async fn second_return_is_invalid_state_and_leaves_copies_alone() {
    let app = spawn_app(date(2024, 1, 5)).await;
    let book = app.add_book(3).await;
    let student = app.add_student().await;
    let lending = &app.state.services.lending;

    let issue = lending.issue_book(request(book.id, student.id), &app.admin).await.unwrap();
    lending
        .return_book(issue.id, ReturnIssue::default(), &app.admin)
        .await
        .unwrap();

    let err = lending
        .return_book(issue.id, ReturnIssue::default(), &app.admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(app.available_copies(book.id).await, 3);
}

#[tokio::test]
#[ignore]
async fn return_of_unknown_issue_is_not_found() {
    let app = spawn_app(date(2024, 1, 5)).await;

    let err = app
        .state
        .services
        .lending
        .return_book(i32::MAX, ReturnIssue::default(), &app.admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn return_before_issue_date_is_rejected() {
    let app = spawn_app(date(2024, 1, 5)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let lending = &app.state.services.lending;

    let issue = lending.issue_book(request(book.id, student.id), &app.admin).await.unwrap();
    let err = lending
        .return_book(
            issue.id,
            ReturnIssue {
                return_date: Some(date(2024, 1, 4)),
            },
            &app.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.available_copies(book.id).await, 0);
    assert!(lending.get_issue(issue.id).await.unwrap().is_open());
}

async fn issue_on(app: &TestApp, book_id: i32, student_id: i32, issue_date: chrono::NaiveDate) -> i32 {
    app.state
        .services
        .lending
        .issue_book(
            CreateIssue {
                book_id,
                student_id,
                issue_date: Some(issue_date),
                due_date: None,
            },
            &app.admin,
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore]
async fn future_return_date_is_rejected_and_issue_stays_open() {
    let app = spawn_app(date(2024, 1, 20)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let issue_id = issue_on(&app, book.id, student.id, date(2024, 1, 1)).await;
    let lending = &app.state.services.lending;

    let err = lending
        .return_book(
            issue_id,
            ReturnIssue {
                return_date: Some(date(2025, 1, 1)),
            },
            &app.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    let issue = lending.get_issue(issue_id).await.unwrap();
    assert!(issue.is_open());
    assert_eq!(issue.fine_amount, Decimal::ZERO);
    assert_eq!(app.available_copies(book.id).await, 0);
}

#[tokio::test]
#[ignore]
async fn future_issue_date_is_rejected() {
    let app = spawn_app(date(2024, 1, 20)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;

    let err = app
        .state
        .services
        .lending
        .issue_book(
            CreateIssue {
                book_id: book.id,
                student_id: student.id,
                issue_date: Some(date(2024, 1, 21)),
                due_date: None,
            },
            &app.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn charged_fine_matches_the_open_issue_preview() {
    let app = spawn_app(date(2024, 1, 20)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let issue_id = issue_on(&app, book.id, student.id, date(2024, 1, 1)).await;
    let lending = &app.state.services.lending;

    let open = lending.list_open_issues().await.unwrap();
    let preview = open.iter().find(|i| i.id == issue_id).unwrap();
    assert!(preview.is_overdue);

    let receipt = lending
        .return_book(issue_id, ReturnIssue::default(), &app.admin)
        .await
        .unwrap();

    assert_eq!(receipt.fine_amount, preview.current_fine);
    assert_eq!(receipt.days_overdue, preview.days_overdue);
    assert_eq!(receipt.fine_amount, Decimal::from(25));
}

#[tokio::test]
#[ignore]
async fn backdated_return_is_charged_up_to_the_return_date() {
    let app = spawn_app(date(2024, 1, 20)).await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let issue_id = issue_on(&app, book.id, student.id, date(2024, 1, 1)).await;

    let receipt = app
        .state
        .services
        .lending
        .return_book(
            issue_id,
            ReturnIssue {
                return_date: Some(date(2024, 1, 16)),
            },
            &app.admin,
        )
        .await
        .unwrap();

    assert_eq!(receipt.issue.return_date, Some(date(2024, 1, 16)));
    assert_eq!(receipt.days_overdue, 1);
    assert_eq!(receipt.fine_amount, Decimal::from(5));
}

#[tokio::test]
#[ignore]
async fn today_basis_charges_a_backdated_return_up_to_today() {
    let app = spawn_app_with(date(2024, 1, 20), |config| {
        config.lending.fine_basis = FineBasis::Today;
    })
    .await;
    let book = app.add_book(1).await;
    let student = app.add_student().await;
    let issue_id = issue_on(&app, book.id, student.id, date(2024, 1, 1)).await;

    let receipt = app
        .state
        .services
        .lending
        .return_book(
            issue_id,
            ReturnIssue {
                return_date: Some(date(2024, 1, 16)),
            },
            &app.admin,
        )
        .await
        .unwrap();

    assert_eq!(receipt.issue.return_date, Some(date(2024, 1, 16)));
    assert_eq!(receipt.days_overdue, 5);
    assert_eq!(receipt.fine_amount, Decimal::from(25));
    assert_eq!(receipt.issue.fine_amount, Decimal::from(25));
    assert_eq!(app.available_copies(book.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_issues_never_oversubscribe_a_book() {
    let app = spawn_app(date(2024, 2, 1)).await;
    let book = app.add_book(1).await;

    let mut students = Vec::new();
    for _ in 0..8 {
        students.push(app.add_student().await);
    }

    let mut handles = Vec::new();
    for student in students {
        let lending = app.state.services.lending.clone();
        let admin = app.admin.clone();
        let book_id = book.id;
        handles.push(tokio::spawn(async move {
            lending.issue_book(request(book_id, student.id), &admin).await
        }));
    }

    let mut issued = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(AppError::NoCopiesAvailable(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(issued, 1);
    assert_eq!(app.available_copies(book.id).await, 0);

    let open: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM book_issues WHERE book_id = $1 AND status = 'issued'",
    )
    .bind(book.id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(open, 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_returns_of_one_issue_succeed_once() {
    let app = spawn_app(date(2024, 2, 1)).await;
    let book = app.add_book(2).await;
    let student = app.add_student().await;

    let issue = app
        .state
        .services
        .lending
        .issue_book(request(book.id, student.id), &app.admin)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let lending = app.state.services.lending.clone();
        let admin = app.admin.clone();
        handles.push(tokio::spawn(async move {
            lending.return_book(issue.id, ReturnIssue::default(), &admin).await
        }));
    }

    let mut returned = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => returned += 1,
            Err(AppError::InvalidState(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(returned, 1);
    assert_eq!(app.available_copies(book.id).await, 2);
}

#[tokio::test]
#[ignore]
async fn open_issue_listing_flags_overdue_loans() {
    let app = spawn_app(date(2024, 3, 1)).await;
    let book = app.add_book(2).await;
    let late = app.add_student().await;
    let fresh = app.add_student().await;
    let lending = &app.state.services.lending;

    let overdue = lending
        .issue_book(
            CreateIssue {
                book_id: book.id,
                student_id: late.id,
                issue_date: Some(date(2024, 2, 1)),
                due_date: Some(date(2024, 2, 20)),
            },
            &app.admin,
        )
        .await
        .unwrap();
    let current = lending.issue_book(request(book.id, fresh.id), &app.admin).await.unwrap();

    let open = lending.list_open_issues().await.unwrap();
    let late_row = open.iter().find(|i| i.id == overdue.id).unwrap();
    assert!(late_row.is_overdue);
    assert_eq!(late_row.days_overdue, 10);
    assert_eq!(late_row.current_fine, Decimal::from(50));
    assert_eq!(late_row.roll_number, late.roll_number);

    let fresh_row = open.iter().find(|i| i.id == current.id).unwrap();
    assert!(!fresh_row.is_overdue);
    assert_eq!(fresh_row.current_fine, Decimal::ZERO);

    let overdue_ids: HashSet<i32> = lending
        .list_overdue(None)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert!(overdue_ids.contains(&overdue.id));
    assert!(!overdue_ids.contains(&current.id));

    let history = lending.list_student_issues(late.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, IssueStatus::Issued);
}
