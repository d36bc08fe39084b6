//! Book issue and return workflow
//!
//! Apart from catalog edits to a book's copy total, issuing and returning are
//! the only operations that move `books.available_copies`. Each runs in a
//! single transaction so the copy count and the issue row move together.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    clock::Clock,
    config::{FineBasis, LendingConfig},
    error::{AppError, AppResult},
    models::{
        admin::AdminContext,
        book::BookShort,
        enums::StudentStatus,
        issue::{CreateIssue, Issue, OpenIssue, OpenIssueRow, ReturnIssue, ReturnReceipt, StudentIssue},
        student::StudentShort,
    },
    repository::Repository,
};

/// Loan duration and overdue fine rules
#[derive(Debug, Clone, Copy)]
pub struct FinePolicy {
    pub issue_duration_days: u32,
    pub fine_per_day: u32,
    pub basis: FineBasis,
}

impl From<&LendingConfig> for FinePolicy {
    fn from(config: &LendingConfig) -> Self {
        Self {
            issue_duration_days: config.issue_duration_days,
            fine_per_day: config.fine_per_day,
            basis: config.fine_basis,
        }
    }
}

impl FinePolicy {
    /// Due date used when the caller does not supply one
    pub fn default_due_date(&self, issue_date: NaiveDate) -> NaiveDate {
        issue_date + Duration::days(i64::from(self.issue_duration_days))
    }

    /// Whole days past `due_date` as of `on`, never negative
    pub fn days_overdue(&self, due_date: NaiveDate, on: NaiveDate) -> i64 {
        (on - due_date).num_days().max(0)
    }

    /// Fine owed for an issue due on `due_date`, evaluated on `on`
    pub fn fine_on(&self, due_date: NaiveDate, on: NaiveDate) -> Decimal {
        Decimal::from(self.days_overdue(due_date, on)) * Decimal::from(self.fine_per_day)
    }

    /// Date a return is charged against
    pub fn charge_date(&self, return_date: NaiveDate, today: NaiveDate) -> NaiveDate {
        match self.basis {
            FineBasis::ReturnDate => return_date,
            FineBasis::Today => today,
        }
    }
}

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    policy: FinePolicy,
    clock: Arc<dyn Clock>,
}

impl LendingService {
    pub fn new(repository: Repository, policy: FinePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            policy,
            clock,
        }
    }

    /// Issue a book to an active student
    pub async fn issue_book(&self, request: CreateIssue, admin: &AdminContext) -> AppResult<Issue> {
        let today = self.clock.today();
        let issue_date = request.issue_date.unwrap_or(today);
        let due_date = request
            .due_date
            .unwrap_or_else(|| self.policy.default_due_date(issue_date));

        if issue_date > today {
            return Err(AppError::Validation(format!(
                "Issue date {} is in the future",
                issue_date
            )));
        }

        if issue_date > due_date {
            return Err(AppError::Validation(format!(
                "Due date {} is before issue date {}",
                due_date, issue_date
            )));
        }

        let mut tx = self.repository.pool.begin().await?;

        match self.repository.students.lock_status(&mut tx, request.student_id).await? {
            None => {
                return Err(AppError::NotFound(format!(
                    "Student with id {} not found",
                    request.student_id
                )))
            }
            Some(StudentStatus::Inactive) => {
                tracing::warn!(student_id = request.student_id, "Refused issue to inactive student");
                return Err(AppError::BusinessRule(format!(
                    "Student {} is not active",
                    request.student_id
                )));
            }
            Some(StudentStatus::Active) => {}
        }

        if !self.repository.books.take_copy(&mut tx, request.book_id).await? {
            if !self.repository.books.exists(&mut tx, request.book_id).await? {
                return Err(AppError::NotFound(format!(
                    "Book with id {} not found",
                    request.book_id
                )));
            }
            tracing::warn!(book_id = request.book_id, "Refused issue, no copies available");
            return Err(AppError::NoCopiesAvailable(format!(
                "Book {} has no available copies",
                request.book_id
            )));
        }

        let issue = self
            .repository
            .issues
            .insert(
                &mut tx,
                request.book_id,
                request.student_id,
                issue_date,
                due_date,
                admin.admin_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            issue_id = issue.id,
            book_id = issue.book_id,
            student_id = issue.student_id,
            due_date = %issue.due_date,
            admin = %admin.username,
            "Book issued"
        );

        Ok(issue)
    }

    /// Return an issued book, fixing its fine
    pub async fn return_book(
        &self,
        issue_id: i32,
        request: ReturnIssue,
        admin: &AdminContext,
    ) -> AppResult<ReturnReceipt> {
        let today = self.clock.today();
        let return_date = request.return_date.unwrap_or(today);

        if return_date > today {
            return Err(AppError::Validation(format!(
                "Return date {} is in the future",
                return_date
            )));
        }

        let mut tx = self.repository.pool.begin().await?;

        let issue = self
            .repository
            .issues
            .lock_by_id(&mut tx, issue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue with id {} not found", issue_id)))?;

        if !issue.is_open() {
            return Err(AppError::InvalidState(format!(
                "Issue {} has already been returned",
                issue_id
            )));
        }

        if return_date < issue.issue_date {
            return Err(AppError::Validation(format!(
                "Return date {} is before issue date {}",
                return_date, issue.issue_date
            )));
        }

        let charge_date = self.policy.charge_date(return_date, today);
        let days_overdue = self.policy.days_overdue(issue.due_date, charge_date);
        let fine_amount = self.policy.fine_on(issue.due_date, charge_date);

        let returned = self
            .repository
            .issues
            .mark_returned(&mut tx, issue_id, return_date, fine_amount, admin.admin_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(format!("Issue {} has already been returned", issue_id))
            })?;

        if !self.repository.books.return_copy(&mut tx, issue.book_id).await? {
            return Err(AppError::Internal(format!(
                "Book {} cannot take back a copy for issue {}",
                issue.book_id, issue_id
            )));
        }

        tx.commit().await?;

        tracing::info!(
            issue_id,
            book_id = returned.book_id,
            days_overdue,
            fine = %fine_amount,
            admin = %admin.username,
            "Book returned"
        );

        Ok(ReturnReceipt {
            issue: returned,
            fine_amount,
            days_overdue,
        })
    }

    fn annotate(&self, row: OpenIssueRow) -> OpenIssue {
        let today = self.clock.today();
        let days_overdue = self.policy.days_overdue(row.due_date, today);
        OpenIssue {
            id: row.id,
            book_id: row.book_id,
            student_id: row.student_id,
            book_title: row.book_title,
            author: row.author,
            student_name: row.student_name,
            roll_number: row.roll_number,
            phone: row.phone,
            issue_date: row.issue_date,
            due_date: row.due_date,
            days_overdue,
            current_fine: self.policy.fine_on(row.due_date, today),
            is_overdue: days_overdue > 0,
        }
    }

    /// Open issues annotated with current fine and overdue flag
    pub async fn list_open_issues(&self) -> AppResult<Vec<OpenIssue>> {
        let rows = self.repository.issues.list_open().await?;
        Ok(rows.into_iter().map(|row| self.annotate(row)).collect())
    }

    /// Overdue open issues, oldest due date first
    pub async fn list_overdue(&self, limit: Option<i64>) -> AppResult<Vec<OpenIssue>> {
        let rows = self
            .repository
            .issues
            .list_overdue(self.clock.today(), limit)
            .await?;
        Ok(rows.into_iter().map(|row| self.annotate(row)).collect())
    }

    pub async fn get_issue(&self, id: i32) -> AppResult<Issue> {
        self.repository.issues.get_by_id(id).await
    }

    /// Issue history of a student
    pub async fn list_student_issues(&self, student_id: i32) -> AppResult<Vec<StudentIssue>> {
        self.repository.students.get_by_id(student_id).await?;
        self.repository.issues.list_for_student(student_id).await
    }

    /// Books that can be issued right now
    pub async fn issuable_books(&self) -> AppResult<Vec<BookShort>> {
        self.repository.books.list_available().await
    }

    /// Students that can borrow
    pub async fn eligible_students(&self) -> AppResult<Vec<StudentShort>> {
        self.repository.students.list_active().await
    }
}
