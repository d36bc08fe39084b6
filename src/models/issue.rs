//! Book issue (loan) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::IssueStatus;

/// Issue model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Issue {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Set once, when the issue is returned
    pub return_date: Option<NaiveDate>,
    pub status: IssueStatus,
    /// Fixed at return time; zero while issued
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
    pub issued_by: Option<i32>,
    pub returned_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Issued
    }
}

/// Open issue joined with display fields, before fine annotation
#[derive(Debug, Clone, FromRow)]
pub struct OpenIssueRow {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub book_title: String,
    pub author: String,
    pub student_name: String,
    pub roll_number: String,
    pub phone: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Open issue annotated with the fine it would carry if returned today
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OpenIssue {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub book_title: String,
    pub author: String,
    pub student_name: String,
    pub roll_number: String,
    pub phone: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
    #[schema(value_type = String)]
    pub current_fine: Decimal,
    pub is_overdue: bool,
}

/// Issue history entry for a student, with the book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentIssue {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: IssueStatus,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
}

/// Issue a book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIssue {
    pub book_id: i32,
    pub student_id: i32,
    /// Defaults to today
    pub issue_date: Option<NaiveDate>,
    /// Defaults to issue date plus the configured loan duration
    pub due_date: Option<NaiveDate>,
}

/// Return a book request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReturnIssue {
    /// Defaults to today
    pub return_date: Option<NaiveDate>,
}

/// Outcome of a return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub issue: Issue,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
    pub days_overdue: i64,
}
