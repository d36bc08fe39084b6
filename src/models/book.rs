//! Book (catalog) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::trim_in_place;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    /// Physical copies owned by the library
    pub total_copies: i32,
    /// Copies not currently on loan; only changed by issue and return
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Copies currently on loan
    pub fn copies_on_loan(&self) -> i32 {
        self.total_copies - self.available_copies
    }
}

/// Short book representation for the issue form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub available_copies: i32,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Matches title, author, ISBN or category
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Invalid publication year"))]
    pub publication_year: Option<i32>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: i32,
}

/// Update book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Invalid publication year"))]
    pub publication_year: Option<i32>,
    /// Changing the total shifts available copies by the same amount
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
}

impl CreateBook {
    /// Strip surrounding whitespace from title and author before validation
    pub fn trimmed(mut self) -> Self {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.author);
        self
    }
}

impl UpdateBook {
    pub fn trimmed(mut self) -> Self {
        if let Some(title) = self.title.as_mut() {
            trim_in_place(title);
        }
        if let Some(author) = self.author.as_mut() {
            trim_in_place(author);
        }
        self
    }
}
