//! Student model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::StudentStatus, trim_in_place};

/// Student model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    /// Unique roll number
    pub roll_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year_of_study: Option<i32>,
    pub address: Option<String>,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Short student representation for the issue form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentShort {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
}

/// Student list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    /// Matches name, roll number, email or department (all statuses)
    pub search: Option<String>,
    /// Status filter when not searching (default: active)
    pub status: Option<StudentStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Roll number is required"))]
    pub roll_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Year of study must be between 1 and 10"))]
    pub year_of_study: Option<i32>,
    pub address: Option<String>,
}

/// Update student request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Roll number cannot be empty"))]
    pub roll_number: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Year of study must be between 1 and 10"))]
    pub year_of_study: Option<i32>,
    pub address: Option<String>,
    pub status: Option<StudentStatus>,
}

impl CreateStudent {
    /// Strip surrounding whitespace from name and roll number before validation
    pub fn trimmed(mut self) -> Self {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.roll_number);
        self
    }
}

impl UpdateStudent {
    pub fn trimmed(mut self) -> Self {
        if let Some(name) = self.name.as_mut() {
            trim_in_place(name);
        }
        if let Some(roll_number) = self.roll_number.as_mut() {
            trim_in_place(roll_number);
        }
        self
    }
}
