//! Data models

pub mod admin;
pub mod attendance;
pub mod book;
pub mod enums;
pub mod issue;
pub mod report;
pub mod student;

// Re-export commonly used types
pub use admin::{Admin, AdminClaims, AdminContext};
pub use attendance::AttendanceRecord;
pub use book::{Book, BookShort};
pub use enums::{AttendanceStatus, IssueStatus, StudentStatus};
pub use issue::{Issue, OpenIssue};
pub use student::{Student, StudentShort};

/// Trim surrounding whitespace without reallocating clean input
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
