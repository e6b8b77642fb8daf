//! # Gradebook - student and per-subject grade tracking
//!
//! A small relational gradebook backed by embedded SQLite.
//!
//! Gradebook provides:
//! - A two-table schema (students, grades) with uniqueness, check and
//!   foreign-key constraints enforced at insert time
//! - A seeded sample dataset of nine students and seventeen grades
//! - Read-only aggregate reports: per-student grade listings, per-student
//!   and per-subject averages, birth-year filters, top performers and
//!   below-threshold listings

pub mod config;
pub mod grade;
pub mod reports;
pub mod seed;
pub mod storage;
pub mod student;
pub mod ui;

// Re-exports for convenient access
pub use grade::{GRADE_MAX, GRADE_MIN, Grade, NewGrade};
pub use reports::ReportEngine;
pub use storage::GradebookStore;
pub use student::{MAX_BIRTH_YEAR, NewStudent, Student};

/// Result type alias for Gradebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Gradebook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid student name: {0:?}")]
    InvalidName(String),

    #[error("Invalid subject: {0:?}")]
    InvalidSubject(String),

    #[error("Grade {0} is out of range (1-100)")]
    GradeOutOfRange(i64),

    #[error("Birth year {0} is beyond 2025")]
    BirthYearInFuture(i64),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for any SQLite constraint failure (unique, check, foreign key)
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Storage(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    /// True when a UNIQUE constraint rejected the row
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Error::Storage(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }

    /// True when a CHECK constraint rejected the row
    pub fn is_check_violation(&self) -> bool {
        matches!(
            self,
            Error::Storage(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK
        )
    }

    /// True when a foreign-key constraint rejected the row
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            Error::Storage(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        )
    }
}
