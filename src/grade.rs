//! Grade model
//!
//! A grade is a single integer score in `[GRADE_MIN, GRADE_MAX]` for one
//! subject, attributed to exactly one student. Subjects are free-form text.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lowest accepted score (CHECK constraint on `grades`)
pub const GRADE_MIN: i64 = 1;
/// Highest accepted score (CHECK constraint on `grades`)
pub const GRADE_MAX: i64 = 100;

/// A grade row as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    /// References `students.id`; the student must exist
    pub student_id: i64,
    pub subject: String,
    pub grade: i64,
}

/// A grade pending insertion (id is assigned by the database)
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub student_id: i64,
    pub subject: String,
    pub grade: i64,
}

impl NewGrade {
    /// Build a validated grade from raw input
    pub fn new(student_id: i64, subject: &str, grade: i64) -> Result<Self> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(Error::InvalidSubject(subject.to_string()));
        }
        if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
            return Err(Error::GradeOutOfRange(grade));
        }
        Ok(Self {
            student_id,
            subject: subject.to_string(),
            grade,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_range_bounds() {
        assert!(NewGrade::new(1, "Math", GRADE_MIN).is_ok());
        assert!(NewGrade::new(1, "Math", GRADE_MAX).is_ok());

        assert!(matches!(
            NewGrade::new(1, "Math", 0).unwrap_err(),
            Error::GradeOutOfRange(0)
        ));
        assert!(matches!(
            NewGrade::new(1, "Math", 101).unwrap_err(),
            Error::GradeOutOfRange(101)
        ));
    }

    #[test]
    fn test_subject_must_be_non_empty() {
        assert!(NewGrade::new(1, "  ", 50).is_err());

        let grade = NewGrade::new(1, " Science ", 50).unwrap();
        assert_eq!(grade.subject, "Science");
    }
}
