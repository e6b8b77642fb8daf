//! Report Layer - read-only aggregates over the gradebook
//!
//! Six fixed reports plus a whole-class summary:
//! - Grade listing for a named student
//! - Average grade per student / per subject
//! - Students born after a cutoff year
//! - Top performers by average grade
//! - All grades below a threshold

pub mod engine;

pub use engine::{ReportEngine, round2};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Default cutoff year for the birth-year report
pub const DEFAULT_BORN_AFTER_YEAR: i64 = 2004;
/// Default number of rows in the top-performers report
pub const DEFAULT_TOP_LIMIT: usize = 3;
/// Default threshold for the below-threshold report
pub const DEFAULT_BELOW_THRESHOLD: i64 = 80;

fn fmt_average(value: &f64) -> String {
    format!("{value:.2}")
}

/// One grade of one student
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct GradeRow {
    #[tabled(rename = "Student")]
    pub full_name: String,
    #[tabled(rename = "Subject")]
    pub subject: String,
    #[tabled(rename = "Grade")]
    pub grade: i64,
}

/// A student's mean grade, rounded to 2 decimals
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct StudentAverage {
    #[tabled(rename = "Id")]
    pub id: i64,
    #[tabled(rename = "Student")]
    pub full_name: String,
    #[tabled(rename = "Average", display_with = "fmt_average")]
    pub average: f64,
}

/// A subject's mean grade, rounded to 2 decimals
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct SubjectAverage {
    #[tabled(rename = "Subject")]
    pub subject: String,
    #[tabled(rename = "Average", display_with = "fmt_average")]
    pub average: f64,
}

/// A student and their birth year
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct BirthYearRow {
    #[tabled(rename = "Student")]
    pub full_name: String,
    #[tabled(rename = "Born")]
    pub birth_year: i64,
}

/// Whole-class summary over per-student averages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub averages: Vec<StudentAverage>,
    pub min_average: f64,
    pub max_average: f64,
    pub overall_average: f64,
}
