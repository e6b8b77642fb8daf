//! Student model and name hygiene
//!
//! Names are normalized before they reach storage: surrounding and repeated
//! whitespace is collapsed, each word is title-cased, and only alphabetic
//! words are accepted. The UNIQUE constraint on `students.full_name` is the
//! final arbiter at insert time.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Latest birth year the schema accepts (CHECK constraint on `students`)
pub const MAX_BIRTH_YEAR: i64 = 2025;

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+(?: [A-Za-z]+)*$").expect("valid name pattern")
    })
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Normalize a raw name: collapse whitespace, title-case each word, and
/// reject anything that is empty or contains non-alphabetic characters.
pub fn normalize_name(raw: &str) -> Result<String> {
    let collapsed = raw
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if !name_pattern().is_match(&collapsed) {
        return Err(Error::InvalidName(raw.trim().to_string()));
    }

    Ok(collapsed)
}

/// A student row as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// System-generated row id
    pub id: i64,
    /// Unique across all students
    pub full_name: String,
    pub birth_year: i64,
}

/// A student pending insertion (id is assigned by the database)
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub full_name: String,
    pub birth_year: i64,
}

impl NewStudent {
    /// Build a validated student from raw input
    pub fn new(raw_name: &str, birth_year: i64) -> Result<Self> {
        let full_name = normalize_name(raw_name)?;
        if birth_year > MAX_BIRTH_YEAR {
            return Err(Error::BirthYearInFuture(birth_year));
        }
        Ok(Self {
            full_name,
            birth_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_cases_and_trims() {
        assert_eq!(normalize_name("  alice   johnson ").unwrap(), "Alice Johnson");
        assert_eq!(normalize_name("CARLA REYES").unwrap(), "Carla Reyes");
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize_name("").is_err());
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name("al1ce").is_err());
        assert!(normalize_name("alice_johnson").is_err());
    }

    #[test]
    fn test_new_student_birth_year_bounds() {
        assert!(NewStudent::new("Alice Johnson", MAX_BIRTH_YEAR).is_ok());

        let err = NewStudent::new("Alice Johnson", 2026).unwrap_err();
        assert!(matches!(err, Error::BirthYearInFuture(2026)));
    }
}
