//! Sample dataset
//!
//! Nine students and seventeen grades. Every student has one Math grade;
//! some also have English and Science grades.

use crate::grade::NewGrade;
use crate::storage::GradebookStore;
use crate::student::NewStudent;
use crate::Result;

/// One seed student with their grades as (subject, score) pairs
pub struct SeedStudent {
    pub full_name: &'static str,
    pub birth_year: i64,
    pub grades: &'static [(&'static str, i64)],
}

/// The sample roster, in insertion (id) order
pub const SAMPLE_STUDENTS: &[SeedStudent] = &[
    SeedStudent {
        full_name: "Alice Johnson",
        birth_year: 2005,
        grades: &[("Math", 88), ("English", 92), ("Science", 85)],
    },
    SeedStudent {
        full_name: "Brian Osei",
        birth_year: 2004,
        grades: &[("Math", 75), ("English", 72)],
    },
    SeedStudent {
        full_name: "Carla Reyes",
        birth_year: 2006,
        grades: &[("Math", 91), ("English", 95), ("Science", 89)],
    },
    SeedStudent {
        full_name: "Daniel Kim",
        birth_year: 2007,
        grades: &[("Math", 84)],
    },
    SeedStudent {
        full_name: "Elena Petrova",
        birth_year: 2003,
        grades: &[("Math", 88), ("Science", 79)],
    },
    SeedStudent {
        full_name: "Felix Nguyen",
        birth_year: 2005,
        grades: &[("Math", 78)],
    },
    SeedStudent {
        full_name: "Grace Patel",
        birth_year: 2006,
        grades: &[("Math", 90), ("English", 88)],
    },
    SeedStudent {
        full_name: "Hassan Ali",
        birth_year: 2004,
        grades: &[("Math", 83)],
    },
    SeedStudent {
        full_name: "Isabella Martinez",
        birth_year: 2007,
        grades: &[("Math", 89), ("Science", 91)],
    },
];

/// Counts of what a seed run inserted
#[derive(Debug, Clone, Copy)]
pub struct SeedSummary {
    pub students: usize,
    pub grades: usize,
}

/// Insert the sample dataset.
///
/// Inserts are row-at-a-time; seeding an already-seeded database fails on
/// the first duplicate student name and leaves the tables unchanged.
pub fn seed(store: &GradebookStore) -> Result<SeedSummary> {
    let mut summary = SeedSummary {
        students: 0,
        grades: 0,
    };

    for entry in SAMPLE_STUDENTS {
        let student = NewStudent::new(entry.full_name, entry.birth_year)?;
        let student_id = store.insert_student(&student).map_err(|err| {
            if err.is_unique_violation() {
                tracing::warn!("seed aborted: student {:?} already exists", entry.full_name);
            }
            err
        })?;
        summary.students += 1;

        for (subject, score) in entry.grades {
            store.insert_grade(&NewGrade::new(student_id, subject, *score)?)?;
            summary.grades += 1;
        }
    }

    tracing::info!(
        "seeded {} students and {} grades",
        summary.students,
        summary.grades
    );
    Ok(summary)
}
