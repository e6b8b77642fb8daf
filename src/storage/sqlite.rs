//! SQLite storage implementation

use super::schema;
use crate::Result;
use crate::grade::{Grade, NewGrade};
use crate::student::{NewStudent, Student};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite-backed storage for the gradebook
pub struct GradebookStore {
    conn: Connection,
}

impl GradebookStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("opened gradebook database at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    ///
    /// Foreign keys are off by default in SQLite and must be switched on
    /// per connection.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Student Operations ==========

    /// Insert a student, returning the assigned row id.
    ///
    /// A duplicate `full_name` or an out-of-range `birth_year` fails the
    /// insert with a constraint violation and applies nothing.
    pub fn insert_student(&self, student: &NewStudent) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO students (full_name, birth_year) VALUES (?1, ?2)",
            params![student.full_name, student.birth_year],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a student by exact full name
    pub fn get_student_by_name(&self, full_name: &str) -> Result<Option<Student>> {
        self.conn
            .query_row(
                "SELECT id, full_name, birth_year FROM students WHERE full_name = ?1",
                [full_name],
                |row| self.row_to_student(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// All students, in id order
    pub fn list_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, full_name, birth_year FROM students ORDER BY id")?;

        let students = stmt
            .query_map([], |row| self.row_to_student(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(students)
    }

    /// Find students by name pattern (LIKE query)
    pub fn find_students_by_name_pattern(&self, pattern: &str) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, birth_year FROM students WHERE full_name LIKE ?1 ORDER BY id",
        )?;

        let students = stmt
            .query_map([pattern], |row| self.row_to_student(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(students)
    }

    /// Students born strictly after the given year, in id order
    pub fn students_born_after(&self, year: i64) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, birth_year FROM students WHERE birth_year > ?1 ORDER BY id",
        )?;

        let students = stmt
            .query_map([year], |row| self.row_to_student(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(students)
    }

    /// Count all students
    pub fn count_students(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_student(&self, row: &rusqlite::Row) -> rusqlite::Result<Student> {
        Ok(Student {
            id: row.get(0)?,
            full_name: row.get(1)?,
            birth_year: row.get(2)?,
        })
    }

    // ========== Grade Operations ==========

    /// Insert a grade, returning the assigned row id.
    ///
    /// An out-of-range score or a `student_id` with no matching student
    /// fails the insert with a constraint violation and applies nothing.
    pub fn insert_grade(&self, grade: &NewGrade) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO grades (student_id, subject, grade) VALUES (?1, ?2, ?3)",
            params![grade.student_id, grade.subject, grade.grade],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All grades for one student, in insertion order
    pub fn grades_for_student_id(&self, student_id: i64) -> Result<Vec<Grade>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, student_id, subject, grade FROM grades WHERE student_id = ?1 ORDER BY id",
        )?;

        let grades = stmt
            .query_map([student_id], |row| self.row_to_grade(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(grades)
    }

    /// Count all grades
    pub fn count_grades(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM grades", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count distinct subjects
    pub fn count_subjects(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT subject) FROM grades",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn row_to_grade(&self, row: &rusqlite::Row) -> rusqlite::Result<Grade> {
        Ok(Grade {
            id: row.get(0)?,
            student_id: row.get(1)?,
            subject: row.get(2)?,
            grade: row.get(3)?,
        })
    }

    // ========== Report Queries ==========
    //
    // Raw result rows for the report engine; rounding and presentation
    // policy live in `crate::reports`.

    /// (full_name, subject, grade) for every grade of the named student
    pub fn named_student_grades(&self, full_name: &str) -> Result<Vec<(String, String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.full_name, g.subject, g.grade
             FROM students s
             JOIN grades g ON g.student_id = s.id
             WHERE s.full_name = ?1
             ORDER BY g.id",
        )?;

        let rows = stmt
            .query_map([full_name], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// (student_id, full_name, unrounded mean grade), one row per student
    /// with at least one grade, in student id order
    pub fn student_averages(&self) -> Result<Vec<(i64, String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.full_name, AVG(g.grade)
             FROM grades g
             JOIN students s ON s.id = g.student_id
             GROUP BY g.student_id
             ORDER BY s.id",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// (subject, unrounded mean grade), one row per distinct subject
    pub fn subject_averages(&self) -> Result<Vec<(String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject, AVG(grade)
             FROM grades
             GROUP BY subject
             ORDER BY subject",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Highest unrounded averages first; ties broken by ascending student id
    /// so result order is reproducible
    pub fn top_student_averages(&self, limit: usize) -> Result<Vec<(i64, String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.full_name, AVG(g.grade) AS avg_grade
             FROM grades g
             JOIN students s ON s.id = g.student_id
             GROUP BY g.student_id, s.full_name
             ORDER BY avg_grade DESC, s.id ASC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Every (full_name, subject, grade) with a score strictly below the
    /// threshold, ordered by student id then grade id
    pub fn grades_below(&self, threshold: i64) -> Result<Vec<(String, String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.full_name, g.subject, g.grade
             FROM students s
             JOIN grades g ON g.student_id = s.id
             WHERE g.grade < ?1
             ORDER BY s.id, g.id",
        )?;

        let rows = stmt
            .query_map([threshold], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            students: self.count_students()?,
            grades: self.count_grades()?,
            subjects: self.count_subjects()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub students: usize,
    pub grades: usize,
    pub subjects: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Students: {}", self.students)?;
        writeln!(f, "  Grades: {}", self.grades)?;
        writeln!(f, "  Subjects: {}", self.subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student(name: &str, birth_year: i64) -> NewStudent {
        NewStudent::new(name, birth_year).unwrap()
    }

    #[test]
    fn test_student_insert_and_lookup() {
        let store = GradebookStore::open_in_memory().unwrap();

        let id = store
            .insert_student(&sample_student("Alice Johnson", 2005))
            .unwrap();

        let found = store.get_student_by_name("Alice Johnson").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.birth_year, 2005);

        assert!(store.get_student_by_name("Nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected_without_side_effects() {
        let store = GradebookStore::open_in_memory().unwrap();

        store
            .insert_student(&sample_student("Alice Johnson", 2005))
            .unwrap();

        let err = store
            .insert_student(&sample_student("Alice Johnson", 2006))
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(err.is_constraint_violation());
        assert_eq!(store.count_students().unwrap(), 1);
    }

    #[test]
    fn test_birth_year_check_constraint() {
        let store = GradebookStore::open_in_memory().unwrap();

        // Bypass model validation so the schema constraint itself is hit
        let future = NewStudent {
            full_name: "Time Traveler".to_string(),
            birth_year: 2026,
        };
        let err = store.insert_student(&future).unwrap_err();
        assert!(err.is_check_violation());
        assert_eq!(store.count_students().unwrap(), 0);
    }

    #[test]
    fn test_grade_check_constraint_bounds() {
        let store = GradebookStore::open_in_memory().unwrap();
        let id = store
            .insert_student(&sample_student("Alice Johnson", 2005))
            .unwrap();

        for score in [1, 100] {
            store
                .insert_grade(&NewGrade::new(id, "Math", score).unwrap())
                .unwrap();
        }

        for score in [0, 101] {
            let out_of_range = NewGrade {
                student_id: id,
                subject: "Math".to_string(),
                grade: score,
            };
            let err = store.insert_grade(&out_of_range).unwrap_err();
            assert!(err.is_check_violation());
        }

        assert_eq!(store.count_grades().unwrap(), 2);
    }

    #[test]
    fn test_dangling_student_id_rejected() {
        let store = GradebookStore::open_in_memory().unwrap();

        let orphan = NewGrade::new(9999, "Math", 50).unwrap();
        let err = store.insert_grade(&orphan).unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert_eq!(store.count_grades().unwrap(), 0);
    }

    #[test]
    fn test_grades_listed_in_insertion_order() {
        let store = GradebookStore::open_in_memory().unwrap();
        let id = store
            .insert_student(&sample_student("Alice Johnson", 2005))
            .unwrap();

        store
            .insert_grade(&NewGrade::new(id, "Math", 88).unwrap())
            .unwrap();
        store
            .insert_grade(&NewGrade::new(id, "English", 92).unwrap())
            .unwrap();

        let grades = store.grades_for_student_id(id).unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].subject, "Math");
        assert_eq!(grades[1].subject, "English");
        assert!(grades.iter().all(|g| g.student_id == id));
    }

    #[test]
    fn test_name_pattern_search() {
        let store = GradebookStore::open_in_memory().unwrap();

        store
            .insert_student(&sample_student("Alice Johnson", 2005))
            .unwrap();
        store
            .insert_student(&sample_student("Grace Patel", 2006))
            .unwrap();
        store
            .insert_student(&sample_student("Isabella Martinez", 2007))
            .unwrap();

        let matches = store.find_students_by_name_pattern("%a%el%").unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.db");

        {
            let store = GradebookStore::open(&path).unwrap();
            store
                .insert_student(&sample_student("Alice Johnson", 2005))
                .unwrap();
        }

        let reopened = GradebookStore::open(&path).unwrap();
        assert_eq!(reopened.count_students().unwrap(), 1);
    }
}
