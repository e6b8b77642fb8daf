//! Database schema definitions

/// SQL to create the students table
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL UNIQUE,
    birth_year INTEGER NOT NULL CHECK (birth_year <= 2025)
)
"#;

/// SQL to create the grades table
/// Every grade belongs to exactly one existing student; deletion of a
/// referenced student is restricted.
pub const CREATE_GRADES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS grades (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    subject TEXT NOT NULL,
    grade INTEGER NOT NULL CHECK (grade BETWEEN 1 AND 100)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_students_birth_year ON students(birth_year)",
    "CREATE INDEX IF NOT EXISTS idx_grades_student_id ON grades(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_grades_subject ON grades(subject)",
    "CREATE INDEX IF NOT EXISTS idx_grades_grade ON grades(grade)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_STUDENTS_TABLE, CREATE_GRADES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
