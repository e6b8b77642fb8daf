//! Gradebook CLI - Command-line interface for the student gradebook

use clap::{Parser, Subcommand};
use gradebook::reports::{
    DEFAULT_BELOW_THRESHOLD, DEFAULT_BORN_AFTER_YEAR, DEFAULT_TOP_LIMIT, ReportEngine,
};
use gradebook::storage::GradebookStore;
use gradebook::student::{NewStudent, normalize_name};
use gradebook::ui::{self, Icons};
use gradebook::{Error, NewGrade, config, seed};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(version = "0.1.0")]
#[command(about = "SQLite-backed student gradebook with aggregate reports")]
#[command(long_about = r#"
Gradebook tracks students and their per-subject grades in an embedded
SQLite database, enabling:
  • Per-student grade listings and averages
  • Per-subject averages across the class
  • Top-performer rankings and below-threshold listings

Example usage:
  gradebook init --seed
  gradebook grades "Alice Johnson"
  gradebook top --limit 3
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides gradebook.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema (tables and indexes)
    Init {
        /// Insert the sample dataset after creating the schema
        #[arg(long)]
        seed: bool,

        /// Write the chosen database path to gradebook.toml
        #[arg(long)]
        save_config: bool,

        /// Overwrite an existing gradebook.toml
        #[arg(long)]
        force: bool,
    },

    /// Insert the sample dataset (nine students, seventeen grades)
    Seed,

    /// Add a student
    AddStudent {
        /// Full name, unique across all students
        #[arg(short, long)]
        name: String,

        /// Year of birth (2025 or earlier)
        #[arg(short, long)]
        birth_year: i64,
    },

    /// Add a grade for a student
    AddGrade {
        /// Full name of an existing student
        #[arg(short, long)]
        name: String,

        /// Subject the grade is for
        #[arg(short, long)]
        subject: String,

        /// Score between 1 and 100
        #[arg(short, long)]
        grade: i64,
    },

    /// List students
    Students {
        /// Filter by name pattern (SQL LIKE, % as wildcard)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List every grade of one student
    Grades {
        /// Full name of the student
        name: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Average grade per student
    Averages {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Students born after a cutoff year
    BornAfter {
        /// Cutoff year (exclusive)
        #[arg(short, long, default_value_t = DEFAULT_BORN_AFTER_YEAR)]
        year: i64,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Average grade per subject
    Subjects {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Students with the highest average grades
    Top {
        /// Number of students to show
        #[arg(short, long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: usize,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Grades below a threshold
    Below {
        /// Threshold (exclusive)
        #[arg(short, long, default_value_t = DEFAULT_BELOW_THRESHOLD)]
        threshold: i64,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Whole-class summary of per-student averages
    Summary {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show row counts for the gradebook
    Stats,
}

fn resolve_database(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(cfg) = config::load_config(None)? {
        if let Some(db) = cfg.database {
            return Ok(PathBuf::from(db));
        }
    }
    Ok(config::default_database_path_in(Path::new(".")))
}

fn print_rows<T: tabled::Tabled + serde::Serialize>(
    rows: &[T],
    format: &str,
    empty_label: &str,
) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else if rows.is_empty() {
        println!("{} {}", Icons::EMPTY, empty_label);
    } else {
        println!("{}", ui::table::render(rows));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let database = resolve_database(cli.database)?;

    match cli.command {
        Commands::Init {
            seed: with_seed,
            save_config,
            force,
        } => {
            config::ensure_db_dir(&database)?;
            let store = GradebookStore::open(&database)?;
            ui::header("Gradebook initialized");
            ui::info("Database", &database.display().to_string());

            if with_seed {
                let summary = seed::seed(&store)?;
                ui::success(&format!(
                    "Seeded {} students and {} grades",
                    summary.students, summary.grades
                ));
            }

            if save_config {
                let cfg = config::GradebookConfig {
                    database: Some(database.display().to_string()),
                };
                config::write_config(&config::default_config_path(), &cfg, force)?;
                config::ensure_gitignore(Path::new("."))?;
                ui::success("Wrote gradebook.toml");
            }
        }

        Commands::Seed => {
            let store = GradebookStore::open(&database)?;
            let summary = seed::seed(&store).map_err(|err| {
                if err.is_unique_violation() {
                    anyhow::anyhow!("database already contains the sample students")
                } else {
                    err.into()
                }
            })?;
            ui::success(&format!(
                "Seeded {} students and {} grades",
                summary.students, summary.grades
            ));
        }

        Commands::AddStudent { name, birth_year } => {
            let store = GradebookStore::open(&database)?;
            let student = NewStudent::new(&name, birth_year)?;
            let id = store.insert_student(&student).map_err(|err| {
                if err.is_unique_violation() {
                    anyhow::anyhow!("a student named {:?} already exists", student.full_name)
                } else {
                    err.into()
                }
            })?;
            ui::success(&format!(
                "Added student #{}: {} ({})",
                id, student.full_name, student.birth_year
            ));
        }

        Commands::AddGrade {
            name,
            subject,
            grade,
        } => {
            let store = GradebookStore::open(&database)?;
            let full_name = normalize_name(&name)?;
            let student = store
                .get_student_by_name(&full_name)?
                .ok_or(Error::StudentNotFound(full_name))?;

            let new_grade = NewGrade::new(student.id, &subject, grade)?;
            store.insert_grade(&new_grade)?;
            ui::success(&format!(
                "Recorded {} {} for {}",
                new_grade.subject, new_grade.grade, student.full_name
            ));
        }

        Commands::Students { filter } => {
            let store = GradebookStore::open(&database)?;
            let students = match filter {
                Some(pattern) => {
                    println!("{} Students matching '{}':", Icons::SEARCH, pattern);
                    store.find_students_by_name_pattern(&pattern)?
                }
                None => store.list_students()?,
            };

            if students.is_empty() {
                println!("{} No students found.", Icons::EMPTY);
            } else {
                for student in students {
                    println!(
                        "- #{} {} ({})",
                        student.id, student.full_name, student.birth_year
                    );
                }
            }
        }

        Commands::Grades { name, format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let full_name = normalize_name(&name)?;
            let rows = engine.grades_for_student(&full_name)?;

            if format != "json" {
                println!("{} Grades for {}:", Icons::BOOKS, full_name);
            }
            print_rows(&rows, &format, "No grades found.")?;
        }

        Commands::Averages { format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let rows = engine.average_per_student()?;

            if format != "json" {
                println!("{} Average grade per student:", Icons::PENCIL);
            }
            print_rows(&rows, &format, "No grades recorded yet.")?;
        }

        Commands::BornAfter { year, format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let rows = engine.born_after(year)?;

            if format != "json" {
                println!("{} Students born after {}:", Icons::PERSON, year);
            }
            print_rows(&rows, &format, "No students found.")?;
        }

        Commands::Subjects { format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let rows = engine.average_per_subject()?;

            if format != "json" {
                println!("{} Average grade per subject:", Icons::BOOKS);
            }
            print_rows(&rows, &format, "No grades recorded yet.")?;
        }

        Commands::Top { limit, format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let rows = engine.top_performers(limit)?;

            if format != "json" {
                println!("{} Top {} performers:", Icons::TROPHY, limit);
            }
            print_rows(&rows, &format, "No grades recorded yet.")?;
        }

        Commands::Below { threshold, format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);
            let rows = engine.below_threshold(threshold)?;

            if format != "json" {
                println!("{} Grades below {}:", Icons::WARN, threshold);
            }
            print_rows(&rows, &format, "No grades below the threshold.")?;
        }

        Commands::Summary { format } => {
            let store = GradebookStore::open(&database)?;
            let engine = ReportEngine::new(&store);

            match engine.summary()? {
                Some(summary) => {
                    if format == "json" {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        ui::section("Student Report");
                        println!("{}", ui::table::render(&summary.averages));
                        let max = format!("{:.2}", summary.max_average);
                        let min = format!("{:.2}", summary.min_average);
                        let overall = format!("{:.2}", summary.overall_average);
                        println!(
                            "{}",
                            ui::table::stats_table(&[
                                ("Max Average", max.as_str()),
                                ("Min Average", min.as_str()),
                                ("Overall Average", overall.as_str()),
                            ])
                        );
                    }
                }
                None => println!("{} No grades recorded yet.", Icons::EMPTY),
            }
        }

        Commands::Stats => {
            let store = GradebookStore::open(&database)?;
            let stats = store.stats()?;

            println!("{} Gradebook Statistics ({:?})", Icons::STATS, database);
            println!("------------------------------------");
            println!("{}", stats);
        }
    }

    Ok(())
}
