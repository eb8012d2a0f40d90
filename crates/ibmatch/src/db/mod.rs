/// Database module for programs, course requirements and student profiles

mod types;

pub use types::{DbProgram, DbRequirement, DbStudent, DbStudentCourse};

use crate::matching::{MatchError, Program, ProgramCatalog, ProgramSummary, StudentProfile};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_ibmatch.sql");

pub struct MatchDbManager {
    db: Mutex<Connection>,
}

impl MatchDbManager {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, MatchError> {
        let conn = Connection::open(db_path.as_ref())?;
        Self::init(conn)
    }

    /// Opens a private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, MatchError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, MatchError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Inserts or replaces a program together with all its requirements
    pub fn upsert_program(&self, program: &Program) -> Result<(), MatchError> {
        let mut db = self.db.lock()?;
        let tx = db.transaction()?;

        tx.execute(
            "INSERT INTO programs (program_id, name, university, country, min_ib_points, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(program_id) DO UPDATE SET
                name = excluded.name,
                university = excluded.university,
                country = excluded.country,
                min_ib_points = excluded.min_ib_points,
                updated_at = excluded.updated_at",
            params![
                program.id,
                program.name,
                program.university,
                program.country,
                program.min_ib_points,
                Utc::now(),
            ],
        )?;

        tx.execute(
            "DELETE FROM course_requirements WHERE program_id = ?",
            [&program.id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO course_requirements (
                    program_id, requirement_id, course_code, course_name, subject_group,
                    required_level, min_grade, critical, or_group
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for req in &program.requirements {
                stmt.execute(params![
                    program.id,
                    req.id,
                    req.course.code,
                    req.course.name,
                    req.course.subject_group,
                    req.required_level,
                    req.min_grade,
                    req.critical,
                    req.or_group,
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            "Stored program {} with {} requirements",
            program.id,
            program.requirements.len()
        );
        Ok(())
    }

    /// Writes every catalogue program, returning how many were stored
    pub fn seed_from_catalog(&self, catalog: &ProgramCatalog) -> Result<usize, MatchError> {
        let mut written = 0;
        for program in catalog.iter() {
            self.upsert_program(program)?;
            written += 1;
        }
        info!("Seeded {} programs into the database", written);
        Ok(written)
    }

    /// Lists all programs ordered by id
    pub fn list_programs(&self) -> Result<Vec<ProgramSummary>, MatchError> {
        let db = self.db.lock()?;
        let mut stmt = db.prepare(
            "SELECT p.program_id, p.name, p.university, p.country, p.min_ib_points,
                    (SELECT COUNT(*) FROM course_requirements r WHERE r.program_id = p.program_id)
             FROM programs p
             ORDER BY p.program_id",
        )?;

        let programs = stmt
            .query_map([], |row| {
                Ok(ProgramSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    university: row.get(2)?,
                    country: row.get(3)?,
                    min_ib_points: row.get(4)?,
                    requirement_count: row.get::<_, i64>(5)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(programs)
    }

    /// Gets a program with its requirements in insertion order
    pub fn get_program(&self, program_id: &str) -> Result<Option<Program>, MatchError> {
        let db = self.db.lock()?;

        let program: Option<DbProgram> = db
            .query_row(
                "SELECT program_id, name, university, country, min_ib_points
                 FROM programs WHERE program_id = ?",
                [program_id],
                |row| {
                    Ok(DbProgram {
                        program_id: row.get(0)?,
                        name: row.get(1)?,
                        university: row.get(2)?,
                        country: row.get(3)?,
                        min_ib_points: row.get(4)?,
                    })
                },
            )
            .optional()?;

        let Some(program) = program else {
            return Ok(None);
        };

        let mut stmt = db.prepare(
            "SELECT requirement_id, course_code, course_name, subject_group,
                    required_level, min_grade, critical, or_group
             FROM course_requirements
             WHERE program_id = ?
             ORDER BY requirement_pk",
        )?;

        let requirements = stmt
            .query_map([program_id], |row| {
                Ok(DbRequirement {
                    requirement_id: row.get(0)?,
                    course_code: row.get(1)?,
                    course_name: row.get(2)?,
                    subject_group: row.get(3)?,
                    required_level: row.get(4)?,
                    min_grade: row.get(5)?,
                    critical: row.get(6)?,
                    or_group: row.get(7)?,
                })
            })?
            .map(|row| row.map(Into::into))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(Program {
            id: program.program_id,
            name: program.name,
            university: program.university,
            country: program.country,
            min_ib_points: program.min_ib_points,
            requirements,
        }))
    }

    /// Inserts or replaces a student profile and its courses
    pub fn upsert_student(&self, student: &StudentProfile) -> Result<(), MatchError> {
        let mut db = self.db.lock()?;
        let tx = db.transaction()?;

        tx.execute(
            "INSERT INTO students (student_id, name, total_points, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(student_id) DO UPDATE SET
                name = excluded.name,
                total_points = excluded.total_points,
                updated_at = excluded.updated_at",
            params![student.id, student.name, student.total_points, Utc::now()],
        )?;

        tx.execute(
            "DELETE FROM student_courses WHERE student_id = ?",
            [&student.id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO student_courses (student_id, course_code, level, grade)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for course in &student.courses {
                stmt.execute(params![student.id, course.course_code, course.level, course.grade])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Gets a student profile with all completed courses
    pub fn get_student(&self, student_id: &str) -> Result<Option<StudentProfile>, MatchError> {
        let db = self.db.lock()?;

        let student: Option<DbStudent> = db
            .query_row(
                "SELECT student_id, name, total_points FROM students WHERE student_id = ?",
                [student_id],
                |row| {
                    Ok(DbStudent {
                        student_id: row.get(0)?,
                        name: row.get(1)?,
                        total_points: row.get(2)?,
                    })
                },
            )
            .optional()?;

        let Some(student) = student else {
            return Ok(None);
        };

        let mut stmt = db.prepare(
            "SELECT course_code, level, grade
             FROM student_courses
             WHERE student_id = ?
             ORDER BY course_pk",
        )?;

        let courses = stmt
            .query_map([student_id], |row| {
                Ok(DbStudentCourse {
                    course_code: row.get(0)?,
                    level: row.get(1)?,
                    grade: row.get(2)?,
                })
            })?
            .map(|row| row.map(Into::into))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(StudentProfile {
            id: student.student_id,
            name: student.name,
            total_points: student.total_points,
            courses,
        }))
    }
}
