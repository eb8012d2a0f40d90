/// Database row types for programs and students
use crate::matching::{CourseRequirement, IbCourse, IbLevel, StudentCourse};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

#[derive(Debug, Clone)]
pub struct DbProgram {
    pub program_id: String,
    pub name: String,
    pub university: String,
    pub country: String,
    pub min_ib_points: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct DbRequirement {
    pub requirement_id: String,
    pub course_code: String,
    pub course_name: String,
    pub subject_group: u8,
    pub required_level: IbLevel,
    pub min_grade: u8,
    pub critical: bool,
    pub or_group: Option<String>,
}

impl From<DbRequirement> for CourseRequirement {
    fn from(row: DbRequirement) -> Self {
        CourseRequirement {
            id: row.requirement_id,
            course: IbCourse {
                code: row.course_code,
                name: row.course_name,
                subject_group: row.subject_group,
            },
            required_level: row.required_level,
            min_grade: row.min_grade,
            critical: row.critical,
            or_group: row.or_group,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbStudent {
    pub student_id: String,
    pub name: Option<String>,
    pub total_points: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct DbStudentCourse {
    pub course_code: String,
    pub level: IbLevel,
    pub grade: u8,
}

impl From<DbStudentCourse> for StudentCourse {
    fn from(row: DbStudentCourse) -> Self {
        StudentCourse {
            course_code: row.course_code,
            level: row.level,
            grade: row.grade,
        }
    }
}

impl ToSql for IbLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for IbLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "HL" => Ok(IbLevel::Higher),
            "SL" => Ok(IbLevel::Standard),
            other => Err(FromSqlError::Other(
                format!("unknown IB level '{other}'").into(),
            )),
        }
    }
}
