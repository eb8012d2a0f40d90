//! Error types for loading, storing and serving match data.
//!
//! Evaluation itself never fails: missing courses or grades become `unmet`.

use thiserror::Error;

/// Errors that can occur around requirement matching.
#[derive(Debug, Error)]
pub enum MatchError {
    /// SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store mutex was poisoned by a panicking holder
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// Reading a seed or config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A seed file, config file or payload is not valid JSON for its type
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Grade outside the IB 1-7 scale
    #[error("Invalid grade {grade} for {context}")]
    InvalidGrade { grade: u8, context: String },

    /// Subject group outside 1-6
    #[error("Invalid subject group {group} for course {course_code}")]
    InvalidSubjectGroup { group: u8, course_code: String },

    /// Diploma points above the 45 point maximum
    #[error("Invalid IB points {points} for {context}")]
    InvalidPoints { points: u8, context: String },

    /// Two seed files declare the same program id
    #[error("Duplicate program id: {program_id}")]
    DuplicateProgram { program_id: String },

    /// Two requirements of one program share an id
    #[error("Duplicate requirement id {requirement_id} in program {program_id}")]
    DuplicateRequirement {
        program_id: String,
        requirement_id: String,
    },

    #[error("Program not found: {program_id}")]
    ProgramNotFound { program_id: String },

    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: String },
}

impl MatchError {
    /// Returns true if the error was caused by the caller's data rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MatchError::Json(_)
                | MatchError::InvalidGrade { .. }
                | MatchError::InvalidSubjectGroup { .. }
                | MatchError::InvalidPoints { .. }
                | MatchError::DuplicateProgram { .. }
                | MatchError::DuplicateRequirement { .. }
        )
    }

    /// Returns true if the error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MatchError::ProgramNotFound { .. } | MatchError::StudentNotFound { .. }
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for MatchError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        MatchError::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = MatchError::ProgramNotFound {
            program_id: "eth-cs".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_client_error());

        let bad_grade = MatchError::InvalidGrade {
            grade: 9,
            context: "requirement math-hl".to_string(),
        };
        assert!(bad_grade.is_client_error());
        assert_eq!(bad_grade.to_string(), "Invalid grade 9 for requirement math-hl");

        assert!(!MatchError::LockPoisoned.is_client_error());
    }
}
