/// Program catalogue loaded from JSON seed files
use super::error::MatchError;
use super::types::{GradeValidator, Program, StudentProfile};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Highest total an IB diploma can score.
pub const MAX_IB_POINTS: u8 = 45;

/// All programs known to the service, keyed by program id.
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalog {
    programs: HashMap<String, Program>,
    /// Ids in load order (sorted file names)
    order: Vec<String>,
}

impl ProgramCatalog {
    /// Loads every `*.json` file in `catalog_dir`, one program per file
    ///
    /// # Arguments
    /// * `catalog_dir` - Directory containing program seed files
    ///
    /// # Returns
    /// * `Ok(ProgramCatalog)` - Validated programs (empty if the directory is missing)
    /// * `Err` - If a file can't be read or parsed, fails validation, or repeats an id
    pub fn load_from_directory(catalog_dir: &Path) -> Result<Self, MatchError> {
        let mut catalog = ProgramCatalog::empty();

        if !catalog_dir.is_dir() {
            warn!("Program catalogue directory {} not found", catalog_dir.display());
            return Ok(catalog);
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(catalog_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)?;
            let program: Program = serde_json::from_str(&content)?;
            catalog.insert(program)?;
        }

        info!(
            "Loaded {} programs from {}",
            catalog.len(),
            catalog_dir.display()
        );

        Ok(catalog)
    }

    /// Creates an empty catalogue
    pub fn empty() -> Self {
        ProgramCatalog {
            programs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Validates and adds a program, rejecting duplicate ids.
    pub fn insert(&mut self, program: Program) -> Result<(), MatchError> {
        validate_program(&program)?;
        if self.programs.contains_key(&program.id) {
            return Err(MatchError::DuplicateProgram {
                program_id: program.id,
            });
        }
        self.order.push(program.id.clone());
        self.programs.insert(program.id.clone(), program);
        Ok(())
    }

    /// Programs in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.order.iter().filter_map(|id| self.programs.get(id))
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Checks points, requirement ids, grades and subject groups of a program.
pub fn validate_program(program: &Program) -> Result<(), MatchError> {
    if let Some(points) = program.min_ib_points {
        if points > MAX_IB_POINTS {
            return Err(MatchError::InvalidPoints {
                points,
                context: format!("program {}", program.id),
            });
        }
    }

    let mut seen_ids = HashSet::new();
    for req in &program.requirements {
        if !seen_ids.insert(req.id.as_str()) {
            return Err(MatchError::DuplicateRequirement {
                program_id: program.id.clone(),
                requirement_id: req.id.clone(),
            });
        }
        if !GradeValidator::is_valid_grade(req.min_grade) {
            return Err(MatchError::InvalidGrade {
                grade: req.min_grade,
                context: format!("requirement {} of program {}", req.id, program.id),
            });
        }
        if !GradeValidator::is_valid_subject_group(req.course.subject_group) {
            return Err(MatchError::InvalidSubjectGroup {
                group: req.course.subject_group,
                course_code: req.course.code.clone(),
            });
        }
    }

    Ok(())
}

/// Checks grades and points of a student profile.
pub fn validate_student(student: &StudentProfile) -> Result<(), MatchError> {
    if let Some(points) = student.total_points {
        if points > MAX_IB_POINTS {
            return Err(MatchError::InvalidPoints {
                points,
                context: format!("student {}", student.id),
            });
        }
    }

    for course in &student.courses {
        if !GradeValidator::is_valid_grade(course.grade) {
            return Err(MatchError::InvalidGrade {
                grade: course.grade,
                context: format!("course {} of student {}", course.course_code, student.id),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{IbLevel, StudentCourse};
    use tempfile::tempdir;

    const PROGRAM_JSON: &str = r#"{
        "id": "tokyo-eng",
        "name": "Engineering",
        "university": "University of Tokyo",
        "country": "Japan",
        "min_ib_points": 36,
        "requirements": [
            {
                "id": "math",
                "course": { "code": "MATH_AA", "name": "Mathematics AA", "subject_group": 5 },
                "required_level": "HL",
                "min_grade": 6,
                "critical": true
            },
            {
                "id": "phys",
                "course": { "code": "PHYS", "name": "Physics", "subject_group": 4 },
                "required_level": "HL",
                "min_grade": 5,
                "or_group": "science"
            }
        ]
    }"#;

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("programs");
        let catalog = ProgramCatalog::load_from_directory(&missing).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_programs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tokyo.json"), PROGRAM_JSON).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = ProgramCatalog::load_from_directory(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        let program = catalog.iter().next().unwrap();
        assert_eq!(program.id, "tokyo-eng");
        assert_eq!(program.requirements.len(), 2);
        assert!(program.requirements[0].critical);
        assert_eq!(program.requirements[1].or_group.as_deref(), Some("science"));
    }

    #[test]
    fn test_load_order_follows_file_names() {
        let dir = tempdir().unwrap();
        let mut second: Program = serde_json::from_str(PROGRAM_JSON).unwrap();
        second.id = "kyoto-sci".to_string();
        fs::write(dir.path().join("b.json"), PROGRAM_JSON).unwrap();
        fs::write(dir.path().join("a.json"), serde_json::to_string(&second).unwrap()).unwrap();

        let catalog = ProgramCatalog::load_from_directory(dir.path()).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["kyoto-sci", "tokyo-eng"]);
    }

    #[test]
    fn test_duplicate_program_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), PROGRAM_JSON).unwrap();
        fs::write(dir.path().join("b.json"), PROGRAM_JSON).unwrap();

        let err = ProgramCatalog::load_from_directory(dir.path()).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateProgram { .. }));
    }

    #[test]
    fn test_duplicate_requirement_id_rejected() {
        let mut program: Program = serde_json::from_str(PROGRAM_JSON).unwrap();
        program.requirements[1].id = "math".to_string();

        let err = ProgramCatalog::empty().insert(program).unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(
            err,
            MatchError::DuplicateRequirement { ref requirement_id, .. } if requirement_id == "math"
        ));
    }

    #[test]
    fn test_invalid_grade_rejected() {
        let mut program: Program = serde_json::from_str(PROGRAM_JSON).unwrap();
        program.requirements[0].min_grade = 8;
        let err = ProgramCatalog::empty().insert(program).unwrap_err();
        assert!(matches!(err, MatchError::InvalidGrade { grade: 8, .. }));
    }

    #[test]
    fn test_invalid_student() {
        let student = StudentProfile {
            id: "s".to_string(),
            name: None,
            total_points: Some(46),
            courses: vec![],
        };
        assert!(matches!(
            validate_student(&student),
            Err(MatchError::InvalidPoints { points: 46, .. })
        ));

        let student = StudentProfile {
            total_points: Some(40),
            courses: vec![StudentCourse {
                course_code: "BIO".to_string(),
                level: IbLevel::Higher,
                grade: 0,
            }],
            ..student
        };
        assert!(matches!(
            validate_student(&student),
            Err(MatchError::InvalidGrade { grade: 0, .. })
        ));
    }
}
