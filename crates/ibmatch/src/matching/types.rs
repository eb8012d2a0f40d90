/// Types for IB requirement matching
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest grade awarded for an IB subject.
pub const MAX_GRADE: u8 = 7;

/// Lowest grade awarded for an IB subject.
pub const MIN_GRADE: u8 = 1;

/// Depth at which an IB subject was studied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IbLevel {
    #[serde(rename = "HL", alias = "hl")]
    Higher,
    #[serde(rename = "SL", alias = "sl")]
    Standard,
}

impl IbLevel {
    /// Returns true if a course taken at this level can fill a slot requiring `required`.
    ///
    /// HL always satisfies an SL slot, SL never satisfies HL.
    pub fn satisfies(self, required: IbLevel) -> bool {
        self == required || (self == IbLevel::Higher && required == IbLevel::Standard)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IbLevel::Higher => "HL",
            IbLevel::Standard => "SL",
        }
    }
}

impl fmt::Display for IbLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IB course as referenced by a program requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbCourse {
    pub code: String,         // e.g., "MATH_AA"
    pub name: String,         // e.g., "Mathematics: Analysis and Approaches"
    pub subject_group: u8,    // 1-6
}

/// One prerequisite slot (or one alternative of an OR-group) of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRequirement {
    pub id: String,
    pub course: IbCourse,
    pub required_level: IbLevel,
    pub min_grade: u8,
    #[serde(default)]
    pub critical: bool,
    /// Requirements sharing this id are alternatives for a single slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or_group: Option<String>,
}

/// A course the student actually completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourse {
    pub course_code: String,
    pub level: IbLevel,
    pub grade: u8,
}

/// A student with the courses of their diploma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub name: Option<String>,
    /// Total diploma points out of 45, if known
    pub total_points: Option<u8>,
    #[serde(default)]
    pub courses: Vec<StudentCourse>,
}

/// A university program with its IB subject requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub university: String,
    pub country: String,
    pub min_ib_points: Option<u8>,
    #[serde(default)]
    pub requirements: Vec<CourseRequirement>,
}

/// Listing entry for a program, without its requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: String,
    pub name: String,
    pub university: String,
    pub country: String,
    pub min_ib_points: Option<u8>,
    pub requirement_count: usize,
}

impl From<&Program> for ProgramSummary {
    fn from(program: &Program) -> Self {
        ProgramSummary {
            id: program.id.clone(),
            name: program.name.clone(),
            university: program.university.clone(),
            country: program.country.clone(),
            min_ib_points: program.min_ib_points,
            requirement_count: program.requirements.len(),
        }
    }
}

/// A prerequisite slot: either a single requirement or a set of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    Standalone(CourseRequirement),
    OrGroup {
        id: String,
        options: Vec<CourseRequirement>,
    },
}

impl Requirement {
    /// All course requirements that can fill this slot, in declaration order.
    pub fn options(&self) -> &[CourseRequirement] {
        match self {
            Requirement::Standalone(req) => std::slice::from_ref(req),
            Requirement::OrGroup { options, .. } => options,
        }
    }

    /// A slot is critical if any of its alternatives is flagged critical.
    pub fn is_critical(&self) -> bool {
        self.options().iter().any(|o| o.critical)
    }

    /// Identifier of the slot (requirement id or OR-group id).
    pub fn id(&self) -> &str {
        match self {
            Requirement::Standalone(req) => &req.id,
            Requirement::OrGroup { id, .. } => id,
        }
    }
}

/// Standing of a student against one requirement slot. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Met,
    PartiallyMet,
    Unmet,
}

impl RequirementStatus {
    /// Ranking used when choosing between options: higher is better.
    pub fn rank(self) -> u8 {
        match self {
            RequirementStatus::Met => 2,
            RequirementStatus::PartiallyMet => 1,
            RequirementStatus::Unmet => 0,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            RequirementStatus::Met => Severity::Success,
            RequirementStatus::PartiallyMet => Severity::Warning,
            RequirementStatus::Unmet => Severity::Danger,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequirementStatus::Met => "Met",
            RequirementStatus::PartiallyMet => "Close",
            RequirementStatus::Unmet => "Not met",
        }
    }
}

/// Color classification consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

/// Outcome of checking one course requirement against the student's courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEvaluation {
    pub requirement_id: String,
    pub status: RequirementStatus,
    pub reason: String,
    /// The student's course used for the decision, if they took it
    pub taken: Option<StudentCourse>,
    /// Grade points short of the minimum (0 when met or not taken)
    pub shortfall: u8,
}

impl OptionEvaluation {
    pub fn was_taken(&self) -> bool {
        self.taken.is_some()
    }
}

/// Evaluated requirement slot, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementEvaluation {
    pub requirement_id: String,
    pub status: RequirementStatus,
    pub label: String,
    pub severity: Severity,
    pub reason: String,
    /// Grade points short of the displayed option's minimum
    pub shortfall: u8,
    pub critical: bool,
    /// The option shown to the student (the only option for standalone slots)
    pub display_option: CourseRequirement,
    /// Number of alternatives in the slot
    pub option_count: usize,
}

/// Program-level verdict on the academic requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicMatch {
    Satisfied,
    Close,
    Disqualified,
}

/// Outcome of the IB points threshold check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsCheck {
    pub required: Option<u8>,
    pub student_points: Option<u8>,
    pub passed: bool,
}

/// A student's full standing against one program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub program_id: String,
    pub student_id: String,
    pub academic_match: AcademicMatch,
    pub score_percent: u8,
    pub met_count: usize,
    pub partially_met_count: usize,
    pub unmet_count: usize,
    pub critical_unmet: Vec<String>,
    pub points: PointsCheck,
    pub requirements: Vec<RequirementEvaluation>,
    pub evaluated_at: DateTime<Utc>,
}

/// Display item for anonymous viewers: no evaluation, just what is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRequirementView {
    pub requirement_id: String,
    pub label: String,
    /// None when the alternatives ask for different levels
    pub required_level: Option<IbLevel>,
    /// None when the alternatives ask for different grades
    pub min_grade: Option<u8>,
    pub critical: bool,
    pub options: Vec<CourseRequirement>,
}

/// Grade validation helper
#[derive(Debug, Clone)]
pub struct GradeValidator;

impl GradeValidator {
    /// Checks that a grade is on the IB 1-7 scale.
    pub fn is_valid_grade(grade: u8) -> bool {
        (MIN_GRADE..=MAX_GRADE).contains(&grade)
    }

    /// Checks that a subject group number is one of the six IB groups.
    pub fn is_valid_subject_group(group: u8) -> bool {
        (1..=6).contains(&group)
    }

    /// Grade points missing to reach `min_grade`.
    pub fn shortfall(grade: u8, min_grade: u8) -> u8 {
        min_grade.saturating_sub(grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_substitution() {
        assert!(IbLevel::Higher.satisfies(IbLevel::Standard));
        assert!(IbLevel::Higher.satisfies(IbLevel::Higher));
        assert!(IbLevel::Standard.satisfies(IbLevel::Standard));
        assert!(!IbLevel::Standard.satisfies(IbLevel::Higher));
    }

    #[test]
    fn test_level_serde() {
        let level: IbLevel = serde_json::from_str("\"HL\"").unwrap();
        assert_eq!(level, IbLevel::Higher);
        let level: IbLevel = serde_json::from_str("\"sl\"").unwrap();
        assert_eq!(level, IbLevel::Standard);
        assert_eq!(serde_json::to_string(&IbLevel::Higher).unwrap(), "\"HL\"");
    }

    #[test]
    fn test_status_rank_and_severity() {
        assert!(RequirementStatus::Met.rank() > RequirementStatus::PartiallyMet.rank());
        assert!(RequirementStatus::PartiallyMet.rank() > RequirementStatus::Unmet.rank());
        assert_eq!(RequirementStatus::PartiallyMet.severity(), Severity::Warning);
        assert_eq!(
            serde_json::to_string(&RequirementStatus::PartiallyMet).unwrap(),
            "\"partially_met\""
        );
    }

    #[test]
    fn test_grade_validator() {
        assert!(GradeValidator::is_valid_grade(1));
        assert!(GradeValidator::is_valid_grade(7));
        assert!(!GradeValidator::is_valid_grade(0));
        assert!(!GradeValidator::is_valid_grade(8));
        assert_eq!(GradeValidator::shortfall(4, 5), 1);
        assert_eq!(GradeValidator::shortfall(7, 5), 0);
        assert!(!GradeValidator::is_valid_subject_group(7));
    }
}
