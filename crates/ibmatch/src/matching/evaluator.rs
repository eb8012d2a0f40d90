//! Requirement status evaluation.
//!
//! Decides whether a student's diploma meets, nearly meets or misses a single
//! course requirement. Precedence: course taken, level compatible, grade.

use super::types::{
    CourseRequirement, GradeValidator, IbLevel, OptionEvaluation, RequirementStatus, StudentCourse,
};
use serde::{Deserialize, Serialize};

/// Reason shown when the student never took the course.
pub const NOT_TAKEN_REASON: &str = "Not taken in your diploma.";

/// Tunables for status evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    /// Largest grade shortfall still reported as a close miss
    pub partial_grade_margin: u8,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            partial_grade_margin: 1,
        }
    }
}

impl EvaluationPolicy {
    pub fn new(partial_grade_margin: u8) -> Self {
        Self {
            partial_grade_margin,
        }
    }

    /// Evaluates one course requirement against all of the student's courses.
    ///
    /// When the student holds several courses with the requirement's code, the
    /// best outcome wins.
    pub fn evaluate_option(
        &self,
        requirement: &CourseRequirement,
        courses: &[StudentCourse],
    ) -> OptionEvaluation {
        courses
            .iter()
            .filter(|c| c.course_code == requirement.course.code)
            .map(|c| self.evaluate_taken(requirement, c))
            .reduce(|best, next| {
                if next.status.rank() > best.status.rank() {
                    next
                } else {
                    best
                }
            })
            .unwrap_or_else(|| OptionEvaluation {
                requirement_id: requirement.id.clone(),
                status: RequirementStatus::Unmet,
                reason: NOT_TAKEN_REASON.to_string(),
                taken: None,
                shortfall: 0,
            })
    }

    /// Evaluates a requirement against one course the student took.
    fn evaluate_taken(
        &self,
        requirement: &CourseRequirement,
        taken: &StudentCourse,
    ) -> OptionEvaluation {
        let required_level = requirement.required_level;
        let min_grade = requirement.min_grade;

        let (status, reason, shortfall) = if !taken.level.satisfies(required_level) {
            (
                RequirementStatus::Unmet,
                format!(
                    "You have {} {}, but {} {} is required.",
                    taken.level, taken.grade, required_level, min_grade
                ),
                GradeValidator::shortfall(taken.grade, min_grade),
            )
        } else {
            let substituted = taken.level == IbLevel::Higher && required_level == IbLevel::Standard;
            let shortfall = GradeValidator::shortfall(taken.grade, min_grade);

            if shortfall == 0 {
                let reason = if substituted {
                    format!(
                        "Met with HL {} (SL {} required).",
                        taken.grade, min_grade
                    )
                } else {
                    format!("Met: {} {} (requires {}).", taken.level, taken.grade, min_grade)
                };
                (RequirementStatus::Met, reason, 0)
            } else if shortfall <= self.partial_grade_margin {
                let grades = if shortfall == 1 { "grade" } else { "grades" };
                let mut reason = format!(
                    "Close: {} {} below ({} {}, requires {}).",
                    shortfall, grades, taken.level, taken.grade, min_grade
                );
                if substituted {
                    reason.push_str(" Counted from HL for an SL requirement.");
                }
                (RequirementStatus::PartiallyMet, reason, shortfall)
            } else {
                (
                    RequirementStatus::Unmet,
                    format!(
                        "Grade {} is below the required {}.",
                        taken.grade, min_grade
                    ),
                    shortfall,
                )
            }
        };

        OptionEvaluation {
            requirement_id: requirement.id.clone(),
            status,
            reason,
            taken: Some(taken.clone()),
            shortfall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::grouper::tests::requirement;

    fn course(code: &str, level: IbLevel, grade: u8) -> StudentCourse {
        StudentCourse {
            course_code: code.to_string(),
            level,
            grade,
        }
    }

    #[test]
    fn test_not_taken() {
        let req = requirement("r", "PHYS", "Physics", IbLevel::Higher, 5, None);
        let eval = EvaluationPolicy::default().evaluate_option(&req, &[]);
        assert_eq!(eval.status, RequirementStatus::Unmet);
        assert_eq!(eval.reason, NOT_TAKEN_REASON);
        assert!(!eval.was_taken());

        let other = [course("CHEM", IbLevel::Higher, 7)];
        let eval = EvaluationPolicy::default().evaluate_option(&req, &other);
        assert_eq!(eval.reason, NOT_TAKEN_REASON);
    }

    #[test]
    fn test_hl_satisfies_sl() {
        let req = requirement("r", "ENG_A", "English A", IbLevel::Standard, 4, None);
        let eval = EvaluationPolicy::default()
            .evaluate_option(&req, &[course("ENG_A", IbLevel::Higher, 4)]);
        assert_eq!(eval.status, RequirementStatus::Met);
        assert!(eval.reason.contains("HL"));
    }

    #[test]
    fn test_sl_never_satisfies_hl() {
        let req = requirement("r", "MATH_AA", "Mathematics", IbLevel::Higher, 5, None);
        for grade in [3, 5, 7] {
            let eval = EvaluationPolicy::default()
                .evaluate_option(&req, &[course("MATH_AA", IbLevel::Standard, grade)]);
            assert_eq!(eval.status, RequirementStatus::Unmet);
            assert!(eval.reason.contains("SL"));
            assert!(eval.reason.contains("HL 5"));
        }
    }

    #[test]
    fn test_one_grade_short_is_partial() {
        let req = requirement("r", "BIO", "Biology", IbLevel::Standard, 5, None);
        let eval = EvaluationPolicy::default()
            .evaluate_option(&req, &[course("BIO", IbLevel::Standard, 4)]);
        assert_eq!(eval.status, RequirementStatus::PartiallyMet);
        assert_eq!(eval.shortfall, 1);
        assert!(eval.reason.contains("1 grade below"));
        assert!(!eval.reason.contains("HL for an SL"));
    }

    #[test]
    fn test_partial_from_substitution_is_noted() {
        let req = requirement("r", "BIO", "Biology", IbLevel::Standard, 5, None);
        let eval = EvaluationPolicy::default()
            .evaluate_option(&req, &[course("BIO", IbLevel::Higher, 4)]);
        assert_eq!(eval.status, RequirementStatus::PartiallyMet);
        assert!(eval.reason.contains("HL for an SL"));
    }

    #[test]
    fn test_large_shortfall_is_unmet() {
        let req = requirement("r", "CHEM", "Chemistry", IbLevel::Higher, 6, None);
        let eval = EvaluationPolicy::default()
            .evaluate_option(&req, &[course("CHEM", IbLevel::Higher, 3)]);
        assert_eq!(eval.status, RequirementStatus::Unmet);
        assert_eq!(eval.shortfall, 3);
        assert!(eval.reason.contains('3') && eval.reason.contains('6'));
    }

    #[test]
    fn test_wider_margin() {
        let req = requirement("r", "CHEM", "Chemistry", IbLevel::Higher, 6, None);
        let policy = EvaluationPolicy::new(2);
        let eval = policy.evaluate_option(&req, &[course("CHEM", IbLevel::Higher, 4)]);
        assert_eq!(eval.status, RequirementStatus::PartiallyMet);
        assert!(eval.reason.contains("2 grades below"));
    }

    #[test]
    fn test_duplicate_course_keeps_best() {
        let req = requirement("r", "ECON", "Economics", IbLevel::Standard, 5, None);
        let courses = [
            course("ECON", IbLevel::Standard, 3),
            course("ECON", IbLevel::Higher, 6),
        ];
        let eval = EvaluationPolicy::default().evaluate_option(&req, &courses);
        assert_eq!(eval.status, RequirementStatus::Met);
        assert_eq!(eval.taken.map(|c| c.grade), Some(6));
    }
}
