/// Program match processing
use super::evaluator::EvaluationPolicy;
use super::grouper::group_requirements;
use super::selector::{evaluate_requirement, public_view};
use super::types::*;
use chrono::Utc;
use tracing::debug;

/// Computes a student's standing against whole programs.
pub struct ProgramMatchProcessor {
    policy: EvaluationPolicy,
}

impl ProgramMatchProcessor {
    /// Creates a new processor with the given evaluation policy
    pub fn new(policy: EvaluationPolicy) -> Self {
        Self { policy }
    }

    /// Evaluates every prerequisite slot of `program` for `student`
    /// and folds the results into a program-level verdict.
    ///
    /// A critical slot left unmet, or IB points under the program minimum,
    /// disqualifies the match. Unknown student points are not held against them.
    pub fn compute_program_match(
        &self,
        program: &Program,
        student: &StudentProfile,
    ) -> ProgramMatch {
        let requirements: Vec<RequirementEvaluation> = group_requirements(&program.requirements)
            .iter()
            .map(|slot| evaluate_requirement(&self.policy, slot, &student.courses))
            .collect();

        let count = |status: RequirementStatus| {
            requirements.iter().filter(|r| r.status == status).count()
        };
        let met_count = count(RequirementStatus::Met);
        let partially_met_count = count(RequirementStatus::PartiallyMet);
        let unmet_count = count(RequirementStatus::Unmet);

        let critical_unmet: Vec<String> = requirements
            .iter()
            .filter(|r| r.critical && r.status == RequirementStatus::Unmet)
            .map(|r| r.requirement_id.clone())
            .collect();

        let points = Self::check_points(program.min_ib_points, student.total_points);
        let score_percent = Self::score_percent(met_count, partially_met_count, requirements.len());

        let academic_match = if !critical_unmet.is_empty() || !points.passed {
            AcademicMatch::Disqualified
        } else if met_count == requirements.len() {
            AcademicMatch::Satisfied
        } else {
            AcademicMatch::Close
        };

        debug!(
            "Program {} vs student {}: {:?} ({} met, {} close, {} unmet)",
            program.id, student.id, academic_match, met_count, partially_met_count, unmet_count
        );

        ProgramMatch {
            program_id: program.id.clone(),
            student_id: student.id.clone(),
            academic_match,
            score_percent,
            met_count,
            partially_met_count,
            unmet_count,
            critical_unmet,
            points,
            requirements,
            evaluated_at: Utc::now(),
        }
    }

    /// Builds the anonymous requirement listing of a program.
    pub fn public_requirements(&self, program: &Program) -> Vec<PublicRequirementView> {
        group_requirements(&program.requirements)
            .iter()
            .map(public_view)
            .collect()
    }

    fn check_points(required: Option<u8>, student_points: Option<u8>) -> PointsCheck {
        let passed = match (required, student_points) {
            (Some(min), Some(points)) => points >= min,
            _ => true,
        };

        PointsCheck {
            required,
            student_points,
            passed,
        }
    }

    /// Met slots count fully, close ones half. Rounded down.
    fn score_percent(met: usize, partial: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        let half_points = met * 2 + partial;
        (half_points * 100 / (total * 2)) as u8
    }
}

impl Default for ProgramMatchProcessor {
    fn default() -> Self {
        Self::new(EvaluationPolicy::default())
    }
}
