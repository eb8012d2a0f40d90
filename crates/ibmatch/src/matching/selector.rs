/// Option selection for prerequisite slots, evaluated and public
use super::evaluator::{EvaluationPolicy, NOT_TAKEN_REASON};
use super::types::{
    CourseRequirement, IbCourse, IbLevel, OptionEvaluation, PublicRequirementView, Requirement,
    RequirementEvaluation, RequirementStatus, StudentCourse,
};

/// Evaluates a slot and picks the option to display.
///
/// Options the student actually took are preferred (best status first). Only when
/// none were taken does the search fall back to every option, which then all read
/// as not taken and the first option is shown.
pub fn evaluate_requirement(
    policy: &EvaluationPolicy,
    requirement: &Requirement,
    courses: &[StudentCourse],
) -> RequirementEvaluation {
    let options = requirement.options();
    let evaluations: Vec<(&CourseRequirement, OptionEvaluation)> = options
        .iter()
        .map(|opt| (opt, policy.evaluate_option(opt, courses)))
        .collect();

    let taken_best = best_of(evaluations.iter().filter(|(_, e)| e.was_taken()));
    let chosen = taken_best.or_else(|| best_of(evaluations.iter()));

    match chosen {
        Some((option, eval)) => RequirementEvaluation {
            requirement_id: requirement.id().to_string(),
            status: eval.status,
            label: eval.status.label().to_string(),
            severity: eval.status.severity(),
            reason: eval.reason.clone(),
            shortfall: eval.shortfall,
            critical: requirement.is_critical(),
            display_option: (*option).clone(),
            option_count: options.len(),
        },
        // Empty OR-groups cannot come out of the grouper; treat as a missing course
        None => empty_slot(requirement),
    }
}

/// Picks the highest ranked evaluation, first in declaration order on ties.
fn best_of<'a, T: 'a>(
    evaluations: impl Iterator<Item = &'a (T, OptionEvaluation)>,
) -> Option<&'a (T, OptionEvaluation)> {
    evaluations.fold(None, |best, candidate| match best {
        Some(b) if b.1.status.rank() >= candidate.1.status.rank() => Some(b),
        _ => Some(candidate),
    })
}

fn empty_slot(requirement: &Requirement) -> RequirementEvaluation {
    let status = RequirementStatus::Unmet;
    RequirementEvaluation {
        requirement_id: requirement.id().to_string(),
        status,
        label: status.label().to_string(),
        severity: status.severity(),
        reason: NOT_TAKEN_REASON.to_string(),
        shortfall: 0,
        critical: requirement.is_critical(),
        display_option: CourseRequirement {
            id: requirement.id().to_string(),
            course: IbCourse {
                code: String::new(),
                name: String::new(),
                subject_group: 0,
            },
            required_level: IbLevel::Standard,
            min_grade: 0,
            critical: false,
            or_group: None,
        },
        option_count: 0,
    }
}

/// Builds the anonymous display of a slot: what is required, with no verdict.
pub fn public_view(requirement: &Requirement) -> PublicRequirementView {
    let options = requirement.options();
    let names: Vec<&str> = options.iter().map(|o| o.course.name.as_str()).collect();

    let label = match names.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} or {second}"),
        many => format!("One of: {}", many.join(", ")),
    };

    let required_level = uniform(options.iter().map(|o| o.required_level));
    let min_grade = uniform(options.iter().map(|o| o.min_grade));

    PublicRequirementView {
        requirement_id: requirement.id().to_string(),
        label,
        required_level,
        min_grade,
        critical: requirement.is_critical(),
        options: options.to_vec(),
    }
}

/// Returns the shared value if every item is equal, None otherwise or when empty.
fn uniform<T: PartialEq + Copy>(mut values: impl Iterator<Item = T>) -> Option<T> {
    let first = values.next()?;
    values.all(|v| v == first).then_some(first)
}
