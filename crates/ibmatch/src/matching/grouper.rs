/// Partitioning of flat requirement lists into prerequisite slots
use super::types::{CourseRequirement, Requirement};
use std::collections::HashMap;

/// Groups requirements that share an OR-group id into a single slot.
///
/// A group takes the position of its first member; standalone requirements keep
/// their relative order. Every input requirement appears exactly once in the output.
pub fn group_requirements(requirements: &[CourseRequirement]) -> Vec<Requirement> {
    let mut grouped: Vec<Requirement> = Vec::with_capacity(requirements.len());
    // OR-group id -> index into `grouped`
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for req in requirements {
        match req.or_group.as_deref() {
            Some(group_id) => match group_index.get(group_id) {
                Some(&idx) => {
                    if let Requirement::OrGroup { options, .. } = &mut grouped[idx] {
                        options.push(req.clone());
                    }
                }
                None => {
                    group_index.insert(group_id, grouped.len());
                    grouped.push(Requirement::OrGroup {
                        id: group_id.to_string(),
                        options: vec![req.clone()],
                    });
                }
            },
            None => grouped.push(Requirement::Standalone(req.clone())),
        }
    }

    grouped
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::matching::types::{IbCourse, IbLevel};

    pub(crate) fn requirement(
        id: &str,
        code: &str,
        name: &str,
        level: IbLevel,
        min_grade: u8,
        or_group: Option<&str>,
    ) -> CourseRequirement {
        CourseRequirement {
            id: id.to_string(),
            course: IbCourse {
                code: code.to_string(),
                name: name.to_string(),
                subject_group: 4,
            },
            required_level: level,
            min_grade,
            critical: false,
            or_group: or_group.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_requirements(&[]).is_empty());
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let reqs = vec![
            requirement("r1", "MATH_AA", "Mathematics", IbLevel::Higher, 5, None),
            requirement("r2", "BIO", "Biology", IbLevel::Higher, 5, Some("sci")),
            requirement("r3", "ENG_A", "English A", IbLevel::Standard, 4, None),
            requirement("r4", "CHEM", "Chemistry", IbLevel::Higher, 5, Some("sci")),
        ];

        let grouped = group_requirements(&reqs);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].id(), "r1");
        assert_eq!(grouped[1].id(), "sci");
        assert_eq!(grouped[2].id(), "r3");

        let option_ids: Vec<&str> = grouped[1].options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(option_ids, vec!["r2", "r4"]);
    }

    #[test]
    fn test_no_requirement_dropped_or_duplicated() {
        let reqs = vec![
            requirement("a", "PHYS", "Physics", IbLevel::Higher, 6, Some("g1")),
            requirement("b", "CHEM", "Chemistry", IbLevel::Higher, 6, Some("g2")),
            requirement("c", "BIO", "Biology", IbLevel::Higher, 6, Some("g1")),
            requirement("d", "ECON", "Economics", IbLevel::Standard, 5, None),
            requirement("e", "CS", "Computer Science", IbLevel::Higher, 6, Some("g2")),
        ];

        let grouped = group_requirements(&reqs);
        let total: usize = grouped.iter().map(|g| g.options().len()).sum();
        assert_eq!(total, reqs.len());

        let mut ids: Vec<&str> = grouped
            .iter()
            .flat_map(|g| g.options())
            .map(|o| o.id.as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_single_member_group_stays_a_group() {
        let reqs = vec![requirement("x", "HIST", "History", IbLevel::Standard, 4, Some("hum"))];
        let grouped = group_requirements(&reqs);
        assert!(matches!(grouped[0], Requirement::OrGroup { .. }));
    }
}
