//! Reference integrity: every name a model mentions must be defined.

use rustc_hash::FxHashSet;

use super::report::{codes, Issue, Report};
use crate::schema::Model;

/// Check that relationship targets name defined entities and transition
/// endpoints name states declared on their entity.
///
/// Transition references are only checked for entities that declare at least
/// one state; a stateless entity's transitions have no state namespace to
/// resolve against.
pub fn check_reference_integrity(model: &Model) -> Report {
    let mut report = Report::new();

    let entity_names: FxHashSet<&str> = model.entities.iter().map(|e| e.name.as_str()).collect();

    for entity in &model.entities {
        for rel in &entity.relationships {
            if !entity_names.contains(rel.target.as_str()) {
                report.push(
                    Issue::error(
                        codes::UNDEFINED_ENTITY_REF,
                        format!("Relationship references undefined entity '{}'", rel.target),
                    )
                    .with_entity(&entity.name)
                    .with_detail("referenced_entity", rel.target.clone())
                    .with_detail("relationship_type", rel.kind.as_str()),
                );
            }
        }

        if entity.states.is_empty() {
            continue;
        }
        let defined: FxHashSet<&str> = entity.states.iter().map(|s| s.name.as_str()).collect();

        for transition in &entity.transitions {
            for from_state in &transition.from_states {
                if !defined.contains(from_state.as_str()) {
                    report.push(
                        Issue::error(
                            codes::UNDEFINED_STATE_REF,
                            format!(
                                "Transition references undefined source state '{from_state}'"
                            ),
                        )
                        .with_entity(&entity.name)
                        .with_state(from_state),
                    );
                }
            }
            if !defined.contains(transition.to.as_str()) {
                report.push(
                    Issue::error(
                        codes::UNDEFINED_STATE_REF,
                        format!(
                            "Transition references undefined target state '{}'",
                            transition.to
                        ),
                    )
                    .with_entity(&entity.name)
                    .with_state(&transition.to),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_model_str;

    #[test]
    fn test_clean_model_has_no_issues() {
        let model = parse_model_str(
            r#"
entities:
  User:
    has_many: Post
    states:
      - { name: active, initial: true }
  Post:
    belongs_to: User
"#,
        )
        .unwrap();
        assert!(check_reference_integrity(&model).issues.is_empty());
    }

    #[test]
    fn test_undefined_relationship_target() {
        let model = parse_model_str(
            r#"
entities:
  User:
    has_many: Ghost
"#,
        )
        .unwrap();
        let report = check_reference_integrity(&model);
        assert_eq!(report.error_count(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.code, codes::UNDEFINED_ENTITY_REF);
        assert_eq!(issue.entity.as_deref(), Some("User"));
        assert_eq!(issue.details["referenced_entity"], "Ghost");
        assert_eq!(issue.details["relationship_type"], "has_many");
    }

    #[test]
    fn test_undefined_transition_states() {
        let model = parse_model_str(
            r#"
entities:
  Job:
    states:
      - { name: queued, initial: true }
    transitions:
      - { from: queued, to: finished }
      - { from: [phantom, queued], to: queued }
"#,
        )
        .unwrap();
        let report = check_reference_integrity(&model);
        let codes: Vec<_> = report.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![codes::UNDEFINED_STATE_REF, codes::UNDEFINED_STATE_REF]
        );
        assert_eq!(report.issues[0].state.as_deref(), Some("finished"));
        assert_eq!(report.issues[1].state.as_deref(), Some("phantom"));
    }

    #[test]
    fn test_stateless_entity_transitions_are_not_checked() {
        let model = parse_model_str(
            r#"
entities:
  Odd:
    transitions:
      - { from: nowhere, to: elsewhere }
"#,
        )
        .unwrap();
        assert!(check_reference_integrity(&model).issues.is_empty());
    }
}
