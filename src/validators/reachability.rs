//! State machine reachability and terminal completeness.

use super::report::{codes, Issue, Report};
use crate::graph::ModelGraph;

/// Error on entities whose states cannot all be reached from the initial
/// state, and on entities that declare states but mark none initial.
///
/// Entities without states are skipped entirely. When the initial state is
/// missing, only `NO_INITIAL_STATE` is reported for that entity; every state
/// would be trivially unreachable and reporting them all would bury the real
/// defect.
pub fn check_unreachable_states(graph: &ModelGraph) -> Report {
    let mut report = Report::new();

    for entity_name in graph.entity_names() {
        let states = graph.states_for(entity_name);
        if states.is_empty() {
            continue;
        }

        let Some(initial) = graph.initial_state(entity_name) else {
            report.push(
                Issue::error(
                    codes::NO_INITIAL_STATE,
                    format!("Entity '{entity_name}' has states but no initial state defined"),
                )
                .with_entity(entity_name),
            );
            continue;
        };

        let reachable = graph.reachable_states(entity_name);
        for state in states {
            if !reachable.contains(&state.name) {
                report.push(
                    Issue::error(
                        codes::UNREACHABLE_STATE,
                        format!(
                            "State '{}' cannot be reached from initial state '{initial}'",
                            state.name
                        ),
                    )
                    .with_entity(entity_name)
                    .with_state(&state.name),
                );
            }
        }
    }

    report
}

/// Warn about states with no outgoing transitions that are not flagged
/// terminal. These are usually terminal states the author forgot to mark.
pub fn check_terminal_states(graph: &ModelGraph) -> Report {
    let mut report = Report::new();

    for entity_name in graph.entity_names() {
        if graph.states_for(entity_name).is_empty() {
            continue;
        }

        let terminal: Vec<&str> = graph.terminal_states(entity_name);
        for state_name in graph.states_without_outgoing(entity_name) {
            if !terminal.contains(&state_name) {
                report.push(
                    Issue::warning(
                        codes::IMPLICIT_TERMINAL_STATE,
                        format!(
                            "State '{state_name}' has no outbound transitions but is not marked as terminal"
                        ),
                    )
                    .with_entity(entity_name)
                    .with_state(state_name),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::schema::parse_model_str;

    fn graph_for(yaml: &str) -> ModelGraph {
        build_graph(&parse_model_str(yaml).unwrap())
    }

    #[test]
    fn test_fully_reachable_machine_is_clean() {
        let graph = graph_for(
            r#"
entities:
  Order:
    states:
      - { name: pending, initial: true }
      - in_progress
      - { name: completed, terminal: true }
    transitions:
      - { from: pending, to: in_progress }
      - { from: in_progress, to: completed }
"#,
        );
        assert!(check_unreachable_states(&graph).issues.is_empty());
        assert!(check_terminal_states(&graph).issues.is_empty());
    }

    #[test]
    fn test_unreachable_state_is_reported() {
        let graph = graph_for(
            r#"
entities:
  Doc:
    states:
      - { name: pending, initial: true }
      - { name: done, terminal: true }
      - secret
    transitions:
      - { from: pending, to: done }
      - { from: secret, to: done }
"#,
        );
        let report = check_unreachable_states(&graph);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].code, codes::UNREACHABLE_STATE);
        assert_eq!(report.issues[0].state.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_initial_reports_once() {
        let graph = graph_for(
            r#"
entities:
  Task:
    states: [open, closed]
    transitions:
      - { from: open, to: closed }
"#,
        );
        let report = check_unreachable_states(&graph);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, codes::NO_INITIAL_STATE);
        assert_eq!(report.issues[0].entity.as_deref(), Some("Task"));
    }

    #[test]
    fn test_stateless_entities_are_skipped() {
        let graph = graph_for(
            r#"
entities:
  Config: {}
"#,
        );
        assert!(check_unreachable_states(&graph).issues.is_empty());
        assert!(check_terminal_states(&graph).issues.is_empty());
    }

    #[test]
    fn test_implicit_terminal_warning() {
        let graph = graph_for(
            r#"
entities:
  Ticket:
    states:
      - { name: open, initial: true }
      - stuck
    transitions:
      - { from: open, to: stuck }
"#,
        );
        let report = check_terminal_states(&graph);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.issues[0].code, codes::IMPLICIT_TERMINAL_STATE);
        assert_eq!(report.issues[0].state.as_deref(), Some("stuck"));
    }

    #[test]
    fn test_marked_terminal_is_not_flagged() {
        let graph = graph_for(
            r#"
entities:
  Ticket:
    states:
      - { name: open, initial: true }
      - { name: closed, terminal: true }
    transitions:
      - { from: open, to: closed }
"#,
        );
        assert!(check_terminal_states(&graph).issues.is_empty());
    }
}
