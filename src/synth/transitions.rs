//! Positive and blocked transition cases.

use rustc_hash::FxHashSet;

use super::types::{CaseKind, CaseSpec};
use super::snake_case;
use crate::graph::ModelGraph;

/// One positive case per transition edge declared for the entity, in state
/// declaration order then edge order.
pub fn transition_cases(entity_name: &str, graph: &ModelGraph) -> Vec<CaseSpec> {
    let mut cases = Vec::new();

    for state in graph.states_for(entity_name) {
        for transition in graph.transitions_from(entity_name, &state.name) {
            let name = format!(
                "test_{}_{}_to_{}",
                snake_case(entity_name),
                snake_case(&transition.from),
                snake_case(&transition.to)
            );

            let mut description = format!(
                "{entity_name} transitions from {} to {}",
                transition.from, transition.to
            );
            if let Some(trigger) = &transition.trigger {
                description.push_str(&format!(" on {trigger}"));
            }

            let mut case = CaseSpec::new(name, CaseKind::PositiveTransition, entity_name, description);
            case.from_state = Some(transition.from);
            case.to_state = Some(transition.to);
            case.trigger = transition.trigger;
            case.guards = transition.guards;
            case.effects = transition.effects;
            cases.push(case);
        }
    }

    cases
}

/// Negative cases for adjacent-state skips.
///
/// For each state `S`, any state reachable in exactly two transition hops but
/// not in one is a skip candidate: `A -> B -> C` implies `A -> C` directly
/// must be rejected unless the model declares it. Entities with no initial
/// state produce no cases.
pub fn blocked_transition_cases(entity_name: &str, graph: &ModelGraph) -> Vec<CaseSpec> {
    let mut cases = Vec::new();

    if graph.initial_state(entity_name).is_none() {
        return cases;
    }

    let states = graph.states_for(entity_name);

    let mut declared: FxHashSet<(String, String)> = FxHashSet::default();
    for state in &states {
        for transition in graph.transitions_from(entity_name, &state.name) {
            declared.insert((transition.from, transition.to));
        }
    }

    for state in &states {
        // One hop out of this state, first-discovery order.
        let mut one_hop: Vec<String> = Vec::new();
        let mut one_hop_set: FxHashSet<String> = FxHashSet::default();
        for transition in graph.transitions_from(entity_name, &state.name) {
            if one_hop_set.insert(transition.to.clone()) {
                one_hop.push(transition.to);
            }
        }

        // Two hops out, first-discovery order.
        let mut two_hop: Vec<String> = Vec::new();
        let mut two_hop_set: FxHashSet<String> = FxHashSet::default();
        for next_state in &one_hop {
            for transition in graph.transitions_from(entity_name, next_state) {
                if two_hop_set.insert(transition.to.clone()) {
                    two_hop.push(transition.to);
                }
            }
        }

        for skip_to in two_hop {
            if one_hop_set.contains(&skip_to) || skip_to == state.name {
                continue;
            }
            if declared.contains(&(state.name.clone(), skip_to.clone())) {
                continue;
            }
            let name = format!(
                "test_{}_cannot_skip_{}_to_{}",
                snake_case(entity_name),
                snake_case(&state.name),
                snake_case(&skip_to)
            );
            let description = format!(
                "{entity_name} cannot skip from {} directly to {skip_to}",
                state.name
            );
            let mut case = CaseSpec::new(name, CaseKind::NegativeTransition, entity_name, description);
            case.from_state = Some(state.name.clone());
            case.to_state = Some(skip_to);
            cases.push(case);
        }
    }

    cases
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
    fn test_one_positive_case_per_transition() {
        let graph = graph_for(
            r#"
entities:
  Order:
    states:
      - { name: pending, initial: true }
      - in_progress
      - { name: completed, terminal: true }
    transitions:
      - { from: pending, to: in_progress, trigger: start }
      - { from: in_progress, to: completed }
"#,
        );
        let cases = transition_cases("Order", &graph);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "test_order_pending_to_in_progress");
        assert_eq!(cases[0].trigger.as_deref(), Some("start"));
        assert_eq!(
            cases[0].description,
            "Order transitions from pending to in_progress on start"
        );
        assert_eq!(cases[1].name, "test_order_in_progress_to_completed");
        assert!(cases[1].trigger.is_none());
    }

    #[test]
    fn test_guards_and_effects_are_carried() {
        let graph = graph_for(
            r#"
entities:
  Payment:
    states:
      - { name: due, initial: true }
      - { name: paid, terminal: true }
    transitions:
      - from: due
        to: paid
        trigger: pay
        requires: ["amount > 0"]
        effects: ["balance -= amount"]
"#,
        );
        let cases = transition_cases("Payment", &graph);
        assert_eq!(cases[0].guards, vec!["amount > 0"]);
        assert_eq!(cases[0].effects, vec!["balance -= amount"]);
    }

    #[test]
    fn test_linear_machine_yields_one_blocked_case() {
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
        let cases = blocked_transition_cases("Order", &graph);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "test_order_cannot_skip_pending_to_completed");
        assert_eq!(cases[0].from_state.as_deref(), Some("pending"));
        assert_eq!(cases[0].to_state.as_deref(), Some("completed"));
    }

    #[test]
    fn test_declared_shortcut_is_never_blocked() {
        let graph = graph_for(
            r#"
entities:
  Order:
    states:
      - { name: a, initial: true }
      - b
      - { name: c, terminal: true }
    transitions:
      - { from: a, to: b }
      - { from: b, to: c }
      - { from: a, to: c }
"#,
        );
        // a -> c exists directly, so the two-hop skip is not blocked.
        assert!(blocked_transition_cases("Order", &graph).is_empty());
    }

    #[test]
    fn test_self_cycle_is_not_a_skip() {
        let graph = graph_for(
            r#"
entities:
  Door:
    states:
      - { name: open, initial: true }
      - closed
    transitions:
      - { from: open, to: closed }
      - { from: closed, to: open }
"#,
        );
        // Two hops from `open` lead back to `open`; the candidate set
        // excludes the state itself.
        assert!(blocked_transition_cases("Door", &graph).is_empty());
    }

    #[test]
    fn test_no_initial_state_yields_no_blocked_cases() {
        let graph = graph_for(
            r#"
entities:
  Drifting:
    states: [a, b, c]
    transitions:
      - { from: a, to: b }
      - { from: b, to: c }
"#,
        );
        assert!(blocked_transition_cases("Drifting", &graph).is_empty());
    }
}
