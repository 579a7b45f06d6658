//! Happy-path discovery: shortest walks from the initial state to each
//! terminal state.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::types::{CaseKind, CaseSpec};
use super::snake_case;
use crate::graph::ModelGraph;

/// Shortest path from the initial state to each terminal state, one path per
/// terminal. Terminals with no path are omitted. The result is sorted by
/// `(length, terminal name)` ascending.
pub fn find_happy_paths(entity_name: &str, graph: &ModelGraph) -> Vec<Vec<String>> {
    let Some(initial) = graph.initial_state(entity_name) else {
        return Vec::new();
    };
    let terminals = graph.terminal_states(entity_name);
    if terminals.is_empty() {
        return Vec::new();
    }

    let mut paths: Vec<Vec<String>> = terminals
        .iter()
        .filter_map(|terminal| bfs_path(entity_name, graph, initial, terminal))
        .collect();

    paths.sort_by(|a, b| {
        (a.len(), a.last())
            .cmp(&(b.len(), b.last()))
    });
    paths
}

/// Shortest path between two states via breadth-first search over transition
/// edges. Ties are broken by edge declaration order. Returns `None` when the
/// target is unreachable.
fn bfs_path(
    entity_name: &str,
    graph: &ModelGraph,
    start: &str,
    end: &str,
) -> Option<Vec<String>> {
    if start == end {
        return Some(vec![start.to_string()]);
    }

    let mut predecessor: FxHashMap<String, String> = FxHashMap::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(start.to_string());

    while let Some(current) = queue.pop_front() {
        for transition in graph.transitions_from(entity_name, &current) {
            let next = transition.to;
            if next == start || predecessor.contains_key(&next) {
                continue;
            }
            predecessor.insert(next.clone(), current.clone());
            if next == end {
                return Some(reconstruct(&predecessor, start, end));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(predecessor: &FxHashMap<String, String>, start: &str, end: &str) -> Vec<String> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while current != start {
        let prev = &predecessor[current];
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// One happy-path case per discovered path. Single-state paths (the initial
/// state is itself terminal) are skipped.
pub fn happy_path_cases(entity_name: &str, graph: &ModelGraph) -> Vec<CaseSpec> {
    let mut cases = Vec::new();

    for path in find_happy_paths(entity_name, graph) {
        if path.len() < 2 {
            continue;
        }
        let terminal = &path[path.len() - 1];
        let name = format!(
            "test_{}_lifecycle_to_{}",
            snake_case(entity_name),
            snake_case(terminal)
        );
        let description = format!("Test path: {}", path.join(" \u{2192} "));

        let mut case = CaseSpec::new(name, CaseKind::HappyPath, entity_name, description);
        case.from_state = Some(path[0].clone());
        case.to_state = Some(terminal.clone());
        case.path = path;
        cases.push(case);
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
    fn test_linear_machine_single_path() {
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
        let paths = find_happy_paths("Order", &graph);
        assert_eq!(paths, vec![vec!["pending", "in_progress", "completed"]]);
    }

    #[test]
    fn test_diamond_yields_exactly_one_path() {
        let graph = graph_for(
            r#"
entities:
  Flow:
    states:
      - { name: new, initial: true }
      - path_a
      - path_b
      - { name: done, terminal: true }
    transitions:
      - { from: new, to: path_a }
      - { from: new, to: path_b }
      - { from: path_a, to: done }
      - { from: path_b, to: done }
"#,
        );
        let paths = find_happy_paths("Flow", &graph);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 3);
        assert_eq!(paths[0][0], "new");
        assert_eq!(paths[0][2], "done");
    }

    #[test]
    fn test_paths_sorted_by_length_then_terminal_name() {
        let graph = graph_for(
            r#"
entities:
  Claim:
    states:
      - { name: open, initial: true }
      - review
      - { name: rejected, terminal: true }
      - { name: approved, terminal: true }
    transitions:
      - { from: open, to: rejected }
      - { from: open, to: review }
      - { from: review, to: approved }
"#,
        );
        let paths = find_happy_paths("Claim", &graph);
        assert_eq!(paths.len(), 2);
        // The two-state path comes first; the longer path follows.
        assert_eq!(paths[0], vec!["open", "rejected"]);
        assert_eq!(paths[1], vec!["open", "review", "approved"]);
    }

    #[test]
    fn test_shortest_path_wins_over_declared_order() {
        let graph = graph_for(
            r#"
entities:
  Ticket:
    states:
      - { name: start, initial: true }
      - a
      - b
      - { name: end, terminal: true }
    transitions:
      - { from: start, to: a }
      - { from: a, to: b }
      - { from: b, to: end }
      - { from: start, to: end }
"#,
        );
        let paths = find_happy_paths("Ticket", &graph);
        assert_eq!(paths, vec![vec!["start", "end"]]);
    }

    #[test]
    fn test_unreachable_terminal_is_omitted() {
        let graph = graph_for(
            r#"
entities:
  Odd:
    states:
      - { name: begin, initial: true }
      - { name: island, terminal: true }
"#,
        );
        assert!(find_happy_paths("Odd", &graph).is_empty());
    }

    #[test]
    fn test_no_terminal_or_no_initial_yields_nothing() {
        let no_terminal = graph_for(
            r#"
entities:
  A:
    states:
      - { name: only, initial: true }
"#,
        );
        assert!(happy_path_cases("A", &no_terminal).is_empty());

        let no_initial = graph_for(
            r#"
entities:
  B:
    states:
      - plain
      - { name: done, terminal: true }
    transitions:
      - { from: plain, to: done }
"#,
        );
        assert!(happy_path_cases("B", &no_initial).is_empty());
    }

    #[test]
    fn test_initial_equals_terminal_is_skipped() {
        let graph = graph_for(
            r#"
entities:
  Instant:
    states:
      - { name: done, initial: true, terminal: true }
"#,
        );
        // The single-state path exists but produces no case.
        assert_eq!(find_happy_paths("Instant", &graph).len(), 1);
        assert!(happy_path_cases("Instant", &graph).is_empty());
    }

    #[test]
    fn test_happy_path_case_shape() {
        let graph = graph_for(
            r#"
entities:
  Order:
    states:
      - { name: pending, initial: true }
      - { name: completed, terminal: true }
    transitions:
      - { from: pending, to: completed }
"#,
        );
        let cases = happy_path_cases("Order", &graph);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "test_order_lifecycle_to_completed");
        assert_eq!(cases[0].description, "Test path: pending \u{2192} completed");
        assert_eq!(cases[0].path, vec!["pending", "completed"]);
        assert_eq!(cases[0].kind, CaseKind::HappyPath);
    }
}
