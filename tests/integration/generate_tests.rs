//! End-to-end test synthesis pipeline tests over YAML fixtures.

use std::path::PathBuf;

use trellis::output::render_file_spec;
use trellis::synth::{generate_tests_from_file, CaseKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_suite_structure_for_order_system() {
    let suite = generate_tests_from_file(&fixture("order_system.yaml")).unwrap();

    // Customer has neither states nor invariants, so only Order and the
    // system group produce files.
    assert_eq!(suite.files.len(), 2);
    assert_eq!(suite.files[0].entity, "Order");
    assert_eq!(suite.files[0].filename, "order_test.rs");
    assert_eq!(suite.files[1].entity, "system");
    assert_eq!(suite.files[1].filename, "system_invariants_test.rs");
    assert_eq!(suite.total_cases(), 9);
}

#[test]
fn test_order_cases_cover_all_kinds() {
    let suite = generate_tests_from_file(&fixture("order_system.yaml")).unwrap();
    let order = &suite.files[0];

    let count = |kind: CaseKind| order.cases.iter().filter(|c| c.kind == kind).count();
    // Three declared transitions, one with two source states: four edges.
    assert_eq!(count(CaseKind::PositiveTransition), 4);
    // Only pending -> completed is a two-hop skip without a direct edge.
    assert_eq!(count(CaseKind::NegativeTransition), 1);
    // One path per terminal state.
    assert_eq!(count(CaseKind::HappyPath), 2);
    assert_eq!(count(CaseKind::EntityInvariant), 1);
}

#[test]
fn test_blocked_case_never_duplicates_a_declared_edge() {
    let suite = generate_tests_from_file(&fixture("order_system.yaml")).unwrap();
    let order = &suite.files[0];

    let declared: Vec<(Option<&str>, Option<&str>)> = order
        .cases
        .iter()
        .filter(|c| c.kind == CaseKind::PositiveTransition)
        .map(|c| (c.from_state.as_deref(), c.to_state.as_deref()))
        .collect();

    for case in order.cases.iter().filter(|c| c.kind == CaseKind::NegativeTransition) {
        let pair = (case.from_state.as_deref(), case.to_state.as_deref());
        assert!(
            !declared.contains(&pair),
            "blocked case duplicates declared edge {pair:?}"
        );
    }
}

#[test]
fn test_happy_paths_sorted_shortest_first() {
    let suite = generate_tests_from_file(&fixture("order_system.yaml")).unwrap();
    let paths: Vec<&Vec<String>> = suite.files[0]
        .cases
        .iter()
        .filter(|c| c.kind == CaseKind::HappyPath)
        .map(|c| &c.path)
        .collect();

    assert_eq!(paths[0], &vec!["pending".to_string(), "cancelled".to_string()]);
    assert_eq!(
        paths[1],
        &vec![
            "pending".to_string(),
            "in_progress".to_string(),
            "completed".to_string()
        ]
    );
}

#[test]
fn test_rendered_files_are_plausible_rust() {
    let suite = generate_tests_from_file(&fixture("order_system.yaml")).unwrap();
    for file in &suite.files {
        let source = render_file_spec(file);
        assert!(source.starts_with("//!"));
        assert_eq!(
            source.matches("#[test]").count(),
            file.cases.len(),
            "one #[test] per case in {}",
            file.filename
        );
        assert!(!source.contains("\"\""), "no empty todo messages");
    }
}

#[test]
fn test_generation_degrades_gracefully_on_broken_model() {
    // The broken fixture has dangling references and a stateless machine;
    // synthesis still succeeds with whatever structure is usable.
    let suite = generate_tests_from_file(&fixture("broken.yaml")).unwrap();
    assert_eq!(suite.files.len(), 1);
    assert_eq!(suite.files[0].entity, "Widget");
    let kinds: Vec<CaseKind> = suite.files[0].cases.iter().map(|c| c.kind).collect();
    // Two transition edges (one to an undeclared state) and one happy path;
    // Loner has no initial state and produces nothing.
    assert_eq!(
        kinds,
        vec![
            CaseKind::PositiveTransition,
            CaseKind::PositiveTransition,
            CaseKind::HappyPath,
        ]
    );
}
