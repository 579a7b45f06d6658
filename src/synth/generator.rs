//! Synthesis pipelines: per-entity grouping and file specs.

use std::path::Path;

use super::invariants::{entity_invariant_cases, system_invariant_cases};
use super::paths::happy_path_cases;
use super::transitions::{blocked_transition_cases, transition_cases};
use super::types::{FileSpec, SuiteSpec};
use super::snake_case;
use crate::graph::{build_graph, ModelGraph};
use crate::schema::{parse_model, Model, SchemaError};

/// Synthesize all test cases for a model against its graph.
///
/// State machine cases are only generated for entities with declared states;
/// invariant cases are generated regardless. An entity contributing no cases
/// produces no file. System invariants land in their own trailing file.
pub fn generate_cases(model: &Model, graph: &ModelGraph) -> SuiteSpec {
    let mut files = Vec::new();

    for entity in &model.entities {
        let mut cases = Vec::new();

        if !entity.states.is_empty() {
            cases.extend(transition_cases(&entity.name, graph));
            cases.extend(blocked_transition_cases(&entity.name, graph));
            cases.extend(happy_path_cases(&entity.name, graph));
        }

        if !entity.invariants.is_empty() {
            cases.extend(entity_invariant_cases(entity));
        }

        if !cases.is_empty() {
            files.push(FileSpec {
                entity: entity.name.clone(),
                filename: format!("{}_test.rs", snake_case(&entity.name)),
                cases,
            });
        }
    }

    if !model.system_invariants.is_empty() {
        let cases = system_invariant_cases(model);
        if !cases.is_empty() {
            files.push(FileSpec {
                entity: "system".to_string(),
                filename: "system_invariants_test.rs".to_string(),
                cases,
            });
        }
    }

    SuiteSpec { files }
}

/// Build the graph for a model and synthesize its test suite.
pub fn generate_tests(model: &Model) -> SuiteSpec {
    let graph = build_graph(model);
    generate_cases(model, &graph)
}

/// Load, parse, and synthesize tests for a model file.
pub fn generate_tests_from_file(path: &Path) -> Result<SuiteSpec, SchemaError> {
    let model = parse_model(path)?;
    Ok(generate_tests(&model))
}
