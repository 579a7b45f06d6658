//! Validation pipelines.

use std::path::Path;

use super::orphans::check_orphan_entities;
use super::reachability::{check_terminal_states, check_unreachable_states};
use super::reference_integrity::check_reference_integrity;
use super::report::Report;
use crate::graph::{build_graph, ModelGraph};
use crate::schema::{parse_model, Model, SchemaError};

/// Run all four validators and merge their reports.
///
/// The checks are independent; the merge order (reference integrity first,
/// as the most fundamental) only affects issue ordering, never which issues
/// are found.
pub fn run_validators(model: &Model, graph: &ModelGraph) -> Report {
    let mut report = Report::new();
    report.merge(check_reference_integrity(model));
    report.merge(check_orphan_entities(graph));
    report.merge(check_unreachable_states(graph));
    report.merge(check_terminal_states(graph));
    report
}

/// Build the graph for a model and validate it.
pub fn validate_model(model: &Model) -> Report {
    let graph = build_graph(model);
    run_validators(model, &graph)
}

/// Load, parse, and validate a model file.
pub fn validate_model_file(path: &Path) -> Result<Report, SchemaError> {
    let model = parse_model(path)?;
    Ok(validate_model(&model))
}
