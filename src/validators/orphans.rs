//! Orphan entity detection.

use super::report::{codes, Issue, Report};
use crate::graph::ModelGraph;

/// Warn about entities with no relationship edges in either direction.
///
/// An orphan usually indicates a missing relationship or an entity that
/// should be removed, so this is a warning rather than an error.
pub fn check_orphan_entities(graph: &ModelGraph) -> Report {
    let mut report = Report::new();

    for entity_name in graph.entity_names() {
        if !graph.has_any_relationships(entity_name) {
            report.push(
                Issue::warning(
                    codes::ORPHAN_ENTITY,
                    format!("Entity '{entity_name}' has no relationships to other entities"),
                )
                .with_entity(entity_name),
            );
        }
    }

    report
}
