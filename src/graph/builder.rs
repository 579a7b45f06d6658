//! One-pass conversion from a parsed model to a [`ModelGraph`].

use super::model_graph::ModelGraph;
use crate::schema::Model;

/// Build a [`ModelGraph`] from a model.
///
/// The pass runs in a fixed order: every entity with its attributes, states,
/// transitions (one edge per source state), and entity-scope invariants;
/// then, once all entity nodes exist, every relationship edge (so forward
/// references attach correctly); then system-scope invariants. Building
/// never fails; dangling references survive as placeholder nodes for the
/// validators to report.
pub fn build_graph(model: &Model) -> ModelGraph {
    let mut graph = ModelGraph::new();

    for entity in &model.entities {
        graph.add_entity(
            &entity.name,
            !entity.states.is_empty(),
            !entity.transitions.is_empty(),
        );

        for attr in &entity.attributes {
            graph.add_attribute(
                &entity.name,
                &attr.name,
                &attr.attr_type,
                attr.unique,
                attr.optional,
            );
        }

        for state in &entity.states {
            graph.add_state(&entity.name, &state.name, state.initial, state.terminal);
        }

        for transition in &entity.transitions {
            for from_state in &transition.from_states {
                graph.add_transition(
                    &entity.name,
                    from_state,
                    &transition.to,
                    transition.trigger.as_deref(),
                    &transition.requires,
                    &transition.effects,
                );
            }
        }

        for invariant in &entity.invariants {
            graph.add_invariant(
                Some(&entity.name),
                &invariant.description,
                invariant.formal.as_deref(),
            );
        }
    }

    for entity in &model.entities {
        for rel in &entity.relationships {
            graph.add_relationship(&entity.name, &rel.target, rel.kind.as_str(), &rel.conditions);
        }
    }

    for invariant in &model.system_invariants {
        graph.add_invariant(None, &invariant.description, invariant.formal.as_deref());
    }

    graph
}
