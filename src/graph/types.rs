//! Node and edge types for the model graph.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::schema::RelKind;
use crate::schema::Scope;

/// Index of a node in the graph arena.
///
/// Identifiers are sequential allocation indices: deterministic across runs
/// and collision-free by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A typed node in the model graph.
#[derive(Debug, Clone)]
pub enum Node {
    Entity(EntityNode),
    State(StateNode),
    Attribute(AttributeNode),
    Invariant(InvariantNode),
}

/// An entity node.
#[derive(Debug, Clone)]
pub struct EntityNode {
    pub name: String,
    pub has_states: bool,
    pub has_transitions: bool,
    /// False for placeholder nodes created by a relationship edge whose
    /// target entity was never added. Placeholders are invisible to the
    /// entity queries but keep dangling edges representable.
    pub declared: bool,
}

/// A state node, owned by an entity.
#[derive(Debug, Clone)]
pub struct StateNode {
    pub entity: String,
    pub name: String,
    pub initial: bool,
    pub terminal: bool,
    /// False for placeholder nodes created as transition endpoints for
    /// states the entity never declared.
    pub declared: bool,
}

/// An attribute node, owned by an entity.
#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub entity: String,
    pub name: String,
    pub attr_type: String,
    pub unique: bool,
    pub optional: bool,
}

/// An invariant node, owned by an entity or system-scoped.
#[derive(Debug, Clone)]
pub struct InvariantNode {
    pub entity: Option<String>,
    pub description: String,
    pub formal: Option<String>,
    pub scope: Scope,
}

/// A typed edge between two nodes.
#[derive(Debug, Clone)]
pub enum EdgeKind {
    /// Entity -> state ownership.
    HasState,
    /// Entity -> attribute ownership.
    HasAttribute,
    /// Entity -> invariant ownership.
    HasInvariant,
    /// State -> state transition.
    Transition(TransitionEdge),
    /// Entity -> entity relationship.
    Relationship(RelationshipEdge),
}

/// Payload of a transition edge.
#[derive(Debug, Clone)]
pub struct TransitionEdge {
    pub trigger: Option<String>,
    pub guards: Vec<String>,
    pub effects: Vec<String>,
}

/// Payload of a relationship edge.
#[derive(Debug, Clone)]
pub struct RelationshipEdge {
    pub kind: RelKind,
    pub conditions: Vec<String>,
}

/// An edge record in the graph.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

/// Direction of a relationship relative to the queried entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => f.write_str("outgoing"),
            Self::Incoming => f.write_str("incoming"),
        }
    }
}

/// A transition as returned by the query surface.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionInfo {
    pub from: String,
    pub to: String,
    pub trigger: Option<String>,
    pub guards: Vec<String>,
    pub effects: Vec<String>,
}

/// A relationship touching a queried entity, direction-tagged.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipInfo {
    #[serde(rename = "type")]
    pub kind: RelKind,
    /// The entity at the other end of the edge.
    pub other: String,
    pub direction: Direction,
}
