//! Directed graph representation of a model.
//!
//! [`ModelGraph`] is an arena of typed nodes (entity, state, attribute,
//! invariant) connected by typed edges (structural ownership, state
//! transitions, inter-entity relationships), with a read-only query surface
//! used by the validators and the test synthesizer. [`build_graph`] converts a
//! parsed [`Model`](crate::schema::Model) into a graph in one deterministic
//! pass.
//!
//! Construction never fails: a model referencing undefined entities or states
//! still builds, and the dangling references are left for the reference
//! integrity validator to report.

pub mod builder;
pub mod model_graph;
pub mod types;

pub use builder::build_graph;
pub use model_graph::ModelGraph;
pub use types::{
    AttributeNode, Direction, EdgeKind, EntityNode, InvariantNode, Node, NodeId, RelationshipInfo,
    StateNode, TransitionInfo,
};
