//! Model schema: normalized data types and YAML loading.
//!
//! The schema layer is the crate's only input boundary. [`loader`] reads a
//! YAML document and produces a fully normalized [`Model`]: entity names are
//! injected from the mapping keys, scalar shorthands (`from: draft`, bare
//! state/attribute/invariant strings, `has_many: Post`) are expanded to their
//! long forms, and system invariants are forced to system scope. Downstream
//! components never re-check shapes or required fields.

pub mod loader;
pub mod model;

pub use loader::{load_yaml, parse_model, parse_model_str, SchemaError};
pub use model::{
    Attribute, Computed, Entity, Invariant, Model, RelKind, Relationship, Scope, State, Transition,
};
