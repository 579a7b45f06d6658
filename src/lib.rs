//! Trellis - graph-based analysis and test synthesis for declarative models.
//!
//! A Trellis model describes a system as named entities with attributes,
//! per-entity finite-state machines, typed inter-entity relationships, and
//! invariants. This crate parses such models from YAML, builds a directed
//! graph representation, validates the model structurally, and synthesizes
//! test-case specifications covering every declared transition, path, and
//! invariant.
//!
//! # Pipeline
//!
//! ```text
//! YAML -> schema::Model -> graph::ModelGraph -> { validators | synth } -> output
//! ```
//!
//! # Example
//!
//! ```
//! use trellis::schema::parse_model_str;
//! use trellis::validators::validate_model;
//! use trellis::synth::generate_tests;
//!
//! let model = parse_model_str(r#"
//! entities:
//!   Order:
//!     states:
//!       - { name: draft, initial: true }
//!       - { name: submitted, terminal: true }
//!     transitions:
//!       - { from: draft, to: submitted, trigger: submit }
//! "#).unwrap();
//!
//! let report = validate_model(&model);
//! assert!(report.is_valid());
//!
//! let suite = generate_tests(&model);
//! assert_eq!(suite.files.len(), 1);
//! ```
//!
//! Structural validation and test synthesis are pure, synchronous, in-memory
//! computations. The only I/O in the crate lives in the schema loader, the
//! optional LLM-backed [`semantic`] reviewer, and the CLI.

pub mod graph;
pub mod output;
pub mod schema;
pub mod semantic;
pub mod synth;
pub mod validators;

pub use graph::{build_graph, ModelGraph};
pub use schema::{parse_model, parse_model_str, Model, SchemaError};
pub use synth::{generate_tests, generate_tests_from_file, CaseKind, CaseSpec, FileSpec, SuiteSpec};
pub use validators::{validate_model, validate_model_file, Issue, Report, Severity};
