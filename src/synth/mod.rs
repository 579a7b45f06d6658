//! Test-case synthesis from a model graph.
//!
//! Four independent generators, run per entity:
//!
//! - **Transition cases** ([`transitions`]): one positive case per declared
//!   transition edge.
//! - **Blocked-transition cases** ([`transitions`]): negative cases asserting
//!   that skipping an intermediate state (two hops collapsed into one) is
//!   rejected.
//! - **Happy-path cases** ([`paths`]): the shortest transition sequence from
//!   the initial state to each terminal state.
//! - **Invariant cases** ([`invariants`]): one case per entity invariant and
//!   per system invariant.
//!
//! [`generator`] groups the cases into one file specification per entity plus
//! a system-level file. Synthesis degrades gracefully: missing structure (no
//! initial state, no terminals, no transitions) produces fewer or zero cases,
//! never an error.

pub mod generator;
pub mod invariants;
pub mod paths;
pub mod transitions;
pub mod types;

pub use generator::{generate_cases, generate_tests, generate_tests_from_file};
pub use types::{CaseKind, CaseSpec, FileSpec, SuiteSpec};

/// Lowercase a name and normalize separators for use in a test identifier.
pub(crate) fn snake_case(s: &str) -> String {
    s.to_lowercase().replace([' ', '-'], "_")
}
