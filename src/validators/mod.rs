//! Structural validation of models.
//!
//! Four independent checks, each a pure function producing a [`Report`]:
//!
//! - **Reference integrity** ([`reference_integrity`]): relationship targets
//!   name existing entities, transition endpoints name declared states.
//! - **Orphan detection** ([`orphans`]): every entity participates in at
//!   least one relationship edge.
//! - **Reachability** ([`reachability`]): an initial state exists and every
//!   declared state is reachable from it.
//! - **Terminal completeness** ([`reachability`]): states with no outgoing
//!   transitions are explicitly marked terminal.
//!
//! Validators always run to completion and never short-circuit each other, so
//! one pass surfaces every unrelated defect at once. The [`runner`] merges
//! the four reports in a fixed order, reference integrity first.

pub mod orphans;
pub mod reachability;
pub mod reference_integrity;
pub mod report;
pub mod runner;

pub use orphans::check_orphan_entities;
pub use reachability::{check_terminal_states, check_unreachable_states};
pub use reference_integrity::check_reference_integrity;
pub use report::{codes, Issue, Report, Severity};
pub use runner::{run_validators, validate_model, validate_model_file};
