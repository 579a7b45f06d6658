//! Rendering of reports and synthesized test cases.
//!
//! The analyzers have no opinion on presentation; everything here consumes
//! their output read-only. [`report`] renders validation reports as
//! human-readable text or JSON; [`stubs`] renders synthesized cases as Rust
//! test source ready to drop into a `tests/` directory.

pub mod report;
pub mod stubs;

pub use report::{format_report, ReportFormat};
pub use stubs::render_file_spec;
