//! LLM-backed semantic review.
//!
//! The structural validators catch what a graph can prove; this module asks a
//! language model about everything it cannot: contradictory rules, missing
//! transitions and guards, ambiguous wording, and unhandled edge cases. The
//! model document is serialized to YAML, sent to the Anthropic Messages API,
//! and the structured response is parsed back into advisory warning issues
//! (`SEMANTIC_*` codes) that merge into the same [`Report`](crate::Report)
//! the validators produce.
//!
//! The prompt builder and response parser are pure; only
//! [`SemanticReviewer::review`] touches the network.

pub mod parser;
pub mod prompts;
pub mod reviewer;

pub use parser::parse_review;
pub use prompts::{build_analysis_prompt, SYSTEM_PROMPT};
pub use reviewer::{review_model, SemanticError, SemanticReviewer, DEFAULT_MODEL};
