//! Issue and report types shared by all validators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable issue codes. These strings are part of the output contract and are
/// reproduced verbatim by every formatter.
pub mod codes {
    /// A relationship targets an entity the model never defines.
    pub const UNDEFINED_ENTITY_REF: &str = "UNDEFINED_ENTITY_REF";
    /// A transition endpoint names a state its entity never declares.
    pub const UNDEFINED_STATE_REF: &str = "UNDEFINED_STATE_REF";
    /// An entity has no relationship edges in either direction.
    pub const ORPHAN_ENTITY: &str = "ORPHAN_ENTITY";
    /// An entity declares states but none is marked initial.
    pub const NO_INITIAL_STATE: &str = "NO_INITIAL_STATE";
    /// A declared state cannot be reached from the initial state.
    pub const UNREACHABLE_STATE: &str = "UNREACHABLE_STATE";
    /// A state with no outgoing transitions is not marked terminal.
    pub const IMPLICIT_TERMINAL_STATE: &str = "IMPLICIT_TERMINAL_STATE";

    // Advisory codes produced by the semantic reviewer. They are merged into
    // reports here but never originate from the structural validators.
    pub const SEMANTIC_CONTRADICTION: &str = "SEMANTIC_CONTRADICTION";
    pub const SEMANTIC_MISSING: &str = "SEMANTIC_MISSING";
    pub const SEMANTIC_AMBIGUOUS: &str = "SEMANTIC_AMBIGUOUS";
    pub const SEMANTIC_EDGE_CASE: &str = "SEMANTIC_EDGE_CASE";
}

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A single validation issue.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub entity: Option<String>,
    pub state: Option<String>,
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Issue {
    pub fn new(code: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
            entity: None,
            state: None,
            details: serde_json::Map::new(),
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(f, "{severity}: {}", self.code)?;
        if let Some(entity) = &self.entity {
            write!(f, " [{entity}")?;
            if let Some(state) = &self.state {
                write!(f, ".{state}")?;
            }
            write!(f, "]")?;
        }
        write!(f, " - {}", self.message)
    }
}

/// Ordered collection of issues with derived counts and validity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Append all of `other`'s issues, preserving order.
    pub fn merge(&mut self, other: Report) {
        self.issues.extend(other.issues);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// A report is valid iff it has no errors; warnings never affect
    /// validity.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}
