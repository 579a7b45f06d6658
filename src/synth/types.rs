//! Data types for synthesized test cases.

use serde::{Deserialize, Serialize};

/// Kind of a synthesized test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// A declared transition succeeds.
    PositiveTransition,
    /// An undeclared state jump is rejected.
    NegativeTransition,
    /// A full initial-to-terminal walk.
    HappyPath,
    /// An entity-level invariant holds.
    EntityInvariant,
    /// A system-level invariant holds.
    SystemInvariant,
}

impl CaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PositiveTransition => "positive_transition",
            Self::NegativeTransition => "negative_transition",
            Self::HappyPath => "happy_path",
            Self::EntityInvariant => "entity_invariant",
            Self::SystemInvariant => "system_invariant",
        }
    }
}

/// A single synthesized test case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSpec {
    /// Deterministic test identifier, e.g. `test_order_draft_to_submitted`.
    pub name: String,
    pub kind: CaseKind,
    pub entity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
    /// State sequence for happy-path cases.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Formal expression for invariant cases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formal: Option<String>,
}

impl CaseSpec {
    pub fn new(
        name: impl Into<String>,
        kind: CaseKind,
        entity: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            entity: entity.into(),
            description: description.into(),
            from_state: None,
            to_state: None,
            trigger: None,
            guards: Vec::new(),
            effects: Vec::new(),
            path: Vec::new(),
            formal: None,
        }
    }
}

/// Test cases destined for one generated file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSpec {
    /// Owning entity name, or `"system"` for the system-invariant file.
    pub entity: String,
    /// Suggested file name, e.g. `order_test.rs`.
    pub filename: String,
    pub cases: Vec<CaseSpec>,
}

/// Result of running the synthesizer over a whole model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteSpec {
    pub files: Vec<FileSpec>,
}

impl SuiteSpec {
    /// Total number of cases across all files.
    pub fn total_cases(&self) -> usize {
        self.files.iter().map(|f| f.cases.len()).sum()
    }
}
