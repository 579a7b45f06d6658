//! Prompt templates for the semantic reviewer.

use crate::schema::Model;

/// System prompt steering the reviewer toward semantic gaps the structural
/// validators cannot detect. The response format is machine-parseable; see
/// [`super::parser`].
pub const SYSTEM_PROMPT: &str = r#"You are a system modeling expert analyzing declarative system models. Your task is to identify semantic issues that automated validators cannot detect.

Analyze the model for:
1. CONTRADICTION: Rules or constraints that conflict with each other
2. MISSING: Transitions, guards, or effects that should exist but don't
3. AMBIGUOUS: Unclear specifications that could be interpreted multiple ways
4. EDGE_CASE: Scenarios that aren't handled by the current model

Format your response EXACTLY as follows:

If you find issues:
---
ISSUE: [CONTRADICTION|MISSING|AMBIGUOUS|EDGE_CASE]
CONTEXT: [Entity.state] or [Entity] if no specific state
DESCRIPTION: A clear explanation of the issue
---

If the model is complete and has no issues:
NO_ISSUES_FOUND

Important:
- Focus on semantic gaps, not syntax or structural problems
- Consider real-world scenarios and edge cases
- Look for race conditions, timeouts, and error handling gaps
- Check if all paths have appropriate guards and effects
- Verify that invariants are enforceable and consistent
- Examine the 'unclear' sections if present - these are explicit ambiguities the author has noted"#;

/// Build the per-request analysis prompt containing the YAML-serialized
/// model. Empty collections are omitted from the serialization, keeping the
/// document the reviewer sees close to what the author wrote.
pub fn build_analysis_prompt(model: &Model) -> String {
    let model_yaml = match serde_yaml::to_string(model) {
        Ok(yaml) => yaml,
        Err(err) => {
            tracing::warn!("failed to serialize model for analysis prompt: {err}");
            String::new()
        }
    };

    format!(
        "Please analyze this system model for semantic issues:\n\n\
         ```yaml\n{model_yaml}```\n\n\
         Identify any contradictions, missing elements, ambiguities, or unhandled edge cases."
    )
}
