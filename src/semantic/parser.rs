//! Parsing of reviewer responses into advisory issues.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validators::{codes, Issue, Report};

/// Matches an issue header through the start of its description. The
/// description body runs until the next block separator and is sliced out
/// manually, since its length is unbounded.
static ISSUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)ISSUE:\s*\[?(CONTRADICTION|MISSING|AMBIGUOUS|EDGE_CASE)\]?\s*\r?\nCONTEXT:\s*\[?([^\]\r\n]+)\]?\s*\r?\nDESCRIPTION:\s*",
    )
    .expect("issue pattern is valid")
});

/// Matches `Entity` or `Entity.state` context tags.
static CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\.([A-Za-z_][A-Za-z0-9_]*))?$")
        .expect("context pattern is valid")
});

/// Parse the reviewer's response text into a report.
///
/// Issues arrive as `ISSUE:`/`CONTEXT:`/`DESCRIPTION:` blocks separated by
/// `---` lines; a lone `NO_ISSUES_FOUND` marker short-circuits to an empty
/// report. Everything parsed becomes a warning: semantic findings are
/// advisory, never validity-affecting.
pub fn parse_review(text: &str) -> Report {
    let mut report = Report::new();

    if text.to_uppercase().contains("NO_ISSUES_FOUND") {
        return report;
    }

    for captures in ISSUE_RE.captures_iter(text) {
        let issue_type = captures[1].to_uppercase();
        let context = captures[2].trim().to_string();

        let whole = captures.get(0).map(|m| m.end()).unwrap_or(0);
        let rest = &text[whole..];
        let end = ["\n---", "\n\nISSUE:"]
            .iter()
            .filter_map(|sep| rest.find(sep))
            .min()
            .unwrap_or(rest.len());
        let description = rest[..end].trim();
        if description.is_empty() {
            continue;
        }

        let code = match issue_type.as_str() {
            "CONTRADICTION" => codes::SEMANTIC_CONTRADICTION,
            "MISSING" => codes::SEMANTIC_MISSING,
            "AMBIGUOUS" => codes::SEMANTIC_AMBIGUOUS,
            _ => codes::SEMANTIC_EDGE_CASE,
        };

        let (entity, state) = parse_context(&context);
        let mut issue = Issue::warning(code, description);
        issue.entity = entity;
        issue.state = state;
        report.push(issue);
    }

    report
}

/// Split a context tag like `Order.draft` into entity and state parts.
/// General markers (`general`, `system`, `global`, `n/a`, `none`) and
/// anything unrecognizable yield no location.
fn parse_context(context: &str) -> (Option<String>, Option<String>) {
    let context = context.trim_matches(|c| c == '[' || c == ']').trim();

    if matches!(
        context.to_lowercase().as_str(),
        "general" | "system" | "global" | "n/a" | "none"
    ) {
        return (None, None);
    }

    match CONTEXT_RE.captures(context) {
        Some(captures) => (
            Some(captures[1].to_string()),
            captures.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::Severity;

    #[test]
    fn test_no_issues_marker_yields_empty_report() {
        let report = parse_review("NO_ISSUES_FOUND");
        assert!(report.issues.is_empty());
        // Case-insensitive, even embedded in prose.
        let report = parse_review("After careful review: no_issues_found.");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_single_issue_block() {
        let text = "---\nISSUE: [MISSING]\nCONTEXT: [Order.draft]\nDESCRIPTION: No timeout transition for stale drafts.\n---";
        let report = parse_review(text);
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.code, codes::SEMANTIC_MISSING);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.entity.as_deref(), Some("Order"));
        assert_eq!(issue.state.as_deref(), Some("draft"));
        assert_eq!(issue.message, "No timeout transition for stale drafts.");
    }

    #[test]
    fn test_multiple_issue_blocks() {
        let text = "\
---
ISSUE: CONTRADICTION
CONTEXT: Account
DESCRIPTION: Invariant says balance >= 0 but overdraft transition allows negative balance.
---
ISSUE: EDGE_CASE
CONTEXT: general
DESCRIPTION: Nothing handles concurrent updates.
---";
        let report = parse_review(text);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].code, codes::SEMANTIC_CONTRADICTION);
        assert_eq!(report.issues[0].entity.as_deref(), Some("Account"));
        assert!(report.issues[0].state.is_none());
        assert_eq!(report.issues[1].code, codes::SEMANTIC_EDGE_CASE);
        assert!(report.issues[1].entity.is_none());
    }

    #[test]
    fn test_multiline_description_stops_at_separator() {
        let text = "ISSUE: AMBIGUOUS\nCONTEXT: Job\nDESCRIPTION: The retry policy\nis underspecified.\n---\ntrailing commentary";
        let report = parse_review(text);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].message,
            "The retry policy\nis underspecified."
        );
    }

    #[test]
    fn test_unparseable_context_yields_no_location() {
        let text = "ISSUE: MISSING\nCONTEXT: somewhere out there\nDESCRIPTION: Vague location.";
        let report = parse_review(text);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].entity.is_none());
        assert!(report.issues[0].state.is_none());
    }

    #[test]
    fn test_freeform_text_without_blocks_yields_nothing() {
        let report = parse_review("The model looks mostly reasonable to me!");
        assert!(report.issues.is_empty());
    }
}
