//! Validation report rendering.

use crate::validators::{Issue, Report, Severity};

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Render a report in the requested format.
pub fn format_report(report: &Report, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => format_text(report),
        ReportFormat::Json => format_json(report),
    }
}

fn format_text(report: &Report) -> String {
    let mut lines: Vec<String> = Vec::new();

    let errors: Vec<&Issue> = report.errors().collect();
    let warnings: Vec<&Issue> = report.warnings().collect();

    lines.push("ERRORS:".to_string());
    if errors.is_empty() {
        lines.push("  (none)".to_string());
    } else {
        for issue in &errors {
            lines.push(format!("  {}", format_issue(issue)));
        }
    }

    lines.push(String::new());
    lines.push("WARNINGS:".to_string());
    if warnings.is_empty() {
        lines.push("  (none)".to_string());
    } else {
        for issue in &warnings {
            lines.push(format!("  {}", format_issue(issue)));
        }
    }

    lines.push(String::new());
    if report.is_valid() {
        if warnings.is_empty() {
            lines.push("Validation passed".to_string());
        } else {
            lines.push(format!(
                "Validation passed with {} warning(s)",
                warnings.len()
            ));
        }
    } else {
        lines.push(format!(
            "Validation failed: {} error(s), {} warning(s)",
            errors.len(),
            warnings.len()
        ));
    }

    lines.join("\n")
}

fn format_issue(issue: &Issue) -> String {
    let mut location = String::new();
    if let Some(entity) = &issue.entity {
        location.push('[');
        location.push_str(entity);
        if let Some(state) = &issue.state {
            location.push('.');
            location.push_str(state);
        }
        location.push_str("] ");
    }

    let symbol = match issue.severity {
        Severity::Error => "\u{2718}",
        Severity::Warning => "\u{26a0}",
    };

    format!("{symbol} {}: {location}{}", issue.code, issue.message)
}

fn format_json(report: &Report) -> String {
    let data = serde_json::json!({
        "valid": report.is_valid(),
        "error_count": report.error_count(),
        "warning_count": report.warning_count(),
        "issues": report.issues,
    });
    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
