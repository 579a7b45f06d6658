//! End-to-end validation pipeline tests over YAML fixtures.

use std::path::PathBuf;

use trellis::output::{format_report, ReportFormat};
use trellis::validators::{codes, validate_model_file};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_clean_model_validates_without_issues() {
    let report = validate_model_file(&fixture("order_system.yaml")).unwrap();
    assert!(report.is_valid(), "unexpected issues: {:?}", report.issues);
    assert!(report.issues.is_empty());
}

#[test]
fn test_broken_model_surfaces_every_defect_in_one_pass() {
    let report = validate_model_file(&fixture("broken.yaml")).unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.error_count(), 4);
    assert_eq!(report.warning_count(), 3);

    let issue_codes: Vec<&str> = report.issues.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(
        issue_codes,
        vec![
            codes::UNDEFINED_ENTITY_REF,
            codes::UNDEFINED_STATE_REF,
            codes::ORPHAN_ENTITY,
            codes::UNREACHABLE_STATE,
            codes::NO_INITIAL_STATE,
            codes::IMPLICIT_TERMINAL_STATE,
            codes::IMPLICIT_TERMINAL_STATE,
        ]
    );

    // Spot-check locations.
    assert_eq!(report.issues[0].entity.as_deref(), Some("Widget"));
    assert_eq!(report.issues[1].state.as_deref(), Some("missing_state"));
    assert_eq!(report.issues[2].entity.as_deref(), Some("Loner"));
    assert_eq!(report.issues[3].state.as_deref(), Some("secret"));
    assert_eq!(report.issues[4].entity.as_deref(), Some("Loner"));
}

#[test]
fn test_missing_file_is_a_schema_error() {
    let err = validate_model_file(&fixture("does_not_exist.yaml")).unwrap_err();
    assert!(err.to_string().contains("file not found"));
}

#[test]
fn test_text_and_json_renderings_agree_on_counts() {
    let report = validate_model_file(&fixture("broken.yaml")).unwrap();

    let text = format_report(&report, ReportFormat::Text);
    assert!(text.contains("Validation failed: 4 error(s), 3 warning(s)"));

    let json = format_report(&report, ReportFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["valid"], false);
    assert_eq!(value["error_count"], 4);
    assert_eq!(value["warning_count"], 3);
    assert_eq!(value["issues"].as_array().unwrap().len(), 7);
}

#[test]
fn test_validation_is_deterministic_across_runs() {
    let first = validate_model_file(&fixture("broken.yaml")).unwrap();
    let second = validate_model_file(&fixture("broken.yaml")).unwrap();
    let codes_of = |report: &trellis::Report| {
        report
            .issues
            .iter()
            .map(|i| (i.code.clone(), i.entity.clone(), i.state.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(codes_of(&first), codes_of(&second));
}
