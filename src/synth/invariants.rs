//! Invariant cases for entities and the system.

use super::types::{CaseKind, CaseSpec};
use super::snake_case;
use crate::schema::{Entity, Model};

const SLUG_MAX_LEN: usize = 40;

/// Truncate to `max_len` characters, replacing the tail with an ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{head}...")
}

/// Reduce a free-text description to an identifier fragment: punctuation is
/// stripped, then the remainder is snake-cased.
fn slug(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    snake_case(&cleaned)
}

/// One case per entity invariant. Names derive from a slug of the truncated
/// description; a numeric index suffix guarantees uniqueness on collision.
pub fn entity_invariant_cases(entity: &Entity) -> Vec<CaseSpec> {
    let mut cases: Vec<CaseSpec> = Vec::new();

    for (i, invariant) in entity.invariants.iter().enumerate() {
        let desc_slug = slug(&truncate(&invariant.description, SLUG_MAX_LEN));
        let mut name = format!("test_{}_invariant_{desc_slug}", snake_case(&entity.name));
        if cases.iter().any(|c| c.name == name) {
            name = format!("{name}_{i}");
        }

        let mut case = CaseSpec::new(
            name,
            CaseKind::EntityInvariant,
            &entity.name,
            &invariant.description,
        );
        case.formal = invariant.formal.clone();
        cases.push(case);
    }

    cases
}

/// One case per system invariant, grouped under the `"system"` entity.
pub fn system_invariant_cases(model: &Model) -> Vec<CaseSpec> {
    let mut cases: Vec<CaseSpec> = Vec::new();

    for (i, invariant) in model.system_invariants.iter().enumerate() {
        let desc_slug = slug(&truncate(&invariant.description, SLUG_MAX_LEN));
        let mut name = format!("test_system_invariant_{desc_slug}");
        if cases.iter().any(|c| c.name == name) {
            name = format!("{name}_{i}");
        }

        let mut case = CaseSpec::new(
            name,
            CaseKind::SystemInvariant,
            "system",
            &invariant.description,
        );
        case.formal = invariant.formal.clone();
        cases.push(case);
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_model_str;

    #[test]
    fn test_slug_strips_punctuation() {
        assert_eq!(slug("balance >= 0, always!"), "balance__0_always");
        assert_eq!(slug("Total is non-negative"), "total_is_nonnegative");
    }

    #[test]
    fn test_truncate_long_descriptions() {
        let long = "a".repeat(60);
        let out = truncate(&long, 40);
        assert_eq!(out.chars().count(), 40);
        assert!(out.ends_with("..."));
        assert_eq!(truncate("short", 40), "short");
    }

    #[test]
    fn test_entity_invariant_names_and_payload() {
        let model = parse_model_str(
            r#"
entities:
  Account:
    invariants:
      - { description: "balance is never negative", formal: "balance >= 0" }
"#,
        )
        .unwrap();
        let cases = entity_invariant_cases(model.entity("Account").unwrap());
        assert_eq!(cases.len(), 1);
        assert_eq!(
            cases[0].name,
            "test_account_invariant_balance_is_never_negative"
        );
        assert_eq!(cases[0].formal.as_deref(), Some("balance >= 0"));
        assert_eq!(cases[0].kind, CaseKind::EntityInvariant);
    }

    #[test]
    fn test_duplicate_descriptions_get_index_suffix() {
        let model = parse_model_str(
            r#"
entities:
  Account:
    invariants:
      - same rule
      - same rule
      - same rule
"#,
        )
        .unwrap();
        let cases = entity_invariant_cases(model.entity("Account").unwrap());
        let names: Vec<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "test_account_invariant_same_rule",
                "test_account_invariant_same_rule_1",
                "test_account_invariant_same_rule_2",
            ]
        );
    }

    #[test]
    fn test_system_invariants_grouped_under_system() {
        let model = parse_model_str(
            r#"
system_invariants:
  - audit log is append-only
"#,
        )
        .unwrap();
        let cases = system_invariant_cases(&model);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].entity, "system");
        assert_eq!(
            cases[0].name,
            "test_system_invariant_audit_log_is_appendonly"
        );
        assert_eq!(cases[0].kind, CaseKind::SystemInvariant);
    }
}
