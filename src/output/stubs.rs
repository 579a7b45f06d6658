//! Rust test-stub rendering for synthesized cases.

use crate::synth::{CaseKind, CaseSpec, FileSpec};

/// Render a file specification as Rust test source.
///
/// Each case becomes a `#[test]` function whose body is a `todo!` describing
/// what to drive; the case metadata (trigger, guards, effects, path) lands in
/// comments so the implementer has the model's intent next to the stub.
pub fn render_file_spec(file: &FileSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "//! Test stubs for `{}`, generated from the model.\n//!\n//! Fill in each `todo!` with a real assertion against your implementation.\n",
        file.entity
    ));

    for case in &file.cases {
        out.push('\n');
        out.push_str(&render_case(case));
    }

    out
}

fn render_case(case: &CaseSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("/// {}\n", case.description.replace('\n', " ")));

    if let Some(trigger) = &case.trigger {
        out.push_str(&format!("/// trigger: {trigger}\n"));
    }
    if !case.guards.is_empty() {
        out.push_str(&format!("/// guards: {}\n", case.guards.join("; ")));
    }
    if !case.effects.is_empty() {
        out.push_str(&format!("/// effects: {}\n", case.effects.join("; ")));
    }
    if let Some(formal) = &case.formal {
        out.push_str(&format!("/// formal: {formal}\n"));
    }

    out.push_str("#[test]\n");
    out.push_str(&format!("fn {}() {{\n", case.name));
    out.push_str(&format!("    todo!(\"{}\");\n", escape(&todo_hint(case))));
    out.push_str("}\n");
    out
}

fn todo_hint(case: &CaseSpec) -> String {
    match case.kind {
        CaseKind::PositiveTransition => format!(
            "drive {} from {} to {}",
            case.entity,
            case.from_state.as_deref().unwrap_or("?"),
            case.to_state.as_deref().unwrap_or("?"),
        ),
        CaseKind::NegativeTransition => format!(
            "assert {} rejects {} -> {}",
            case.entity,
            case.from_state.as_deref().unwrap_or("?"),
            case.to_state.as_deref().unwrap_or("?"),
        ),
        CaseKind::HappyPath => format!("walk path {}", case.path.join(" -> ")),
        CaseKind::EntityInvariant | CaseKind::SystemInvariant => {
            format!("check invariant: {}", case.description)
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
