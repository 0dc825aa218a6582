//! Auth keys, `.env`, and the test stub context.

use serde_json::Value;

use crate::domain::{
    definition::{AppDefinition, StepCategory, step_input_fields, step_key},
    error::DomainError,
    format::ArtifactKind,
    literal::{Emit, Key, Literal, escape, quote},
    naming::to_upper_snake_case,
    template::RenderContext,
};

/// Nesting level of the `authData`/`inputData` slots in the test templates.
const TEST_SLOT_DEPTH: usize = 3;

const INPUT_DATA_HINT: &str = "// Pulled from input fields' default values. Edit if necessary.";

/// Auth field keys the generated tests and `.env` expect.
///
/// Declared `fields[].key` win; without any, the keys are inferred from the
/// auth type. A missing section or type gets the OAuth 1 consumer set.
pub fn auth_field_keys(definition: &AppDefinition) -> Vec<String> {
    let declared = definition.declared_auth_field_keys();
    if !declared.is_empty() {
        return declared.into_iter().map(String::from).collect();
    }

    let inferred: &[&str] = match definition.auth_type() {
        Some("basic") => &["username", "password"],
        Some("oauth1") => &["oauth_access_token"],
        Some("oauth2") => &["access_token", "refresh_token"],
        _ => &[
            "oauth_consumer_key",
            "oauth_consumer_secret",
            "oauth_token",
            "oauth_token_secret",
        ],
    };
    inferred.iter().map(|k| k.to_string()).collect()
}

/// `.env` contents: `KEY=YOUR_KEY` per auth key.
pub fn render_environment(definition: &AppDefinition) -> String {
    auth_field_keys(definition)
        .iter()
        .map(|key| {
            let upper = to_upper_snake_case(key);
            format!("{upper}=YOUR_{upper}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `authData` object for test stubs, reading every auth key from the
/// environment.
pub fn render_auth_data(definition: &AppDefinition, depth: usize) -> String {
    let entries: Vec<String> = auth_field_keys(definition)
        .iter()
        .map(|key| {
            format!(
                "{}: process.env.{}",
                Key::name(key.as_str()).emit(),
                to_upper_snake_case(key)
            )
        })
        .collect();
    block(None, &entries, depth)
}

/// `inputData` object for test stubs: every input field with a truthy
/// `default` or `required: true`.
pub fn render_input_data(step: &Value, depth: usize) -> String {
    let entries: Vec<String> = step_input_fields(step)
        .iter()
        .filter_map(|field| {
            let key = field.get("key").and_then(Value::as_str)?;
            let default = field.get("default").filter(|v| is_truthy(v));
            let required = field.get("required").and_then(Value::as_bool) == Some(true);
            if default.is_none() && !required {
                return None;
            }

            let value = match default {
                Some(Value::String(s)) => quote(s),
                Some(other) => Literal::from(other).emit_at(depth + 1),
                None => "null".to_string(),
            };
            Some(format!("{}: {value}", Key::name(key).emit()))
        })
        .collect();

    if entries.is_empty() {
        "{}".to_string()
    } else {
        block(Some(INPUT_DATA_HINT), &entries, depth)
    }
}

/// Slot values for one step's test stub.
pub fn test_context(definition: &AppDefinition, registry_key: &str, step: &Value) -> RenderContext {
    RenderContext::new()
        .with_variable("key", escape(step_key(registry_key, step)))
        .with_variable("authData", render_auth_data(definition, TEST_SLOT_DEPTH))
        .with_variable("inputData", render_input_data(step, TEST_SLOT_DEPTH))
}

/// Render one step's test stub from its category template.
pub fn render_step_test(
    definition: &AppDefinition,
    category: StepCategory,
    registry_key: &str,
    step: &Value,
    template: &str,
) -> Result<String, DomainError> {
    tracing::trace!(%category, key = registry_key, "Rendering step test");
    test_context(definition, registry_key, step).render(template, ArtifactKind::Code)
}

/// Multi-line object literal text whose closing brace sits at `depth`.
fn block(comment: Option<&str>, entries: &[String], depth: usize) -> String {
    let inner = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    if let Some(comment) = comment {
        out.push_str(&inner);
        out.push_str(comment);
        out.push('\n');
    }
    for entry in entries {
        out.push_str(&inner);
        out.push_str(entry);
        out.push_str(",\n");
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
