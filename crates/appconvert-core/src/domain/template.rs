//! Template rendering with `<%= name %>` slots.
//!
//! Templates are static files shipped next to the binary (test stubs). A
//! [`RenderContext`] supplies one string per slot name; the substituted text
//! is then handed to the formatter for the template's [`ArtifactKind`].

use std::collections::HashMap;

use crate::domain::{error::DomainError, format::ArtifactKind};

const OPEN: &str = "<%=";
const CLOSE: &str = "%>";

/// Context for template rendering.
///
/// Immutable after construction; use [`RenderContext::with_variable`] to
/// build one up.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self and returning a new context.
    ///
    /// ```rust,ignore
    /// let ctx = RenderContext::new()
    ///     .with_variable("key", "new_item")
    ///     .with_variable("inputData", "{}");
    /// ```
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Substitute every `<%= name %>` slot in one left-to-right pass.
    ///
    /// Substituted values are never re-scanned, so a value that itself
    /// contains `<%=` is inserted literally.
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if a slot names a variable the context lacks
    /// - `MalformedTemplate` if a slot is never closed or is empty
    pub fn substitute(&self, template: &str) -> Result<String, DomainError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let end = after_open.find(CLOSE).ok_or_else(|| {
                DomainError::MalformedTemplate(format!(
                    "unterminated '{OPEN}' at byte {}",
                    template.len() - rest.len() + start
                ))
            })?;

            let name = after_open[..end].trim();
            if name.is_empty() {
                return Err(DomainError::MalformedTemplate("empty slot".into()));
            }

            let value = self
                .get(name)
                .ok_or_else(|| DomainError::UndefinedVariable {
                    name: name.to_string(),
                })?;
            out.push_str(value);

            rest = &after_open[end + CLOSE.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Substitute, then format the result as `kind`.
    pub fn render(&self, template: &str, kind: ArtifactKind) -> Result<String, DomainError> {
        let text = self.substitute(template)?;
        kind.format(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_slots() {
        let ctx = RenderContext::new()
            .with_variable("key", "new_item")
            .with_variable("inputData", "{}");

        let out = ctx
            .substitute("describe('<%= key %>') <%=key%> <%= inputData %>")
            .unwrap();

        assert_eq!(out, "describe('new_item') new_item {}");
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let ctx = RenderContext::new().with_variable("key", "x");
        assert_eq!(
            ctx.substitute("<%= authData %>"),
            Err(DomainError::UndefinedVariable {
                name: "authData".into()
            })
        );
    }

    #[test]
    fn unterminated_slot_is_an_error() {
        let ctx = RenderContext::new().with_variable("key", "x");
        assert!(matches!(
            ctx.substitute("hello <%= key"),
            Err(DomainError::MalformedTemplate(_))
        ));
    }

    #[test]
    fn values_are_not_rescanned() {
        let ctx = RenderContext::new()
            .with_variable("a", "<%= b %>")
            .with_variable("b", "nope");
        assert_eq!(ctx.substitute("<%= a %>").unwrap(), "<%= b %>");
    }

    #[test]
    fn render_formats_data_templates() {
        let ctx = RenderContext::new().with_variable("name", "demo");
        let out = ctx
            .render(r#"{"name": "<%= name %>"}"#, ArtifactKind::Data)
            .unwrap();
        assert_eq!(out, "{\n  \"name\": \"demo\"\n}\n");
    }

    #[test]
    fn render_formats_code_templates() {
        let ctx = RenderContext::new().with_variable("key", "k");
        let out = ctx
            .render("\n\nconst key = '<%= key %>';   \n", ArtifactKind::Code)
            .unwrap();
        assert_eq!(out, "const key = 'k';\n");
    }
}
