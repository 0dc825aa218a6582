//! Source extraction.
//!
//! Walks a definition fragment depth-first and lowers it into a [`Literal`].
//! Every object carrying a string under [`SOURCE_KEY`] becomes a named
//! function in the [`ExtractionContext`] and a code reference in the tree.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::trace;

use crate::domain::{
    error::DomainError,
    literal::{Key, Literal, ObjectLiteral},
    naming::to_binding_name,
};

/// Reserved key holding embedded code text.
pub const SOURCE_KEY: &str = "source";

/// Sibling key holding the parameter list.
pub const ARGS_KEY: &str = "args";

/// Parameters used when a source-bearing object has no `args`.
pub const DEFAULT_ARGS: [&str; 2] = ["z", "bundle"];

/// Base name used when a source field has no named ancestor at all.
const FALLBACK_BASE_NAME: &str = "handler";

/// A function lifted out of the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
    pub name: String,
    pub args: Vec<String>,
    pub body: String,
}

impl ExtractedFunction {
    /// Declaration text: `const name = async (args) => {\nbody\n};`
    ///
    /// The body is written exactly as found. It may hold template literals
    /// whose whitespace is part of their value.
    pub fn declaration(&self) -> String {
        format!(
            "const {} = async ({}) => {{\n{}\n}};",
            self.name,
            self.args.join(", "),
            self.body
        )
    }
}

/// Function registry for one render call.
///
/// Created fresh by every renderer and dropped with it; names are only
/// unique within one context.
#[derive(Debug, Default)]
pub struct ExtractionContext {
    functions: Vec<ExtractedFunction>,
    reserved: HashSet<String>,
}

impl ExtractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context in which `names` are already taken (import bindings of the
    /// module being rendered).
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            functions: Vec::new(),
            reserved: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Extracted functions in the order they were found.
    pub fn functions(&self) -> &[ExtractedFunction] {
        &self.functions
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn contains(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.functions.iter().any(|f| f.name == name)
    }

    /// Reserve a unique name: `base`, then `base1`, `base2`, ...
    fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Lower `value` into a literal, extracting every embedded function.
    ///
    /// `path` is the location of `value` inside the enclosing definition and
    /// is used both for naming and for error messages.
    pub fn lower(&mut self, value: &Value, path: &[String]) -> Result<Literal, DomainError> {
        let mut path = path.to_vec();
        self.lower_at(value, &mut path)
    }

    fn lower_at(&mut self, value: &Value, path: &mut Vec<String>) -> Result<Literal, DomainError> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(source)) = map.get(SOURCE_KEY) {
                    return self.extract(map, source, path);
                }

                let mut obj = ObjectLiteral::new();
                for (key, child) in map {
                    path.push(key.clone());
                    let lowered = self.lower_at(child, path)?;
                    path.pop();
                    obj.set(Key::name(key.as_str()), lowered);
                }
                Ok(Literal::Object(obj))
            }
            Value::Array(items) => {
                let mut lowered = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    path.push(i.to_string());
                    lowered.push(self.lower_at(item, path)?);
                    path.pop();
                }
                Ok(Literal::Array(lowered))
            }
            scalar => Ok(Literal::from(scalar)),
        }
    }

    fn extract(
        &mut self,
        container: &Map<String, Value>,
        source: &str,
        path: &[String],
    ) -> Result<Literal, DomainError> {
        let args = read_args(container, path)?;

        // Array indices are skipped so that items of `inputFields` are named
        // after the list, not their position.
        let base = path
            .iter()
            .rev()
            .find(|segment| !is_index(segment))
            .map(|segment| to_binding_name(segment))
            .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string());

        let name = self.unique_name(&base);
        trace!(function = %name, path = %path.join("."), "Extracted embedded source");

        self.functions.push(ExtractedFunction {
            name: name.clone(),
            args,
            body: source.to_string(),
        });

        Ok(Literal::code(name))
    }
}

fn read_args(container: &Map<String, Value>, path: &[String]) -> Result<Vec<String>, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidDefinition {
        path: display_path(path, ARGS_KEY),
        reason: reason.to_string(),
    };

    match container.get(ARGS_KEY) {
        None | Some(Value::Null) => Ok(DEFAULT_ARGS.iter().map(|a| a.to_string()).collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("every argument must be a string"))
            })
            .collect(),
        Some(_) => Err(invalid("expected a list of argument names")),
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn display_path(path: &[String], leaf: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(leaf))
        .collect::<Vec<_>>()
        .join(".")
}
