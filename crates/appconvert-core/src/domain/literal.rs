//! Intermediate literal tree and its JavaScript emitter.
//!
//! A definition fragment is lowered into a [`Literal`] before it is written
//! out. Data nodes keep their JSON meaning; [`Literal::Code`] nodes carry a
//! [`Placeholder`], a piece of raw expression text (a function name, a
//! `require(...)` call) that the emitter splices in without quoting.
//!
//! Because code references are a distinct node type rather than a specially
//! prefixed string, no user string can ever be mistaken for one.

use serde_json::{Number, Value};

use crate::domain::naming::is_identifier_name;

/// Raw expression text to be emitted unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder(String);

impl Placeholder {
    /// Wrap an expression so the serializer emits it verbatim.
    ///
    /// The text is not validated; producing well-formed code is the caller's
    /// job.
    pub fn wrap(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn expression(&self) -> &str {
        &self.0
    }
}

/// Object property key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Plain property name, quoted only when it is not an identifier.
    Name(String),
    /// Computed key: `[expression]`.
    Computed(Placeholder),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn computed(expression: impl Into<String>) -> Self {
        Self::Computed(Placeholder::wrap(expression))
    }
}

/// One node of the literal tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Literal>),
    Object(ObjectLiteral),
    Code(Placeholder),
}

impl Literal {
    pub fn code(expression: impl Into<String>) -> Self {
        Self::Code(Placeholder::wrap(expression))
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectLiteral> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<&Value> for Literal {
    /// Plain data conversion. Embedded `source` fields are *not* extracted
    /// here; that is the extractor's job.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(ObjectLiteral {
                entries: map
                    .iter()
                    .map(|(k, v)| (Key::name(k.as_str()), Self::from(v)))
                    .collect(),
            }),
        }
    }
}

/// Ordered object literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLiteral {
    entries: Vec<(Key, Literal)>,
}

impl ObjectLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing entry in place or appending.
    pub fn set(&mut self, key: Key, value: Literal) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.entries.iter().find_map(|(k, v)| match k {
            Key::Name(n) if n == name => Some(v),
            _ => None,
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Literal> {
        self.entries.iter_mut().find_map(|(k, v)| match k {
            Key::Name(n) if n == name => Some(v),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, Literal)> {
        self.entries.iter()
    }
}

impl FromIterator<(Key, Literal)> for ObjectLiteral {
    fn from_iter<I: IntoIterator<Item = (Key, Literal)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Emission
// =============================================================================

const INDENT: &str = "  ";

/// Trait for emitting JavaScript source from literal nodes.
pub trait Emit {
    /// Render the node as JavaScript source.
    fn emit(&self) -> String;
}

impl Emit for Literal {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl Literal {
    /// Emit as if the literal started at nesting level `depth`; nested lines
    /// are indented relative to it.
    pub fn emit_at(&self, depth: usize) -> String {
        let mut out = String::new();
        write_literal(self, depth, &mut out);
        out
    }
}

impl Emit for Key {
    fn emit(&self) -> String {
        match self {
            Key::Name(name) if is_identifier_name(name) => name.clone(),
            Key::Name(name) => quote(name),
            Key::Computed(expr) => format!("[{}]", expr.expression()),
        }
    }
}

fn write_literal(literal: &Literal, depth: usize, out: &mut String) {
    match literal {
        Literal::Null => out.push_str("null"),
        Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::Number(n) => out.push_str(&n.to_string()),
        Literal::String(s) => out.push_str(&quote(s)),
        Literal::Code(placeholder) => out.push_str(placeholder.expression()),
        Literal::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for item in items {
                push_indent(depth + 1, out);
                write_literal(item, depth + 1, out);
                out.push_str(",\n");
            }
            push_indent(depth, out);
            out.push(']');
        }
        Literal::Object(obj) => {
            if obj.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (key, value) in obj.iter() {
                push_indent(depth + 1, out);
                out.push_str(&key.emit());
                out.push_str(": ");
                write_literal(value, depth + 1, out);
                out.push_str(",\n");
            }
            push_indent(depth, out);
            out.push('}');
        }
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Quote a string as a single-quoted JavaScript string literal.
pub fn quote(s: &str) -> String {
    format!("'{}'", escape(s))
}

/// Escape `s` for use between single quotes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
