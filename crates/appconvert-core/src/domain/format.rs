//! Output formatting, one formatter per artifact kind.
//!
//! Every formatter is deterministic and idempotent: formatting its own
//! output returns it unchanged.

use std::fmt;

use serde_json::Value;

use crate::domain::error::DomainError;

/// What an artifact contains. Decides which formatter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JavaScript source.
    Code,
    /// JSON document.
    Data,
    /// Anything else (`.env`, `.gitignore`, `scripting.js`).
    Plain,
}

impl ArtifactKind {
    pub fn format(self, text: &str) -> Result<String, DomainError> {
        match self {
            Self::Code => Ok(format_code(text)),
            Self::Data => format_data(text),
            Self::Plain => Ok(format_plain(text)),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Code => "code",
            Self::Data => "data",
            Self::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Whitespace normalization for generated JavaScript. Never run over
/// extracted function bodies.
///
/// - CRLF becomes LF
/// - trailing whitespace is stripped from every line
/// - runs of blank lines collapse to one
/// - no leading blank lines, exactly one trailing newline
fn format_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;

    for line in text.replace("\r\n", "\n").lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run = !out.is_empty();
            continue;
        }
        if blank_run {
            out.push('\n');
            blank_run = false;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Canonical JSON: two-space indentation, key order preserved.
fn format_data(text: &str) -> Result<String, DomainError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DomainError::UnformattableOutput {
            kind: "JSON",
            reason: e.to_string(),
        })?;
    let mut pretty =
        serde_json::to_string_pretty(&value).map_err(|e| DomainError::UnformattableOutput {
            kind: "JSON",
            reason: e.to_string(),
        })?;
    pretty.push('\n');
    Ok(pretty)
}

fn format_plain(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_collapses_blank_runs() {
        let text = "\n\nconst a = 1;   \n\n\n\nmodule.exports = a;";
        assert_eq!(
            ArtifactKind::Code.format(text).unwrap(),
            "const a = 1;\n\nmodule.exports = a;\n"
        );
    }

    #[test]
    fn code_formatting_is_idempotent() {
        let once = ArtifactKind::Code
            .format("const x = async () => {\r\n  return 1;  \r\n};\r\n\r\n\r\nx();")
            .unwrap();
        let twice = ArtifactKind::Code.format(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn data_is_pretty_printed_in_order() {
        let out = ArtifactKind::Data.format(r#"{"b":1,"a":[true]}"#).unwrap();
        assert_eq!(out, "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}\n");
        assert_eq!(ArtifactKind::Data.format(&out).unwrap(), out);
    }

    #[test]
    fn data_rejects_invalid_json() {
        assert!(matches!(
            ArtifactKind::Data.format("{nope"),
            Err(DomainError::UnformattableOutput { kind: "JSON", .. })
        ));
    }

    #[test]
    fn plain_ends_with_single_newline() {
        assert_eq!(ArtifactKind::Plain.format("A=1\nB=2").unwrap(), "A=1\nB=2\n");
        assert_eq!(ArtifactKind::Plain.format("A=1\n\n\n").unwrap(), "A=1\n");
    }
}
