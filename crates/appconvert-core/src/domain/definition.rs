//! App definition input model.
//!
//! The definition stays an untyped JSON tree: the converter must carry every
//! field it does not understand through to the output unchanged. This module
//! only gives names to the handful of sections the converter acts on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{error::DomainError, naming::to_snake_case};

/// The three step sections of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepCategory {
    Trigger,
    Create,
    Search,
}

impl StepCategory {
    pub const ALL: [Self; 3] = [Self::Trigger, Self::Create, Self::Search];

    /// Definition section and output directory name.
    pub fn section(self) -> &'static str {
        match self {
            Self::Trigger => "triggers",
            Self::Create => "creates",
            Self::Search => "searches",
        }
    }

    /// Suffix of the import binding in `index.js` (`newItemTrigger`).
    pub fn binding_suffix(self) -> &'static str {
        match self {
            Self::Trigger => "Trigger",
            Self::Create => "Create",
            Self::Search => "Search",
        }
    }

    /// Test stub template file name.
    pub fn test_template(self) -> &'static str {
        match self {
            Self::Trigger => "trigger-test.template.js",
            Self::Create => "create-test.template.js",
            Self::Search => "search-test.template.js",
        }
    }
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// Sections that must be JSON objects when present.
const OBJECT_SECTIONS: [&str; 6] = [
    "authentication",
    "triggers",
    "creates",
    "searches",
    "hydrators",
    "legacy",
];

/// Read-only view over an app definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AppDefinition {
    root: Map<String, Value>,
}

impl AppDefinition {
    /// Wrap a parsed definition, checking that the sections the converter
    /// walks have the right shape.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(root) = value else {
            return Err(DomainError::InvalidDefinition {
                path: "<root>".into(),
                reason: "app definition must be a JSON object".into(),
            });
        };

        for section in OBJECT_SECTIONS {
            match root.get(section) {
                None | Some(Value::Null) | Some(Value::Object(_)) => {}
                Some(_) => {
                    return Err(DomainError::InvalidDefinition {
                        path: section.into(),
                        reason: "expected an object".into(),
                    });
                }
            }
        }

        Ok(Self { root })
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| DomainError::MalformedDefinition(e.to_string()))?;
        Self::from_value(value)
    }

    /// Top-level fields in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.root.get(field)
    }

    /// One step by its registry key.
    pub fn step(&self, category: StepCategory, key: &str) -> Option<&Value> {
        self.object(category.section()).and_then(|m| m.get(key))
    }

    fn object(&self, section: &str) -> Option<&Map<String, Value>> {
        self.root.get(section).and_then(Value::as_object)
    }

    fn non_empty_object(&self, section: &str) -> Option<&Map<String, Value>> {
        self.object(section).filter(|m| !m.is_empty())
    }

    pub fn version(&self) -> Option<&str> {
        self.root.get("version").and_then(Value::as_str)
    }

    pub fn platform_version(&self) -> Option<&str> {
        self.root.get("platformVersion").and_then(Value::as_str)
    }

    /// The authentication block, when it has any content.
    pub fn authentication(&self) -> Option<&Map<String, Value>> {
        self.non_empty_object("authentication")
    }

    pub fn auth_type(&self) -> Option<&str> {
        self.authentication()
            .and_then(|auth| auth.get("type"))
            .and_then(Value::as_str)
    }

    /// Keys of explicitly declared auth fields, in declaration order.
    pub fn declared_auth_field_keys(&self) -> Vec<&str> {
        self.authentication()
            .and_then(|auth| auth.get("fields"))
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.get("key").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Steps of one category, in definition order.
    pub fn steps(&self, category: StepCategory) -> impl Iterator<Item = (&str, &Value)> {
        self.object(category.section())
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn step_count(&self) -> usize {
        StepCategory::ALL
            .iter()
            .map(|c| self.steps(*c).count())
            .sum()
    }

    pub fn hydrators(&self) -> Option<&Map<String, Value>> {
        self.non_empty_object("hydrators")
    }

    /// `true` when a `legacy` section is present at all.
    pub fn is_legacy(&self) -> bool {
        self.object("legacy").is_some()
    }

    /// Legacy scripting source, when non-empty.
    pub fn scripting_source(&self) -> Option<&str> {
        self.object("legacy")
            .and_then(|legacy| legacy.get("scriptingSource"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Input fields of a step: top-level `inputFields`, else
/// `operation.inputFields`.
pub fn step_input_fields(step: &Value) -> &[Value] {
    step.get("inputFields")
        .or_else(|| step.get("operation").and_then(|op| op.get("inputFields")))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// File stem for a step's module and test file (`new_item` for `newItem`).
pub fn step_file_stem(registry_key: &str) -> String {
    let stem = to_snake_case(registry_key);
    if stem.is_empty() { "step".to_string() } else { stem }
}

/// The step's self-declared key, falling back to its registry key.
pub fn step_key<'a>(registry_key: &'a str, step: &'a Value) -> &'a str {
    step.get("key")
        .and_then(Value::as_str)
        .unwrap_or(registry_key)
}

/// Metadata about the app being converted (from the platform, not from the
/// definition itself).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralInfo>,
}

/// Legacy-style `general` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<Value>,
}

impl AppInfo {
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::InvalidDefinition {
            path: "<app info>".into(),
            reason: e.to_string(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or_else(|| self.general.as_ref().and_then(|g| g.title.as_deref()))
            .filter(|t| !t.trim().is_empty())
    }

    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .or_else(|| {
                self.general
                    .as_ref()
                    .and_then(|g| g.description.as_deref())
            })
            .unwrap_or("")
    }

    pub fn legacy_app_id(&self) -> Option<&Value> {
        self.general
            .as_ref()
            .and_then(|g| g.app_id.as_ref())
            .filter(|v| !v.is_null())
    }
}
