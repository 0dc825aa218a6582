//! `package.json` and `.zapierapprc`.

use serde_json::{Map, Value, json};
use tracing::warn;

use super::Platform;
use crate::domain::{
    definition::{AppDefinition, AppInfo},
    error::DomainError,
    format::ArtifactKind,
    naming::to_kebab_case,
};

const FALLBACK_VERSION: &str = "1.0.0";
const TEST_SCRIPT: &str = "mocha --recursive -t 10000";
const NPM_ENGINE: &str = ">=5.6.0";

/// Render `package.json`.
///
/// `legacy_runner_version` is the registry's latest version of the legacy
/// runner; it is only read when the definition has a `legacy` section.
pub fn render_package_json(
    info: &AppInfo,
    definition: &AppDefinition,
    platform: &Platform,
    legacy_runner_version: Option<&str>,
) -> Result<String, DomainError> {
    let name = info
        .title()
        .map(to_kebab_case)
        .filter(|name| !name.is_empty())
        .ok_or(DomainError::MissingRequiredField { field: "title" })?;

    let version = match definition.version() {
        Some(current) => bump_patch(current).unwrap_or_else(|| {
            warn!(
                version = current,
                fallback = FALLBACK_VERSION,
                "Unparseable app version"
            );
            FALLBACK_VERSION.to_string()
        }),
        None => FALLBACK_VERSION.to_string(),
    };

    let mut dependencies = Map::new();
    dependencies.insert(
        platform.core_package.clone(),
        Value::from(definition.platform_version().unwrap_or("latest")),
    );
    if definition.is_legacy() {
        let runner = legacy_runner_version.unwrap_or("latest");
        dependencies.insert(platform.legacy_runner_package.clone(), Value::from(runner));
    }

    let mut zapier = Map::new();
    zapier.insert(
        "convertedByCLIVersion".into(),
        Value::from(platform.converter_version.as_str()),
    );
    if let Some(app_id) = info.legacy_app_id() {
        zapier.insert("convertedFromAppID".into(), app_id.clone());
    }

    let package = json!({
        "name": name,
        "version": version,
        "description": info.description(),
        "main": "index.js",
        "scripts": {
            "test": TEST_SCRIPT,
        },
        "engines": {
            "node": format!(">={}", platform.node_version),
            "npm": NPM_ENGINE,
        },
        "dependencies": dependencies,
        "devDependencies": {
            "mocha": "^5.2.0",
            "should": "^13.2.0",
        },
        "private": true,
        "zapier": zapier,
    });

    to_data(&package)
}

/// Render `.zapierapprc`: the app id, and the legacy script as an extra
/// build input.
pub fn render_app_rc(info: &AppInfo, definition: &AppDefinition) -> Result<String, DomainError> {
    let mut rc = Map::new();
    if let Some(id) = info.id.as_ref().filter(|id| !id.is_null()) {
        rc.insert("id".into(), id.clone());
    }
    if definition.is_legacy() {
        rc.insert("includeInBuild".into(), json!(["scripting.js"]));
    }
    to_data(&Value::Object(rc))
}

fn to_data(value: &Value) -> Result<String, DomainError> {
    let text = serde_json::to_string(value).map_err(|e| DomainError::UnformattableOutput {
        kind: "JSON",
        reason: e.to_string(),
    })?;
    ArtifactKind::Data.format(&text)
}

/// Patch bump of a `MAJOR.MINOR.PATCH` version.
///
/// A prerelease version is released as-is (`1.2.0-beta.1` becomes `1.2.0`),
/// build metadata is dropped. Returns `None` for anything else.
pub fn bump_patch(version: &str) -> Option<String> {
    let version = version.trim().trim_start_matches(['v', '=']);
    let version = version.split('+').next().unwrap_or(version);
    let (core, prerelease) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };

    let parts: Vec<u64> = core
        .split('.')
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;
    let [major, minor, patch] = parts[..] else {
        return None;
    };

    match prerelease {
        Some(pre) if !pre.is_empty() => Some(format!("{major}.{minor}.{patch}")),
        Some(_) => None,
        None => Some(format!("{major}.{minor}.{}", patch.checked_add(1)?)),
    }
}
