//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`Platform`] and the
//! paths derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `APPCONVERT__<SECTION>__<KEY>` environment variables
//! 3. Config file (`--config`, else the per-user config path)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use appconvert_adapters::DEFAULT_REGISTRY_URL;
use appconvert_core::domain::Platform;

/// Prefix for environment overrides, e.g. `APPCONVERT__REGISTRY__URL`.
pub const ENV_PREFIX: &str = "APPCONVERT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub platform: PlatformConfig,
    pub registry: RegistryConfig,
    pub templates: TemplateConfig,
    pub output: OutputConfig,
}

/// Packages the generated project depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub core_package: String,
    pub legacy_runner_package: String,
    pub node_version: String,
    /// Runner version used by `convert --offline` for legacy apps.
    pub legacy_runner_fallback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Overrides template discovery when set.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        let platform = Platform::default();
        Self {
            core_package: platform.core_package,
            legacy_runner_package: platform.legacy_runner_package,
            node_version: platform.node_version,
            legacy_runner_fallback: "latest".into(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file, then the
    /// environment.
    ///
    /// A file named with `--config` must exist; the default path is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        tracing::debug!(path = %path.display(), required, "Loading configuration");

        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to encode default configuration")?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.appconvert.toml`
    /// in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "appconvert", "appconvert")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".appconvert.toml"))
    }

    /// Platform settings for the core service.
    pub fn platform(&self) -> Platform {
        Platform {
            core_package: self.platform.core_package.clone(),
            legacy_runner_package: self.platform.legacy_runner_package.clone(),
            node_version: self.platform.node_version.clone(),
            ..Platform::default()
        }
    }

    /// Look up a dotted key, e.g. `registry.url`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "platform.core_package" => self.platform.core_package.clone(),
            "platform.legacy_runner_package" => self.platform.legacy_runner_package.clone(),
            "platform.node_version" => self.platform.node_version.clone(),
            "platform.legacy_runner_fallback" => self.platform.legacy_runner_fallback.clone(),
            "registry.url" => self.registry.url.clone(),
            "templates.dir" => self
                .templates
                .dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_platform() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.platform.core_package, "zapier-platform-core");
        assert_eq!(cfg.registry.url, DEFAULT_REGISTRY_URL);
        assert_eq!(cfg.platform(), Platform::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[registry]\nurl = \"http://localhost:4873\"\n\n[platform]\nnode_version = \"20\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.registry.url, "http://localhost:4873");
        assert_eq!(cfg.platform.node_version, "20");
        assert_eq!(cfg.platform.core_package, "zapier-platform-core");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn default_config_survives_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("templates.dir").as_deref(), Some(""));
        assert!(cfg.get("does.not.exist").is_none());
    }
}
