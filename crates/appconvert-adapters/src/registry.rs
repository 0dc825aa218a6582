//! Package registry adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use appconvert_core::application::{ApplicationError, ports::PackageRegistry};

/// Public npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Subset of the registry's version manifest we read.
#[derive(Debug, Deserialize)]
struct VersionManifest {
    version: String,
}

/// Registry lookups over HTTP (`GET <registry>/<package>/latest`).
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApplicationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("appconvert/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                warn!(error = %err, "Failed to build registry HTTP client.");
                ApplicationError::RegistryError {
                    package: String::new(),
                    reason: format!("Failed to build HTTP client: {err}"),
                }
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn latest_url(&self, package: &str) -> String {
        // scoped packages: @scope/name -> @scope%2Fname
        format!("{}/{}/latest", self.base_url, package.replace('/', "%2F"))
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    #[instrument(skip(self))]
    async fn latest_version(&self, package: &str) -> Result<String, ApplicationError> {
        let url = self.latest_url(package);
        debug!(%url, "Fetching latest package version.");

        let failed = |reason: String| ApplicationError::RegistryError {
            package: package.to_string(),
            reason,
        };

        let manifest = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| failed(format!("Failed to fetch {url}: {e}")))?
            .error_for_status()
            .map_err(|e| failed(format!("{url} returned error: {e}")))?
            .json::<VersionManifest>()
            .await
            .map_err(|e| failed(format!("Invalid JSON from {url}: {e}")))?;

        debug!(version = %manifest.version, "Resolved latest version.");
        Ok(manifest.version)
    }
}

/// Fixed answers, for tests and `--offline` runs.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    versions: HashMap<String, String>,
    fallback: Option<String>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, package: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(package.into(), version.into());
        self
    }

    /// Version returned for packages without an explicit entry.
    pub fn with_fallback(mut self, version: impl Into<String>) -> Self {
        self.fallback = Some(version.into());
        self
    }
}

#[async_trait]
impl PackageRegistry for StaticRegistry {
    async fn latest_version(&self, package: &str) -> Result<String, ApplicationError> {
        self.versions
            .get(package)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| ApplicationError::RegistryError {
                package: package.to_string(),
                reason: "no version known offline".into(),
            })
    }
}
