//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what a conversion needs from the outside world.
//! The `appconvert-adapters` crate provides implementations.

use async_trait::async_trait;
use std::path::Path;

use crate::application::ApplicationError;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `appconvert_adapters::filesystem::LocalFilesystem` (production)
/// - `appconvert_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Contract
///
/// - Reads of a missing path fail with `FileNotFound`, refused access with
///   `PermissionDenied`, everything else with `FilesystemError`
/// - `write_text_file` overwrites and rejects empty content
/// - Callers create parent directories with `ensure_dir` first
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    async fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError>;

    /// Write text to a file, replacing any previous content.
    async fn write_text_file(&self, path: &Path, content: &str) -> Result<(), ApplicationError>;

    /// Read a file as UTF-8.
    async fn read_text_file(&self, path: &Path) -> Result<String, ApplicationError>;

    /// Copy a single file.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), ApplicationError>;
}

/// Port for package version lookups.
///
/// Implemented by:
/// - `appconvert_adapters::registry::NpmRegistry` (HTTP)
/// - `appconvert_adapters::registry::StaticRegistry` (offline, testing)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Latest published version of `package`.
    async fn latest_version(&self, package: &str) -> Result<String, ApplicationError>;
}
