//! Local filesystem adapter using `tokio::fs`.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, trace};
use walkdir::WalkDir;

use appconvert_core::application::{ApplicationError, ports::Filesystem};

/// Production filesystem implementation using `tokio::fs`.
///
/// Paths starting with `~` are resolved against the user's home directory.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }

    /// Recursively copy `from` into `to`.
    ///
    /// `node_modules` directories and `.zip` files are skipped. Existing
    /// destination files are kept unless `options.clobber` is set. Returns the
    /// files actually copied.
    pub async fn copy_dir(
        &self,
        from: &Path,
        to: &Path,
        options: CopyOptions,
    ) -> Result<Vec<PathBuf>, ApplicationError> {
        let from = expand_home(from);
        let to = expand_home(to);

        let root = from.clone();
        let entries = tokio::task::spawn_blocking(move || collect_entries(&root))
            .await
            .map_err(|e| ApplicationError::TaskFailed {
                reason: e.to_string(),
            })??;

        let mut copied = Vec::new();
        for (relative, is_dir) in entries {
            let dest = to.join(&relative);
            if is_dir {
                self.ensure_dir(&dest).await?;
                continue;
            }

            if !options.clobber && tokio::fs::try_exists(&dest).await.unwrap_or(false) {
                debug!(path = %dest.display(), "Skipping existing file");
                continue;
            }

            if let Some(parent) = dest.parent() {
                self.ensure_dir(parent).await?;
            }
            self.copy_file(&from.join(&relative), &dest).await?;
            copied.push(dest);
        }

        Ok(copied)
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`LocalFilesystem::copy_dir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Overwrite files that already exist at the destination.
    pub clobber: bool,
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError> {
        let path = expand_home(path);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| map_io_error(&path, e, "create directory"))
    }

    async fn write_text_file(&self, path: &Path, content: &str) -> Result<(), ApplicationError> {
        let path = expand_home(path);
        if content.is_empty() {
            return Err(ApplicationError::ValidationFailed(format!(
                "No data provided for {}",
                path.display()
            )));
        }
        trace!(path = %path.display(), bytes = content.len(), "write");
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| map_io_error(&path, e, "write file"))
    }

    async fn read_text_file(&self, path: &Path) -> Result<String, ApplicationError> {
        let path = expand_home(path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| map_io_error(&path, e, "read file"))
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), ApplicationError> {
        let from = expand_home(from);
        let to = expand_home(to);
        tokio::fs::copy(&from, &to)
            .await
            .map(|_| ())
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound if !from.exists() => map_io_error(&from, e, "copy file"),
                _ => map_io_error(&to, e, "copy file"),
            })
    }
}

/// Walk `root`, returning `(relative path, is_dir)` for everything to copy.
fn collect_entries(root: &Path) -> Result<Vec<(PathBuf, bool)>, ApplicationError> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e.path()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            match e.into_io_error() {
                Some(io) => map_io_error(&path, io, "read directory"),
                None => ApplicationError::FilesystemError {
                    path,
                    reason: "filesystem loop".into(),
                },
            }
        })?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| ApplicationError::FilesystemError {
                path: entry.path().to_path_buf(),
                reason: e.to_string(),
            })?
            .to_path_buf();
        entries.push((relative, entry.file_type().is_dir()));
    }

    Ok(entries)
}

fn is_skipped(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name == "node_modules" || path.extension().is_some_and(|ext| ext == "zip")
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ApplicationError {
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::FileNotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => ApplicationError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to {}: {}", operation, e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("test/triggers");

        fs.ensure_dir(&nested).await.unwrap();
        fs.write_text_file(&nested.join("a.js"), "module.exports = {};\n")
            .await
            .unwrap();

        assert_eq!(
            fs.read_text_file(&nested.join("a.js")).await.unwrap(),
            "module.exports = {};\n"
        );
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_text_file(&dir.path().join("empty.js"), "")
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationFailed(_)));
        assert!(!dir.path().join("empty.js").exists());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");

        let err = LocalFilesystem::new().read_text_file(&missing).await.unwrap_err();

        assert_eq!(err, ApplicationError::FileNotFound { path: missing });
    }

    #[tokio::test]
    async fn copy_file_reports_missing_source() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("gitignore");

        let err = LocalFilesystem::new()
            .copy_file(&from, &dir.path().join(".gitignore"))
            .await
            .unwrap_err();

        assert_eq!(err, ApplicationError::FileNotFound { path: from });
    }

    #[tokio::test]
    async fn copy_dir_skips_and_respects_clobber() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("lib")).unwrap();
        std::fs::create_dir_all(src.path().join("node_modules/pkg")).unwrap();
        std::fs::write(src.path().join("index.js"), "new").unwrap();
        std::fs::write(src.path().join("lib/util.js"), "util").unwrap();
        std::fs::write(src.path().join("node_modules/pkg/x.js"), "x").unwrap();
        std::fs::write(src.path().join("build.zip"), "zip").unwrap();
        std::fs::write(dst.path().join("index.js"), "old").unwrap();

        let fs = LocalFilesystem::new();
        let copied = fs
            .copy_dir(src.path(), dst.path(), CopyOptions::default())
            .await
            .unwrap();

        assert_eq!(copied, vec![dst.path().join("lib/util.js")]);
        assert_eq!(std::fs::read_to_string(dst.path().join("index.js")).unwrap(), "old");
        assert!(!dst.path().join("node_modules").exists());
        assert!(!dst.path().join("build.zip").exists());

        fs.copy_dir(src.path(), dst.path(), CopyOptions { clobber: true })
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(dst.path().join("index.js")).unwrap(), "new");
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/apps/x")), home.join("apps/x"));
        }
        assert_eq!(expand_home(Path::new("/abs/x")), PathBuf::from("/abs/x"));
        assert_eq!(expand_home(Path::new("rel/~")), PathBuf::from("rel/~"));
    }
}
