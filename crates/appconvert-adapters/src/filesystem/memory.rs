//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use appconvert_core::application::{ApplicationError, ports::Filesystem};

/// In-memory filesystem.
///
/// Clones share the same storage, so a test can hand one clone to the
/// service and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (and its parent directories).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path.as_ref()))
    }
}

fn insert_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn poisoned(path: &Path) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "memory filesystem lock poisoned".into(),
    }
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    async fn write_text_file(&self, path: &Path, content: &str) -> Result<(), ApplicationError> {
        if content.is_empty() {
            return Err(ApplicationError::ValidationFailed(format!(
                "No data provided for {}",
                path.display()
            )));
        }

        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                });
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn read_text_file(&self, path: &Path) -> Result<String, ApplicationError> {
        let inner = self.inner.read().map_err(|_| poisoned(path))?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            })
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), ApplicationError> {
        let content = self.read_text_file(from).await?;
        self.write_text_file(to, &content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();

        let err = fs
            .write_text_file(Path::new("/out/index.js"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::FilesystemError { .. }));

        fs.ensure_dir(Path::new("/out")).await.unwrap();
        fs.write_text_file(Path::new("/out/index.js"), "x")
            .await
            .unwrap();
        assert_eq!(fs.read_file("/out/index.js").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn ensure_dir_creates_ancestors() {
        let fs = MemoryFilesystem::new();
        fs.ensure_dir(Path::new("/out/test/triggers")).await.unwrap();
        assert!(fs.is_dir("/out"));
        assert!(fs.is_dir("/out/test"));
    }

    #[tokio::test]
    async fn copy_and_missing_files() {
        let fs = MemoryFilesystem::new().with_file("/tpl/gitignore", "node_modules\n");
        fs.ensure_dir(Path::new("/out")).await.unwrap();

        fs.copy_file(Path::new("/tpl/gitignore"), Path::new("/out/.gitignore"))
            .await
            .unwrap();
        assert_eq!(fs.read_file("/out/.gitignore").as_deref(), Some("node_modules\n"));

        let err = fs.read_text_file(Path::new("/tpl/missing")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_writes_are_rejected() {
        let fs = MemoryFilesystem::new();
        fs.ensure_dir(Path::new("/out")).await.unwrap();
        assert!(matches!(
            fs.write_text_file(Path::new("/out/.env"), "").await,
            Err(ApplicationError::ValidationFailed(_))
        ));
    }
}
