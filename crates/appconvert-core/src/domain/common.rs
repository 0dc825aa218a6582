use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path inside the generated project, guaranteed to be relative.
///
/// Invariant: never absolute and never climbs out with `..`. Enforced at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        check_relative(&path)?;
        Ok(Self(path))
    }

    /// Join a segment, maintaining relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        check_relative(segment)?;
        Ok(Self(self.0.join(segment)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve against an output root.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

fn check_relative(path: &Path) -> Result<(), DomainError> {
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if path.is_absolute() || escapes {
        return Err(DomainError::PathOutsideProject {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Always forward slashes; these paths also end up in log lines and
        // dry-run listings.
        let parts: Vec<_> = self
            .0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        write!(f, "{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_absolute() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_parent_dir() {
        assert!(RelativePath::try_new("../outside.js").is_err());
        assert!(RelativePath::try_new("triggers/../../x.js").is_err());
        let p = RelativePath::try_new("test").unwrap();
        assert!(p.join("..").is_err());
    }

    #[test]
    fn join_keeps_relative() {
        let p = RelativePath::try_new("test").unwrap();
        let joined = p.join("triggers").unwrap().join("new_item.js").unwrap();
        assert_eq!(joined.to_string(), "test/triggers/new_item.js");
    }

    #[test]
    fn join_rejects_absolute_segment() {
        let p = RelativePath::try_new("test").unwrap();
        assert!(p.join("/abs").is_err());
    }

    #[test]
    fn under_resolves_against_root() {
        let p = RelativePath::try_new("index.js").unwrap();
        assert_eq!(p.under(Path::new("out")), PathBuf::from("out/index.js"));
    }
}
