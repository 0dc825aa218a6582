//! What a conversion writes, before anything is rendered.

use std::collections::HashSet;
use std::fmt;

use crate::domain::{
    common::RelativePath,
    definition::{AppDefinition, StepCategory, step_file_stem},
    error::DomainError,
    format::ArtifactKind,
};

/// One output file of a conversion, and the unit of concurrent work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// `<category>/<stem>.js`
    Step { category: StepCategory, key: String },
    /// `test/<category>/<stem>.js`
    StepTest { category: StepCategory, key: String },
    Authentication,
    Hydrators,
    Scripting,
    PackageJson,
    Index,
    Environment,
    GitIgnore,
    AppRc,
}

impl Job {
    pub fn relative_path(&self) -> Result<RelativePath, DomainError> {
        let path = match self {
            Self::Step { category, key } => {
                format!("{}/{}.js", category.section(), step_file_stem(key))
            }
            Self::StepTest { category, key } => {
                format!("test/{}/{}.js", category.section(), step_file_stem(key))
            }
            Self::Authentication => "authentication.js".into(),
            Self::Hydrators => "hydrators.js".into(),
            Self::Scripting => "scripting.js".into(),
            Self::PackageJson => "package.json".into(),
            Self::Index => "index.js".into(),
            Self::Environment => ".env".into(),
            Self::GitIgnore => ".gitignore".into(),
            Self::AppRc => ".zapierapprc".into(),
        };
        RelativePath::try_new(path)
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Step { .. }
            | Self::StepTest { .. }
            | Self::Authentication
            | Self::Hydrators
            | Self::Index => ArtifactKind::Code,
            Self::PackageJson | Self::AppRc => ArtifactKind::Data,
            // copied verbatim
            Self::Scripting | Self::Environment | Self::GitIgnore => ArtifactKind::Plain,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relative_path() {
            Ok(path) => write!(f, "{path}"),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// A file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub path: RelativePath,
    pub content: String,
    pub kind: ArtifactKind,
}

/// Every job a conversion of `definition` runs, in a stable order: steps
/// with their tests, the optional sections, then the fixed project files.
///
/// # Errors
///
/// `DuplicateOutputPath` when two steps of one category snake_case to the
/// same file name.
pub fn plan(definition: &AppDefinition) -> Result<Vec<Job>, DomainError> {
    let mut jobs = Vec::with_capacity(definition.step_count() * 2 + 8);
    let mut seen = HashSet::new();

    for category in StepCategory::ALL {
        for (key, _) in definition.steps(category) {
            let step = Job::Step {
                category,
                key: key.to_string(),
            };
            let path = step.relative_path()?;
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicateOutputPath {
                    path: path.to_string(),
                });
            }
            jobs.push(step);
            jobs.push(Job::StepTest {
                category,
                key: key.to_string(),
            });
        }
    }

    if definition.authentication().is_some() {
        jobs.push(Job::Authentication);
    }
    if definition.hydrators().is_some() {
        jobs.push(Job::Hydrators);
    }
    if definition.scripting_source().is_some() {
        jobs.push(Job::Scripting);
    }

    jobs.extend([
        Job::PackageJson,
        Job::Index,
        Job::Environment,
        Job::GitIgnore,
        Job::AppRc,
    ]);

    Ok(jobs)
}
