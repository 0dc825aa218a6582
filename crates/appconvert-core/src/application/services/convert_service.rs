//! Convert Service - main application orchestrator.
//!
//! Turns one app definition into a project directory:
//! 1. Plan the jobs (one per output file)
//! 2. Spawn every job on the runtime
//! 3. Each job renders its file and writes it through the `Filesystem` port
//!
//! Jobs share the definition read-only. The run fails with the first failing
//! job; jobs already in flight are left to finish.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, PackageRegistry},
    },
    domain::{
        AppDefinition, AppInfo, DomainError, Job, Platform, RelativePath, RenderedArtifact,
        StepCategory, plan, render,
    },
    error::{ConvertError, ConvertResult},
};

/// Template copied to `.gitignore`.
pub const GITIGNORE_TEMPLATE: &str = "gitignore";

/// Settings for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub platform: Platform,
    /// Directory holding the test stub templates and `gitignore`.
    pub templates_dir: PathBuf,
}

impl ConvertOptions {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform: Platform::default(),
            templates_dir: templates_dir.into(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// Everything a job reads. Shared by all jobs of one run.
struct Conversion {
    info: AppInfo,
    definition: AppDefinition,
    out_dir: PathBuf,
}

/// What a job produces.
enum Output {
    Rendered(RenderedArtifact),
    Copied { from: PathBuf, path: RelativePath },
}

/// Main conversion service.
///
/// Cheap to clone; every spawned job holds its own handle.
#[derive(Clone)]
pub struct ConvertService {
    filesystem: Arc<dyn Filesystem>,
    registry: Arc<dyn PackageRegistry>,
    options: Arc<ConvertOptions>,
}

impl ConvertService {
    /// Create a new convert service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = ConvertService::new(
    ///     Arc::new(LocalFilesystem::new()),
    ///     Arc::new(NpmRegistry::new(DEFAULT_REGISTRY_URL)?),
    ///     ConvertOptions::new(resolve_template_dir()?),
    /// );
    /// ```
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        registry: Arc<dyn PackageRegistry>,
        options: ConvertOptions,
    ) -> Self {
        Self {
            filesystem,
            registry,
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Paths a conversion of `definition` would write, relative to the
    /// output directory.
    pub fn planned_paths(&self, definition: &AppDefinition) -> ConvertResult<Vec<RelativePath>> {
        plan(definition)?
            .iter()
            .map(|job| job.relative_path().map_err(ConvertError::from))
            .collect()
    }

    /// Convert `definition` into a project under `out_dir`.
    ///
    /// Returns the written paths in plan order.
    #[instrument(
        skip_all,
        fields(
            out_dir = %out_dir.display(),
            steps = definition.step_count()
        )
    )]
    pub async fn convert(
        &self,
        info: AppInfo,
        definition: AppDefinition,
        out_dir: &Path,
    ) -> ConvertResult<Vec<PathBuf>> {
        // Fail before anything is written rather than on package.json.
        if info.title().is_none() {
            return Err(DomainError::MissingRequiredField { field: "title" }.into());
        }

        let jobs = plan(&definition)?;
        info!(jobs = jobs.len(), "Converting app definition");

        let conversion = Arc::new(Conversion {
            info,
            definition,
            out_dir: out_dir.to_path_buf(),
        });

        let tasks = jobs.into_iter().map(|job| {
            let service = self.clone();
            let conversion = Arc::clone(&conversion);
            let handle = tokio::spawn(async move { service.run(&conversion, job).await });
            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(ApplicationError::TaskFailed {
                        reason: e.to_string(),
                    }
                    .into()),
                }
            }
        });

        let written = try_join_all(tasks).await?;
        info!(files = written.len(), "Conversion completed successfully");
        Ok(written)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    async fn run(&self, conversion: &Conversion, job: Job) -> ConvertResult<PathBuf> {
        debug!(%job, "Starting job");

        let written = match self.produce(conversion, job).await? {
            Output::Rendered(artifact) => {
                let target = artifact.path.under(&conversion.out_dir);
                self.ensure_parent(&target).await?;
                self.filesystem
                    .write_text_file(&target, &artifact.content)
                    .await?;
                info!("Writing {}", artifact.path);
                target
            }
            Output::Copied { from, path } => {
                let target = path.under(&conversion.out_dir);
                self.ensure_parent(&target).await?;
                self.filesystem.copy_file(&from, &target).await?;
                info!("Writing {}", path);
                target
            }
        };

        Ok(written)
    }

    async fn ensure_parent(&self, target: &Path) -> ConvertResult<()> {
        if let Some(parent) = target.parent() {
            self.filesystem.ensure_dir(parent).await?;
        }
        Ok(())
    }

    async fn produce(&self, conversion: &Conversion, job: Job) -> ConvertResult<Output> {
        let definition = &conversion.definition;
        let platform = &self.options.platform;
        let path = job.relative_path()?;
        let kind = job.kind();

        let content = match &job {
            Job::Step { category, key } => {
                let step = self.step(definition, *category, key)?;
                render::render_slice(step, &[category.section().to_string(), key.clone()])?
            }
            Job::StepTest { category, key } => {
                let step = self.step(definition, *category, key)?;
                let template = self
                    .filesystem
                    .read_text_file(&self.options.templates_dir.join(category.test_template()))
                    .await?;
                render::render_step_test(definition, *category, key, step, &template)?
            }
            Job::Authentication => self.section(definition, "authentication")?,
            Job::Hydrators => self.section(definition, "hydrators")?,
            // Written byte for byte; index.js loads it as a string.
            Job::Scripting => definition.scripting_source().unwrap_or_default().to_string(),
            Job::PackageJson => {
                let runner = if definition.is_legacy() {
                    Some(
                        self.registry
                            .latest_version(&platform.legacy_runner_package)
                            .await?,
                    )
                } else {
                    None
                };
                render::render_package_json(
                    &conversion.info,
                    definition,
                    platform,
                    runner.as_deref(),
                )?
            }
            Job::Index => render::render_index(definition, platform)?,
            Job::Environment => kind.format(&render::render_environment(definition))?,
            Job::AppRc => render::render_app_rc(&conversion.info, definition)?,
            Job::GitIgnore => {
                return Ok(Output::Copied {
                    from: self.options.templates_dir.join(GITIGNORE_TEMPLATE),
                    path,
                });
            }
        };

        Ok(Output::Rendered(RenderedArtifact {
            path,
            content,
            kind,
        }))
    }

    fn step<'a>(
        &self,
        definition: &'a AppDefinition,
        category: StepCategory,
        key: &str,
    ) -> ConvertResult<&'a Value> {
        definition
            .step(category, key)
            .ok_or_else(|| ConvertError::Internal {
                message: format!("planned step '{category}.{key}' is missing"),
            })
    }

    fn section(&self, definition: &AppDefinition, name: &str) -> ConvertResult<String> {
        let fragment = definition.get(name).ok_or_else(|| ConvertError::Internal {
            message: format!("planned section '{name}' is missing"),
        })?;
        Ok(render::render_slice(fragment, &[name.to_string()])?)
    }
}

impl std::fmt::Debug for ConvertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockPackageRegistry};
    use serde_json::json;
    use std::sync::Mutex;

    const TEMPLATE: &str = "describe('<%= key %>', () => {\n  const bundle = {\n    authData: <%= authData %>,\n    inputData: <%= inputData %>,\n  };\n});\n";

    fn info() -> AppInfo {
        AppInfo::default().with_title("Demo App")
    }

    /// Filesystem mock that records writes and copies.
    fn recording_fs(log: Arc<Mutex<Vec<PathBuf>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_ensure_dir().returning(|_| Ok(()));
        fs.expect_read_text_file()
            .returning(|_| Ok(TEMPLATE.to_string()));
        let writes = Arc::clone(&log);
        fs.expect_write_text_file().returning(move |path, _| {
            writes.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });
        fs.expect_copy_file().returning(move |_, to| {
            log.lock().unwrap().push(to.to_path_buf());
            Ok(())
        });
        fs
    }

    fn service(fs: MockFilesystem, registry: MockPackageRegistry) -> ConvertService {
        ConvertService::new(
            Arc::new(fs),
            Arc::new(registry),
            ConvertOptions::new("/templates"),
        )
    }

    #[tokio::test]
    async fn writes_every_planned_file() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = MockPackageRegistry::new();
        registry.expect_latest_version().never();
        let svc = service(recording_fs(Arc::clone(&log)), registry);

        let definition = AppDefinition::from_value(json!({
            "platformVersion": "15.0.0",
            "authentication": {"type": "basic"},
            "triggers": {"new_item": {"key": "new_item", "operation": {"perform": {"source": "return [];"}}}}
        }))
        .unwrap();

        let written = svc
            .convert(info(), definition, Path::new("/out"))
            .await
            .unwrap();

        let expected: Vec<PathBuf> = [
            "triggers/new_item.js",
            "test/triggers/new_item.js",
            "authentication.js",
            "package.json",
            "index.js",
            ".env",
            ".gitignore",
            ".zapierapprc",
        ]
        .iter()
        .map(|p| Path::new("/out").join(p))
        .collect();

        assert_eq!(written, expected);
        let mut logged = log.lock().unwrap().clone();
        logged.sort();
        let mut sorted = expected.clone();
        sorted.sort();
        assert_eq!(logged, sorted);
    }

    #[tokio::test]
    async fn legacy_apps_ask_the_registry_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = MockPackageRegistry::new();
        registry
            .expect_latest_version()
            .withf(|package| package == "zapier-platform-legacy-scripting-runner")
            .times(1)
            .returning(|_| Ok("3.8.1".into()));
        let svc = service(recording_fs(Arc::clone(&log)), registry);

        let definition = AppDefinition::from_value(json!({
            "legacy": {"scriptingSource": "var Zap = {};"}
        }))
        .unwrap();

        let written = svc
            .convert(info(), definition, Path::new("/out"))
            .await
            .unwrap();

        assert!(written.contains(&PathBuf::from("/out/scripting.js")));
    }

    #[tokio::test]
    async fn scripting_source_is_copied_exactly() {
        let source = "var Zap = {\r\n  msg: 'a  \n\n\n b'   \r\n};\n\n\n";
        let contents = Arc::new(Mutex::new(Vec::new()));

        let mut fs = MockFilesystem::new();
        fs.expect_ensure_dir().returning(|_| Ok(()));
        fs.expect_read_text_file()
            .returning(|_| Ok(TEMPLATE.to_string()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        let seen = Arc::clone(&contents);
        fs.expect_write_text_file().returning(move |path, content| {
            seen.lock()
                .unwrap()
                .push((path.to_path_buf(), content.to_string()));
            Ok(())
        });
        let mut registry = MockPackageRegistry::new();
        registry
            .expect_latest_version()
            .returning(|_| Ok("3.8.1".into()));

        let definition = AppDefinition::from_value(json!({
            "legacy": {"scriptingSource": source}
        }))
        .unwrap();
        service(fs, registry)
            .convert(info(), definition, Path::new("/out"))
            .await
            .unwrap();

        let contents = contents.lock().unwrap();
        let (_, written) = contents
            .iter()
            .find(|(path, _)| path == Path::new("/out/scripting.js"))
            .unwrap();
        assert_eq!(written, source);
    }

    #[tokio::test]
    async fn first_write_failure_fails_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_ensure_dir().returning(|_| Ok(()));
        fs.expect_read_text_file()
            .returning(|_| Ok(TEMPLATE.to_string()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        fs.expect_write_text_file().returning(|path, _| {
            if path.ends_with("index.js") {
                Err(ApplicationError::PermissionDenied {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(())
            }
        });
        let svc = service(fs, MockPackageRegistry::new());

        let err = svc
            .convert(info(), AppDefinition::from_value(json!({})).unwrap(), Path::new("/out"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Application(ApplicationError::PermissionDenied { ref path })
                if path == Path::new("/out/index.js")
        ));
    }

    #[tokio::test]
    async fn missing_title_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_text_file().never();
        fs.expect_copy_file().never();
        let svc = service(fs, MockPackageRegistry::new());

        let err = svc
            .convert(
                AppInfo::default(),
                AppDefinition::from_value(json!({})).unwrap(),
                Path::new("/out"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.category(), crate::error::ErrorCategory::Validation);
    }

    #[tokio::test]
    async fn missing_template_is_not_found() {
        let mut fs = MockFilesystem::new();
        fs.expect_ensure_dir().returning(|_| Ok(()));
        fs.expect_write_text_file().returning(|_, _| Ok(()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        fs.expect_read_text_file().returning(|path| {
            Err(ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            })
        });
        let svc = service(fs, MockPackageRegistry::new());

        let definition = AppDefinition::from_value(json!({"searches": {"find": {"key": "find"}}})).unwrap();
        let err = svc
            .convert(info(), definition, Path::new("/out"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), crate::error::ErrorCategory::NotFound);
    }

    #[test]
    fn planned_paths_for_dry_runs() {
        let svc = service(MockFilesystem::new(), MockPackageRegistry::new());
        let definition = AppDefinition::from_value(json!({"creates": {"addItem": {}}})).unwrap();

        let paths: Vec<String> = svc
            .planned_paths(&definition)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(paths[..2], ["creates/add_item.js", "test/creates/add_item.js"]);
    }
}
