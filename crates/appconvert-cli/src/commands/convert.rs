//! Implementation of the `appconvert convert` command.
//!
//! Responsibility: read the input files, wire the adapters into a
//! `ConvertService`, and display results. No conversion logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use appconvert_adapters::{
    CopyOptions, LocalFilesystem, NpmRegistry, StaticRegistry, expand_home, resolve_template_dir,
};
use appconvert_core::{
    application::{ConvertOptions, ConvertService, PackageRegistry},
    domain::{AppDefinition, AppInfo},
    error::ConvertError,
};

use crate::{
    cli::ConvertArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `appconvert convert` command.
///
/// 1. Read the definition and the optional info file
/// 2. Settle the app title
/// 3. Refuse a non-empty output directory unless `--force`
/// 4. Early-exit with the planned file list if `--dry-run`
/// 5. Run the conversion, copy `--include` files, print next steps
#[instrument(skip_all, fields(definition = %args.definition.display(), dir = %args.dir.display()))]
pub async fn execute(args: ConvertArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let dir = expand_home(&args.dir);

    // 1. Inputs
    let definition = AppDefinition::from_json(&read_input(&args.definition).await?)
        .map_err(ConvertError::from)?;
    let info = match &args.info {
        Some(path) => AppInfo::from_json(&read_input(path).await?).map_err(ConvertError::from)?,
        None => AppInfo::default(),
    };

    // 2. Title: flag, then info file, then directory name
    let info = resolve_title(info, args.title.as_deref(), &dir);
    debug!(title = info.title().unwrap_or_default(), "Title resolved");

    if let Some(include) = args.include.as_ref().filter(|p| !p.is_dir()) {
        return Err(CliError::InvalidInput {
            message: format!("--include {} is not a directory", include.display()),
            source: None,
        });
    }

    // 3. Output directory
    let occupied = !is_empty_dir(&dir).await?;

    let registry = build_registry(args.offline, &config)?;
    let templates = match args.templates.as_ref().or(config.templates.dir.as_ref()) {
        Some(dir) => expand_home(dir),
        None if args.dry_run => PathBuf::new(),
        None => resolve_template_dir().map_err(ConvertError::from)?,
    };
    let filesystem = LocalFilesystem::new();
    let service = ConvertService::new(
        Arc::new(filesystem),
        registry,
        ConvertOptions::new(templates).with_platform(config.platform()),
    );

    // 4. Dry run: describe but do not write
    if args.dry_run {
        if occupied {
            output.warning(&format!(
                "{} is not empty; a real run needs --force",
                dir.display()
            ))?;
        }
        let planned: Vec<PathBuf> = service
            .planned_paths(&definition)
            .with_cli_context(|| "planning")?
            .iter()
            .map(|p| p.under(&dir))
            .collect();
        output.info(&format!(
            "Dry run: would write {} files into {}",
            planned.len(),
            dir.display()
        ))?;
        output.paths(&dir, &planned)?;
        return Ok(());
    }

    if occupied && !args.force {
        return Err(CliError::DirectoryNotEmpty { path: dir });
    }

    // 5. Convert
    output.header(&format!(
        "Converting '{}'...",
        info.title().unwrap_or_default()
    ))?;
    info!(steps = definition.step_count(), dir = %dir.display(), "Conversion started");

    let spinner = output.spinner("Writing files");
    let result = service.convert(info, definition, &dir).await;
    spinner.finish_and_clear();
    let written = result?;

    info!(files = written.len(), "Conversion completed");

    output.success(&format!(
        "Wrote {} files into {}",
        written.len(),
        dir.display()
    ))?;
    output.paths(&dir, &written)?;

    if let Some(include) = &args.include {
        let copied = filesystem
            .copy_dir(include, &dir, CopyOptions { clobber: false })
            .await
            .map_err(ConvertError::from)?;
        debug!(files = copied.len(), from = %include.display(), "Included files copied");
        output.success(&format!(
            "Copied {} files from {}",
            copied.len(),
            include.display()
        ))?;
        output.paths(&dir, &copied)?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", dir.display()))?;
    output.print("  npm install")?;
    output.print("  # fill in .env, then")?;
    output.print("  npm test")?;

    Ok(())
}

/// Read a UTF-8 input file named on the command line.
async fn read_input(path: &Path) -> CliResult<String> {
    let path = expand_home(path);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::InputNotFound { path })
        }
        Err(e) => Err(e).with_cli_context(|| format!("Failed to read {}", path.display())),
    }
}

/// `--title` wins; otherwise keep the info file's title, else fall back to
/// the output directory's name.
fn resolve_title(info: AppInfo, flag: Option<&str>, dir: &Path) -> AppInfo {
    if let Some(title) = flag {
        return info.with_title(title);
    }
    if info.title().is_some() {
        return info;
    }
    match dir_name(dir) {
        Some(name) => info.with_title(name),
        None => info,
    }
}

fn dir_name(dir: &Path) -> Option<String> {
    let absolute = std::path::absolute(dir).ok()?;
    absolute
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// `true` if `dir` is missing or has no entries.
async fn is_empty_dir(dir: &Path) -> CliResult<bool> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => {
            return Err(e).with_cli_context(|| format!("Failed to read {}", dir.display()));
        }
    };
    let first = entries
        .next_entry()
        .await
        .with_cli_context(|| format!("Failed to read {}", dir.display()))?;
    Ok(first.is_none())
}

fn build_registry(offline: bool, config: &AppConfig) -> CliResult<Arc<dyn PackageRegistry>> {
    if offline {
        debug!(
            fallback = %config.platform.legacy_runner_fallback,
            "Offline: registry lookups use the fallback version"
        );
        return Ok(Arc::new(
            StaticRegistry::new().with_fallback(config.platform.legacy_runner_fallback.clone()),
        ));
    }
    let registry = NpmRegistry::new(config.registry.url.clone()).map_err(ConvertError::from)?;
    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn title_flag_wins() {
        let info = AppInfo::default().with_title("From Info");
        let info = resolve_title(info, Some("From Flag"), Path::new("/tmp/dir-name"));
        assert_eq!(info.title(), Some("From Flag"));
    }

    #[test]
    fn info_title_is_kept() {
        let info = resolve_title(
            AppInfo::default().with_title("From Info"),
            None,
            Path::new("/tmp/dir-name"),
        );
        assert_eq!(info.title(), Some("From Info"));
    }

    #[test]
    fn directory_name_is_the_last_resort() {
        let info = resolve_title(AppInfo::default(), None, Path::new("/tmp/recipe-book"));
        assert_eq!(info.title(), Some("recipe-book"));
    }

    #[tokio::test]
    async fn emptiness_check() {
        let dir = TempDir::new().unwrap();
        assert!(is_empty_dir(&dir.path().join("missing")).await.unwrap());
        assert!(is_empty_dir(dir.path()).await.unwrap());

        std::fs::write(dir.path().join("index.js"), "x").unwrap();
        assert!(!is_empty_dir(dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_input_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_input(&dir.path().join("definition.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InputNotFound { .. }));
    }
}
