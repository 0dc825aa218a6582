//! Bundled template discovery.
//!
//! The converter reads its test stub templates and the `.gitignore` source
//! from a directory on disk. [`resolve_template_dir`] finds that directory.
//!
//! # Template resolution order
//!
//! The first candidate that exists and contains every required file wins:
//!
//! 1. **`$APPCONVERT_TEMPLATES_DIR`**: environment variable override.
//! 2. **`./templates/convert`**: relative to the current working directory.
//! 3. **`<executable-dir>/templates/convert`**: sibling to the binary.
//! 4. **`<workspace>/templates/convert`**: the copy in this repository,
//!    for `cargo run` and tests.
//!
//! # Environment variable
//!
//! ```env
//! APPCONVERT_TEMPLATES_DIR=./templates/convert
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use appconvert_core::application::{ApplicationError, services::convert_service::GITIGNORE_TEMPLATE};
use appconvert_core::domain::StepCategory;

pub const TEMPLATES_DIR_ENV: &str = "APPCONVERT_TEMPLATES_DIR";

/// Files a template directory must contain.
pub fn required_files() -> Vec<&'static str> {
    StepCategory::ALL
        .iter()
        .map(|c| c.test_template())
        .chain(std::iter::once(GITIGNORE_TEMPLATE))
        .collect()
}

/// Find the template directory using the order described in the module docs.
///
/// # Errors
///
/// `FileNotFound` naming the first candidate when none qualifies.
#[instrument]
pub fn resolve_template_dir() -> Result<PathBuf, ApplicationError> {
    let candidates = candidate_paths();

    for candidate in &candidates {
        debug!(path = %candidate.display(), "checking candidate templates path");
        if is_complete(candidate) {
            info!(path = %candidate.display(), "using templates");
            return Ok(candidate.clone());
        }
    }

    warn!(
        "no templates directory found; checked ${TEMPLATES_DIR_ENV}, \
         ./templates/convert, <exe>/templates/convert, and the bundled copy"
    );
    Err(ApplicationError::FileNotFound {
        path: candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from("templates/convert")),
    })
}

/// `true` if `dir` holds every required template file.
pub fn is_complete(dir: &Path) -> bool {
    required_files()
        .iter()
        .all(|name| dir.join(name).is_file())
}

/// Build the ordered list of candidate paths to probe.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        paths.push(PathBuf::from(env_dir));
    }

    paths.push(PathBuf::from("templates/convert"));

    if let Some(exe_sibling) = exe_sibling_templates() {
        paths.push(exe_sibling);
    }

    paths.push(bundled_templates());

    paths
}

fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates/convert")))
}

/// `templates/convert` at the workspace root.
pub fn bundled_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/convert")
}
