//! Renderers: definition fragments in, formatted file text out.
//!
//! Every renderer is a pure function over a borrowed [`AppDefinition`]. It
//! owns its [`ExtractionContext`](crate::domain::extract::ExtractionContext)
//! and never touches the input, so renderers may run side by side.

mod index;
mod package;
mod slice;
mod support;

pub use index::render_index;
pub use package::{bump_patch, render_app_rc, render_package_json};
pub use slice::render_slice;
pub use support::{
    auth_field_keys, render_auth_data, render_environment, render_input_data, render_step_test,
    test_context,
};

use crate::domain::{
    error::DomainError,
    extract::{ExtractedFunction, ExtractionContext},
    format::ArtifactKind,
    literal::{Emit, Literal},
};

/// Platform packages and versions the generated project depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Runtime package every converted app imports.
    pub core_package: String,
    /// Runtime shim for apps carrying legacy scripting.
    pub legacy_runner_package: String,
    /// Minimum Node.js version written to `engines.node`.
    pub node_version: String,
    /// Version recorded as `convertedByCLIVersion`.
    pub converter_version: String,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            core_package: "zapier-platform-core".into(),
            legacy_runner_package: "zapier-platform-legacy-scripting-runner".into(),
            node_version: "18".into(),
            converter_version: crate::VERSION.into(),
        }
    }
}

/// Module text: imports, extracted functions, then the export, one blank
/// line between sections.
///
/// Only the generated sections go through the code formatter. Function
/// declarations are spliced in afterwards so their bodies keep every byte.
fn assemble(
    imports: &[String],
    ctx: &ExtractionContext,
    exported: &Literal,
) -> Result<String, DomainError> {
    let mut sections = Vec::with_capacity(ctx.functions().len() + 2);

    let imports = ArtifactKind::Code.format(&imports.join("\n"))?;
    if !imports.is_empty() {
        sections.push(imports);
    }
    sections.extend(ctx.functions().iter().map(ExtractedFunction::declaration));
    sections.push(ArtifactKind::Code.format(&format!("module.exports = {};", exported.emit()))?);

    let mut module = sections
        .iter()
        .map(|section| section.strip_suffix('\n').unwrap_or(section))
        .collect::<Vec<_>>()
        .join("\n\n");
    module.push('\n');
    Ok(module)
}
