use serde_json::Value;

use super::assemble;
use crate::domain::{error::DomainError, extract::ExtractionContext};

/// Render one definition fragment (a step, `authentication`, `hydrators`)
/// as a standalone module.
///
/// `path` locates the fragment in the definition; it names a function whose
/// `source` sits directly on the fragment and prefixes error paths.
pub fn render_slice(fragment: &Value, path: &[String]) -> Result<String, DomainError> {
    let mut ctx = ExtractionContext::new();
    let exported = ctx.lower(fragment, path)?;
    assemble(&[], &ctx, &exported)
}
