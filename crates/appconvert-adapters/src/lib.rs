//! Infrastructure adapters for appconvert.
//!
//! This crate implements the ports defined in `appconvert-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod registry;

// Re-export commonly used adapters
pub use builtin_templates::resolve_template_dir;
pub use filesystem::{CopyOptions, LocalFilesystem, MemoryFilesystem, expand_home};
pub use registry::{DEFAULT_REGISTRY_URL, NpmRegistry, StaticRegistry};
