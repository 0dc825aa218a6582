//! Application layer for appconvert.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (`ConvertService`)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! conversion logic itself. Everything that decides file contents lives in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ConvertOptions, ConvertService};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, PackageRegistry};

pub use error::ApplicationError;
