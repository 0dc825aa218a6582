//! Core domain layer for appconvert.
//!
//! Pure conversion logic: definition in, file contents out. All I/O
//! (reading templates, writing files, asking the package registry) is done
//! through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Pure renderers**: every renderer borrows the definition and returns text
//!
//! ## Pipeline
//!
//! ```text
//! AppDefinition ──▶ ExtractionContext::lower ──▶ Literal ──▶ Emit ──▶ ArtifactKind::format
//! ```

pub mod artifact;
pub mod common;
pub mod definition;
pub mod error;
pub mod extract;
pub mod format;
pub mod literal;
pub mod naming;
pub mod render;
pub mod template;

pub use artifact::{Job, RenderedArtifact, plan};
pub use common::RelativePath;
pub use definition::{AppDefinition, AppInfo, GeneralInfo, StepCategory};
pub use error::{DomainError, ErrorCategory};
pub use extract::{ExtractedFunction, ExtractionContext};
pub use format::ArtifactKind;
pub use literal::{Emit, Key, Literal, ObjectLiteral, Placeholder};
pub use render::Platform;
pub use template::RenderContext;
