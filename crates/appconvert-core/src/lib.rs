//! appconvert Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for `appconvert`,
//! which turns an integration app definition (a JSON object graph with
//! embedded function bodies) into a standalone, hand-editable project.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          appconvert-cli (CLI)           │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ConvertService: plans and runs jobs) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Filesystem, PackageRegistry)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   appconvert-adapters (Infrastructure)  │
//! │  (LocalFilesystem, NpmRegistry, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (extraction, literal emission, renders) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appconvert_core::prelude::*;
//!
//! let definition = AppDefinition::from_json(&text)?;
//! let info = AppInfo::default().with_title("My App");
//!
//! let service = ConvertService::new(filesystem, registry, ConvertOptions::new(templates));
//! service.convert(info, definition, "./my-app".as_ref()).await?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, ConvertOptions, ConvertService,
        ports::{Filesystem, PackageRegistry},
    };
    pub use crate::domain::{
        AppDefinition, AppInfo, ArtifactKind, DomainError, Job, Platform, RelativePath,
        StepCategory,
    };
    pub use crate::error::{ConvertError, ConvertResult, ErrorCategory};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
