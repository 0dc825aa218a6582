//! Application services - orchestrate use cases.

pub mod convert_service;

pub use convert_service::{ConvertOptions, ConvertService};
