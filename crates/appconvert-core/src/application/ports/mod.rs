//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `appconvert-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `PackageRegistry`: Latest published package versions
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by `ConvertService`)

pub mod output;

pub use output::{Filesystem, PackageRegistry};

#[cfg(test)]
pub use output::{MockFilesystem, MockPackageRegistry};
