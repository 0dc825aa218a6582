//! Filesystem adapters.

mod local;
mod memory;

pub use local::{CopyOptions, LocalFilesystem, expand_home};
pub use memory::MemoryFilesystem;
