//! # Project
//!
//! The migration pipeline around the semantic core: source discovery,
//! Latin-1 file I/O, canonical-casing renames, namespace assignment,
//! composer manifest editing, and persistence of the rewritten files.

pub mod config;
pub mod discovery;
pub mod error;
pub mod file_io;
pub mod manifest;
pub mod migration;
pub mod namespace;
pub mod persist;
pub mod rename;
pub mod source_file;

pub use config::MigrationConfig;
pub use error::{MigrationError, MigrationResult};
pub use migration::{Migration, MigrationReport};
pub use source_file::SourceFile;
