//! # Semantic Analysis
//!
//! The reference extraction & resolution engine: given a parsed syntax tree
//! for one file and a project-wide symbol index, produce the minimal,
//! deduplicated set of fully-qualified names the file must import.
//!
//! Pipeline per file (the index is built once, before any extraction):
//!
//! ```text
//! Syntax Tree → extract_references → Resolver::resolve → build_import_set
//! ```

pub mod extractor;
pub mod imports;
pub mod resolver;
pub mod symbol_index;

pub use extractor::{RefContext, TypeRef, extract_references};
pub use imports::build_import_set;
pub use resolver::Resolver;
pub use symbol_index::SymbolIndex;
