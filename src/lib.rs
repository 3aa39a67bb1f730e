//! # psrmig-base
//!
//! Core library for migrating legacy PHP source trees to a PSR-4,
//! namespace-qualified layout: canonical-casing renames, namespace
//! assignment, and `use`-declaration generation driven by reference
//! extraction over a parsed syntax tree.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → migration pipeline: discovery, rename, namespaces, persist
//!   ↓
//! semantic  → symbol index, reference extractor/resolver, import sets
//!   ↓
//! parser    → Logos lexer, recursive-descent parser for the PHP subset
//!   ↓
//! syntax    → AST node types, name resolution kinds
//!   ↓
//! base      → primitives (PascalCase text utilities, identifiers)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → parser → semantic → project)
// ============================================================================

/// Foundation utilities: PascalCase conversion, identifier checks
pub mod base;

/// Syntax: AST node types and name-resolution kinds
pub mod syntax;

/// Parser: Logos lexer, recursive-descent parser with error recovery
pub mod parser;

/// Semantic analysis: symbol index, reference extraction and resolution
pub mod semantic;

/// Project pipeline: discovery, renaming, namespace assignment, persistence
pub mod project;

// Re-export commonly needed items
pub use parser::{Parse, parse_php};
pub use semantic::{Resolver, SymbolIndex, build_import_set, extract_references};
pub use syntax::{Name, Node, Resolution};

// Re-export pipeline entry points
pub use project::{Migration, MigrationConfig, MigrationError, MigrationReport, SourceFile};
