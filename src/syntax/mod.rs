//! # Syntax
//!
//! Typed AST for the PHP subset the migration engine analyzes. The tree is
//! a closed set of node kinds: the reference extractor dispatches on these
//! with an exhaustive match, so adding a kind here forces a decision about
//! whether it carries type references.

pub mod ast;

pub use ast::{
    ArrayEntry, CatchClause, Name, Node, Param, Resolution, SwitchCase, TypeHint,
    declared_type_names,
};
