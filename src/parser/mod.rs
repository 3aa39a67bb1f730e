//! # Parser
//!
//! Lexer and recursive-descent parser for the PHP subset the migration
//! engine analyzes:
//!
//! ```text
//! Source Text (inline HTML allowed)
//!     ↓
//! php_code   → PHP regions only, <?= rewritten to echo
//!     ↓
//! Lexer (logos) → Tokens
//!     ↓
//! Parser → syntax::Node tree + recovered SyntaxErrors
//! ```
//!
//! Errors never abort a parse: the original migration ran its parser with
//! error suppression, and the extraction engine prefers a partial tree over
//! no tree (a malformed construct yields no references, not a failure).

mod lexer;
mod php;

pub use lexer::{Lexer, Token, TokenKind, php_code, tokenize};
pub use php::{Parse, SyntaxError, parse_php};
