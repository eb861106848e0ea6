//! Go front end: syntax tree, scopes and callee resolution.
//!
//! Source is parsed with `tree-sitter-go` and lowered into [`ast`]. The
//! modernization rules only read what this module produces. Every node
//! carries the byte range it was parsed from, so fixes can address the
//! original text exactly.

pub mod ast;
pub mod callee;
pub mod equality;
pub mod parser;
pub mod scope;
pub mod visitor;

pub use equality::equal_syntax;
pub use parser::parse_file;
pub use scope::{ScopeGraph, ScopeId};

/// Error raised when a source file cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at byte {offset})")]
pub struct ParseError {
    /// Description of the problem.
    pub message: String,
    /// Byte offset where the problem was detected.
    pub offset: usize,
}

impl ParseError {
    /// Creates a new parse error at `offset`.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}
