use crate::fix::SuggestedFix;
use crate::syntax::ast::{File, Stmt};
use crate::syntax::ScopeGraph;
use crate::utils::LineIndex;
use crate::version::GoVersion;
use ruff_text_size::TextRange;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
/// Context passed to rules during analysis of one file.
pub struct Context<'a> {
    /// Path to the file being analyzed.
    pub filename: PathBuf,
    /// Line index for accurate line/column mapping.
    pub line_index: LineIndex,
    /// Source text the tree was parsed from.
    pub source: &'a str,
    /// Parsed file.
    pub file: &'a File,
    /// Scopes of `file`.
    pub scopes: &'a ScopeGraph,
    /// Effective Go version, `None` when unknown.
    pub go_version: Option<GoVersion>,
}

#[derive(Debug, Clone, Serialize)]
/// A single issue found by a rule, with the fix that resolves it.
pub struct Diagnostic {
    /// ID of the rule that triggered the diagnostic.
    pub rule_id: String,
    /// Category of the rule.
    pub category: String,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in bytes).
    pub col: usize,
    /// Highlighted byte range.
    pub range: TextRange,
    /// Range of the statement the fix rewrites.
    #[serde(skip)]
    pub stmt_range: TextRange,
    /// Suggested fixes; rules in this crate attach exactly one.
    pub fixes: Vec<SuggestedFix>,
}

impl Diagnostic {
    /// The primary fix, if any.
    #[must_use]
    pub fn fix(&self) -> Option<&SuggestedFix> {
        self.fixes.first()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
/// Metadata associated with a rule.
pub struct RuleMetadata {
    /// Unique code/ID of the rule.
    pub id: &'static str,
    /// Category of the rule.
    pub category: &'static str,
}

/// Trait defining a modernization rule.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str {
        self.metadata().id
    }
    /// Returns the category of the rule.
    fn category(&self) -> &'static str {
        self.metadata().category
    }
    /// Returns the full metadata for the rule.
    fn metadata(&self) -> RuleMetadata;
    /// Whether the rule applies to the file at all. Checked once per file
    /// before any statement is visited.
    fn is_active(&self, _context: &Context<'_>) -> bool {
        true
    }
    /// Called when entering a statement.
    fn enter_stmt(&mut self, _stmt: &Stmt, _context: &Context<'_>) -> Option<Vec<Diagnostic>> {
        None
    }
}

/// Module containing rule ID constants.
pub mod ids;
/// Module containing modernization rules.
pub mod modernize;
