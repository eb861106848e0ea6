//! Fix module for auto-remediation.
//!
//! Rules describe their rewrites as [`SuggestedFix`] values: labelled lists
//! of byte-range edits against the original source. The core component is
//! `ByteRangeRewriter`, which validates and applies those edits without
//! touching anything outside them.

mod rewriter;
mod suggestion;

pub use rewriter::{ByteRangeRewriter, EditBuilder, RewriteError, TextEdit};
pub use suggestion::SuggestedFix;
