//! Byte-range safe code rewriter.
//!
//! Edits address the original source by byte offsets. They are validated
//! against each other and against the source before anything is applied,
//! then applied from the end of the file backwards so earlier offsets stay
//! valid.
//!
//! # Usage
//!
//! ```
//! use gomodernize::fix::{ByteRangeRewriter, TextEdit};
//!
//! let source = "if strings.HasPrefix(s, p) {";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(TextEdit::new(11, 20, "CutPrefix"));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, "if strings.CutPrefix(s, p) {");
//! ```

use ruff_text_size::{TextRange, TextSize};
use serde::Serialize;
use std::cmp::Reverse;

/// A single edit: replace `start..end` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Replacement text
    pub replacement: String,
}

impl TextEdit {
    /// Create a new edit
    #[must_use]
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Create an edit replacing a syntax range
    #[must_use]
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self::new(range.start().to_usize(), range.end().to_usize(), replacement)
    }

    /// Create a deletion edit
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, "")
    }

    /// Create an insertion edit (insert before position)
    #[must_use]
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::new(position, position, content)
    }

    /// Length of the range being replaced
    #[must_use]
    pub const fn range_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for zero-width edits
    #[must_use]
    pub const fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// Check if this edit overlaps with another.
    ///
    /// Ranges overlap when they share at least one byte. An insertion
    /// touching the boundary of another edit does not overlap it, but two
    /// insertions at the same offset do: their relative order would be
    /// ambiguous.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.is_insertion() && other.is_insertion() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// Two or more edits have overlapping ranges
    #[error("overlapping edits at indices {edit_a} and {edit_b}")]
    OverlappingEdits {
        /// Index of first overlapping edit
        edit_a: usize,
        /// Index of second overlapping edit
        edit_b: usize,
    },
    /// Edit range is out of bounds
    #[error("edit {edit_index} out of bounds: end {end} > source length {source_len}")]
    OutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// End offset of the edit
        end: usize,
        /// Length of the source
        source_len: usize,
    },
    /// Edit ends before it starts
    #[error("edit {edit_index} has start {start} after end {end}")]
    InvalidRange {
        /// Index of the bad edit
        edit_index: usize,
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },
    /// Edit boundary splits a UTF-8 character
    #[error("edit {edit_index} boundary {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Index of the bad edit
        edit_index: usize,
        /// Offending offset
        offset: usize,
    },
    /// The rewritten source no longer parses
    #[error("rewritten source does not parse: {message}")]
    Unparsable {
        /// Parser message
        message: String,
    },
}

/// Safe code rewriter using byte ranges
///
/// This rewriter applies edits in reverse order to preserve byte positions,
/// and validates that edits don't overlap.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code
    source: String,
    /// Pending edits
    edits: Vec<TextEdit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    /// Add multiple edits
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = TextEdit>) {
        self.edits.extend(edits);
    }

    /// Get the number of pending edits
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Check if there are any pending edits
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds or split a character
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.start > edit.end {
                return Err(RewriteError::InvalidRange {
                    edit_index: i,
                    start: edit.start,
                    end: edit.end,
                });
            }
            if edit.end > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    end: edit.end,
                    source_len: self.source.len(),
                });
            }
            for offset in [edit.start, edit.end] {
                if !self.source.is_char_boundary(offset) {
                    return Err(RewriteError::NotCharBoundary {
                        edit_index: i,
                        offset,
                    });
                }
            }
        }

        check_overlaps(&self.edits)
    }

    /// Apply all edits and return the modified source
    ///
    /// Edits are applied in descending start order. At equal starts the
    /// edit with the larger end goes first, so an insertion at the start of
    /// a replaced range ends up in front of the replacement.
    ///
    /// # Errors
    /// Returns error if edits overlap or are out of bounds
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted_edits = self.edits;
        sorted_edits.sort_by_key(|edit| (Reverse(edit.start), Reverse(edit.end)));

        for edit in sorted_edits {
            result.replace_range(edit.start..edit.end, &edit.replacement);
        }

        Ok(result)
    }

    /// Apply edits and verify the result still parses
    ///
    /// # Errors
    /// Returns error if edits are invalid or the result doesn't parse
    pub fn apply_verified(self) -> Result<String, RewriteError> {
        let result = self.apply()?;
        crate::syntax::parse_file(&result).map_err(|err| RewriteError::Unparsable {
            message: err.to_string(),
        })?;
        Ok(result)
    }
}

/// Pairwise overlap check, reporting the first offending pair.
pub(crate) fn check_overlaps(edits: &[TextEdit]) -> Result<(), RewriteError> {
    for i in 0..edits.len() {
        for j in (i + 1)..edits.len() {
            if edits[i].overlaps(&edits[j]) {
                return Err(RewriteError::OverlappingEdits {
                    edit_a: i,
                    edit_b: j,
                });
            }
        }
    }
    Ok(())
}

/// Builder for constructing multiple edits
#[derive(Debug, Default)]
pub struct EditBuilder {
    edits: Vec<TextEdit>,
}

impl EditBuilder {
    /// Create a new edit builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a replacement edit
    #[must_use]
    pub fn replace(mut self, range: TextRange, replacement: impl Into<String>) -> Self {
        self.edits.push(TextEdit::replace(range, replacement));
        self
    }

    /// Add a deletion edit
    #[must_use]
    pub fn delete(mut self, range: TextRange) -> Self {
        self.edits.push(TextEdit::replace(range, ""));
        self
    }

    /// Add an insertion edit
    #[must_use]
    pub fn insert(mut self, position: TextSize, content: impl Into<String>) -> Self {
        self.edits
            .push(TextEdit::insert(position.to_usize(), content));
        self
    }

    /// Add an already constructed edit
    #[must_use]
    pub fn edit(mut self, edit: TextEdit) -> Self {
        self.edits.push(edit);
        self
    }

    /// Build the list of edits
    #[must_use]
    pub fn build(self) -> Vec<TextEdit> {
        self.edits
    }
}
