use super::rewriter::{check_overlaps, ByteRangeRewriter, RewriteError, TextEdit};
use serde::Serialize;

/// A labelled set of edits that together implement one fix.
///
/// Construction rejects overlapping edits, so every `SuggestedFix` can be
/// applied on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedFix {
    /// Human-readable description of the fix.
    pub label: String,
    /// Edits in the order they were produced.
    pub edits: Vec<TextEdit>,
}

impl SuggestedFix {
    /// Creates a fix after checking that no two edits overlap.
    pub fn new(label: impl Into<String>, edits: Vec<TextEdit>) -> Result<Self, RewriteError> {
        check_overlaps(&edits)?;
        Ok(Self {
            label: label.into(),
            edits,
        })
    }

    /// Applies the fix to `source`.
    pub fn apply(&self, source: &str) -> Result<String, RewriteError> {
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edits(self.edits.iter().cloned());
        rewriter.apply()
    }

    /// Applies the fix and checks that the result is still a valid file.
    pub fn apply_verified(&self, source: &str) -> Result<String, RewriteError> {
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edits(self.edits.iter().cloned());
        rewriter.apply_verified()
    }

    /// True if any edit of `self` overlaps any edit of `other`.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| a.overlaps(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_overlap() {
        let err = SuggestedFix::new(
            "fix",
            vec![TextEdit::new(0, 4, "a"), TextEdit::new(2, 6, "b")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RewriteError::OverlappingEdits {
                edit_a: 0,
                edit_b: 1
            }
        );
    }

    #[test]
    fn test_apply_keeps_construction_order() {
        let fix = SuggestedFix::new(
            "fix",
            vec![TextEdit::insert(0, "<"), TextEdit::new(0, 1, "X"), TextEdit::insert(1, ">")],
        )
        .unwrap();
        assert_eq!(fix.edits[0], TextEdit::insert(0, "<"));
        assert_eq!(fix.apply("abc").unwrap(), "<X>bc");
    }

    #[test]
    fn test_conflicts_with() {
        let a = SuggestedFix::new("a", vec![TextEdit::new(0, 3, "x")]).unwrap();
        let b = SuggestedFix::new("b", vec![TextEdit::new(2, 5, "y")]).unwrap();
        let c = SuggestedFix::new("c", vec![TextEdit::new(3, 5, "z")]).unwrap();
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
    }
}
