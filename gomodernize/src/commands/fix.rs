//! Applying suggested fixes to files.

use crate::analyzer::{AnalysisResult, GoModernize};
use crate::constants::MAX_FIX_PASSES;
use crate::fix::{ByteRangeRewriter, RewriteError, SuggestedFix};
use crate::rules::Diagnostic;
use crate::utils::normalize_display_path;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happened to one file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileFix {
    /// File that was rewritten.
    pub path: PathBuf,
    /// Fixes applied.
    pub applied: usize,
    /// Fixes skipped because they overlap an earlier one.
    pub skipped: usize,
}

/// Result of a `--fix` run.
#[derive(Debug, Default, Serialize)]
pub struct FixReport {
    /// Files with at least one applied fix.
    pub files: Vec<FileFix>,
    /// Files that could not be fixed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl FixReport {
    /// Total fixes applied.
    pub fn applied(&self) -> usize {
        self.files.iter().map(|f| f.applied).sum()
    }

    /// Total fixes skipped as conflicting.
    pub fn skipped(&self) -> usize {
        self.files.iter().map(|f| f.skipped).sum()
    }

    /// Folds a later pass into this report. Applied counts add up; the
    /// skipped count of a file is the one seen by the latest pass.
    pub fn absorb(&mut self, later: FixReport) {
        for file in later.files {
            match self.files.iter_mut().find(|f| f.path == file.path) {
                Some(existing) => {
                    existing.applied += file.applied;
                    existing.skipped = file.skipped;
                }
                None => self.files.push(file),
            }
        }
        self.failures.extend(later.failures);
    }
}

/// Picks fixes first-come. A fix is skipped when its edits overlap one
/// already picked, or when its statement contains or is contained by an
/// already picked statement: fresh names are chosen against the original
/// source, so nested rewrites may only be combined by analyzing again.
///
/// Returns the picked fixes and the number skipped.
pub fn select_fixes<'a>(
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
) -> (Vec<&'a SuggestedFix>, usize) {
    let mut picked: Vec<(&Diagnostic, &SuggestedFix)> = Vec::new();
    let mut skipped = 0;
    for diagnostic in diagnostics {
        let Some(fix) = diagnostic.fix() else {
            continue;
        };
        let conflicts = picked.iter().any(|(other, other_fix)| {
            other_fix.conflicts_with(fix)
                || other.stmt_range.contains_range(diagnostic.stmt_range)
                || diagnostic.stmt_range.contains_range(other.stmt_range)
        });
        if conflicts {
            skipped += 1;
        } else {
            picked.push((diagnostic, fix));
        }
    }
    (picked.into_iter().map(|(_, fix)| fix).collect(), skipped)
}

/// Applies non-conflicting fixes together and checks the result parses.
pub fn apply_fixes(source: &str, fixes: &[&SuggestedFix]) -> Result<String, RewriteError> {
    let mut rewriter = ByteRangeRewriter::new(source);
    for fix in fixes {
        rewriter.add_edits(fix.edits.iter().cloned());
    }
    rewriter.apply_verified()
}

/// Applies the fixes of `result` to the files on disk, or prints the
/// rewritten files when `dry_run` is set.
pub fn run_fix<W: Write>(
    result: &AnalysisResult,
    dry_run: bool,
    writer: &mut W,
) -> Result<FixReport> {
    let mut by_file: BTreeMap<&Path, Vec<&Diagnostic>> = BTreeMap::new();
    for diagnostic in &result.diagnostics {
        by_file
            .entry(diagnostic.file.as_path())
            .or_default()
            .push(diagnostic);
    }

    let mut report = FixReport::default();
    for (path, diagnostics) in by_file {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let (fixes, skipped) = select_fixes(diagnostics);
        if fixes.is_empty() {
            continue;
        }

        let fixed = match apply_fixes(&source, &fixes) {
            Ok(fixed) => fixed,
            Err(err) => {
                tracing::warn!("not fixing {}: {err}", path.display());
                report.failures.push((path.to_path_buf(), err.to_string()));
                continue;
            }
        };

        if dry_run {
            writeln!(
                writer,
                "{}",
                format!("--- {}", normalize_display_path(path)).cyan()
            )?;
            write!(writer, "{fixed}")?;
        } else {
            fs::write(path, fixed)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        report.files.push(FileFix {
            path: path.to_path_buf(),
            applied: fixes.len(),
            skipped,
        });
    }
    Ok(report)
}

/// Applies fixes and re-analyzes `paths` until a pass applies nothing.
///
/// Nested matches are held back by [`select_fixes`] and picked up by the
/// next pass, which sees the rewritten outer statement. Returns the
/// combined report and the analysis of the final state.
pub fn fix_until_stable<W: Write>(
    analyzer: &GoModernize,
    paths: &[PathBuf],
    initial: &AnalysisResult,
    writer: &mut W,
) -> Result<(FixReport, AnalysisResult)> {
    let mut report = run_fix(initial, false, writer)?;
    let mut result = analyzer.analyze_paths(paths)?;
    let mut last_applied = report.applied();
    let mut passes = 1;

    while last_applied > 0 && !result.diagnostics.is_empty() {
        if passes >= MAX_FIX_PASSES {
            tracing::warn!("stopping after {passes} fix passes with diagnostics left");
            break;
        }
        let next = run_fix(&result, false, writer)?;
        last_applied = next.applied();
        report.absorb(next);
        result = analyzer.analyze_paths(paths)?;
        passes += 1;
    }
    tracing::debug!("{} fixes applied in {passes} passes", report.applied());
    Ok((report, result))
}
