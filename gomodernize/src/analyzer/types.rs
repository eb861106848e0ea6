//! Type definitions for analysis results.

use crate::rules::Diagnostic;
use serde::Serialize;
use std::path::PathBuf;

/// A file that could not be read or parsed.
#[derive(Debug, Serialize, Clone)]
pub struct ParseError {
    /// The file where the error occurred.
    pub file: PathBuf,
    /// The error message.
    pub error: String,
}

/// Holds the results of the analysis.
/// This struct is serialized to JSON if requested.
#[derive(Debug, Serialize, Default)]
pub struct AnalysisResult {
    /// Diagnostics, ordered by file and position.
    pub diagnostics: Vec<Diagnostic>,
    /// List of parse errors encountered.
    pub parse_errors: Vec<ParseError>,
    /// Summary statistics of the analysis.
    pub analysis_summary: AnalysisSummary,
}

/// Summary statistics for the analysis result.
#[derive(Debug, Serialize, Default, Clone, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Total number of files scanned.
    pub total_files: usize,
    /// Total number of lines analyzed.
    pub total_lines_analyzed: usize,
    /// Number of files with at least one diagnostic.
    pub files_with_diagnostics: usize,
    /// Total number of diagnostics reported.
    pub diagnostics_count: usize,
    /// Diagnostics hidden by suppression comments.
    pub suppressed_count: usize,
    /// Total number of parse errors found.
    pub parse_errors_count: usize,
}

/// Outcome of analysing a single file.
#[derive(Debug, Default)]
pub(crate) struct FileAnalysis {
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) parse_error: Option<ParseError>,
    pub(crate) lines: usize,
    pub(crate) suppressed: usize,
}
