//! Processing methods for the analyzer.
//!
//! Contains: `analyze_paths`, `analyze_code`, per-file processing and
//! aggregation.

use super::types::FileAnalysis;
use super::{AnalysisResult, AnalysisSummary, GoModernize, ParseError};
use crate::constants::CHUNK_SIZE;
use crate::linter::LinterVisitor;
use crate::rules::modernize::get_modernize_rules;
use crate::rules::Context;
use crate::syntax::{parse_file, ScopeGraph};
use crate::utils::{collect_go_files, get_ignored_lines, LineIndex};
use crate::version::{find_go_mod_version, from_build_constraints};
use anyhow::{bail, Result};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};

impl GoModernize {
    /// Runs the analysis on multiple paths (files or directories).
    ///
    /// With no paths the current directory is analysed. Directories are
    /// walked for `.go` files; explicitly named files are analysed even if
    /// they would be excluded by a walk.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Result<AnalysisResult> {
        let default_root = [PathBuf::from(".")];
        let paths = if paths.is_empty() {
            &default_root[..]
        } else {
            paths
        };

        let mut seen = FxHashSet::default();
        let mut files = Vec::new();
        for path in paths {
            let found = if path.is_file() {
                vec![path.clone()]
            } else if path.is_dir() {
                collect_go_files(
                    path,
                    &self.exclude_folders,
                    &self.include_folders,
                    self.include_tests,
                )
            } else {
                bail!("path does not exist: {}", path.display());
            };
            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        tracing::debug!("analysing {} files", files.len());
        Ok(self.analyze_file_list(&files))
    }

    /// Analyzes a specific list of files.
    fn analyze_file_list(&self, files: &[PathBuf]) -> AnalysisResult {
        // Chunks bound the number of sources held in memory at once
        let mut all_results = Vec::with_capacity(files.len());
        for chunk in files.chunks(CHUNK_SIZE) {
            let chunk_results: Vec<FileAnalysis> = chunk
                .par_iter()
                .map(|file_path| self.process_single_file(file_path))
                .collect();
            all_results.extend(chunk_results);
        }
        aggregate_results(all_results)
    }

    /// Reads and analyses one file.
    fn process_single_file(&self, file_path: &Path) -> FileAnalysis {
        match fs::read_to_string(file_path) {
            Ok(source) => self.analyze_source(&source, file_path),
            Err(err) => {
                tracing::warn!("failed to read {}: {err}", file_path.display());
                FileAnalysis {
                    parse_error: Some(ParseError {
                        file: file_path.to_path_buf(),
                        error: format!("failed to read file: {err}"),
                    }),
                    ..FileAnalysis::default()
                }
            }
        }
    }

    /// Analyses source text as if it were read from `file_path`.
    ///
    /// The path is used for reporting and for locating `go.mod`; it does not
    /// need to exist.
    #[must_use]
    pub fn analyze_code(&self, code: &str, file_path: PathBuf) -> AnalysisResult {
        aggregate_results(vec![self.analyze_source(code, &file_path)])
    }

    fn analyze_source(&self, source: &str, file_path: &Path) -> FileAnalysis {
        let lines = source.lines().count();
        let file = match parse_file(source) {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!("{}: {err}", file_path.display());
                return FileAnalysis {
                    parse_error: Some(ParseError {
                        file: file_path.to_path_buf(),
                        error: err.to_string(),
                    }),
                    lines,
                    ..FileAnalysis::default()
                };
            }
        };

        let scopes = ScopeGraph::build(&file);
        let go_version = from_build_constraints(&file.build_constraints)
            .or_else(|| find_go_mod_version(file_path))
            .or(self.go_version);
        tracing::debug!(
            "analysing {} ({})",
            file_path.display(),
            go_version.map_or_else(|| "version unknown".to_owned(), |v| v.to_string())
        );

        let context = Context {
            filename: file_path.to_path_buf(),
            line_index: LineIndex::new(source),
            source,
            file: &file,
            scopes: &scopes,
            go_version,
        };
        let linter = LinterVisitor::new(get_modernize_rules(&self.config), context);
        let mut diagnostics = linter.run(&file);

        let ignored = get_ignored_lines(source);
        let before = diagnostics.len();
        diagnostics.retain(|d| {
            !ignored
                .get(&d.line)
                .is_some_and(|s| s.covers(&d.rule_id, &d.category))
        });

        FileAnalysis {
            suppressed: before - diagnostics.len(),
            diagnostics,
            parse_error: None,
            lines,
        }
    }
}

/// Merges per-file outcomes into one result.
fn aggregate_results(results: Vec<FileAnalysis>) -> AnalysisResult {
    let mut summary = AnalysisSummary {
        total_files: results.len(),
        ..AnalysisSummary::default()
    };
    let mut diagnostics = Vec::new();
    let mut parse_errors = Vec::new();

    for result in results {
        summary.total_lines_analyzed += result.lines;
        summary.suppressed_count += result.suppressed;
        if !result.diagnostics.is_empty() {
            summary.files_with_diagnostics += 1;
        }
        diagnostics.extend(result.diagnostics);
        parse_errors.extend(result.parse_error);
    }

    diagnostics.sort_by(|a, b| {
        (&a.file, a.range.start(), a.range.end()).cmp(&(&b.file, b.range.start(), b.range.end()))
    });
    parse_errors.sort_by(|a, b| a.file.cmp(&b.file));
    summary.diagnostics_count = diagnostics.len();
    summary.parse_errors_count = parse_errors.len();

    AnalysisResult {
        diagnostics,
        parse_errors,
        analysis_summary: summary,
    }
}
