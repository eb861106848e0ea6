//! Utilities shared by the analyzer and the CLI.

use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, SUPPRESSION_RE, TEST_FILE_RE};
use ruff_text_size::TextSize;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

/// A utility struct to convert byte offsets to line numbers.
///
/// The parser works with byte offsets, but diagnostics are reported with
/// 1-based lines and columns.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        // '\n' is always a single byte in UTF-8
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Byte offset where the given 1-indexed line starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(0)
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair. Columns
    /// count bytes, like `go vet` positions.
    #[must_use]
    pub fn line_col(&self, offset: TextSize) -> (usize, usize) {
        let line = self.line_index(offset);
        let col = offset.to_usize() - self.line_start(line) + 1;
        (line, col)
    }
}

/// Suppression specification.
#[derive(Debug, Clone, PartialEq)]
pub enum Suppression {
    /// Suppress all diagnostics on the line.
    All,
    /// Suppress diagnostics whose rule id or category is listed.
    Specific(FxHashSet<String>),
}

impl Suppression {
    /// Whether a diagnostic with `rule_id` and `category` is suppressed.
    #[must_use]
    pub fn covers(&self, rule_id: &str, category: &str) -> bool {
        match self {
            Suppression::All => true,
            Suppression::Specific(names) => names.contains(rule_id) || names.contains(category),
        }
    }
}

/// Detects a suppression comment on a line.
///
/// Supported forms:
/// - `//nolint` or `//gomodernize:ignore` - everything on the line
/// - `//nolint:stringscutprefix,GMZ-M001` - listed categories or rule ids
#[must_use]
pub fn get_line_suppression(line: &str) -> Option<Suppression> {
    let caps = SUPPRESSION_RE().captures(line)?;
    let Some(list) = caps.get(1) else {
        return Some(Suppression::All);
    };
    let names: FxHashSet<String> = list
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() || names.contains("all") {
        Some(Suppression::All)
    } else {
        Some(Suppression::Specific(names))
    }
}

/// Maps 1-indexed line numbers to the suppression they carry.
#[must_use]
pub fn get_ignored_lines(source: &str) -> FxHashMap<usize, Suppression> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| get_line_suppression(line).map(|s| (i + 1, s)))
        .collect()
}

/// Checks if a path names a Go test file.
#[must_use]
pub fn is_test_path(p: &str) -> bool {
    TEST_FILE_RE().is_match(p)
}

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes
/// - Strips a leading "./"
///
/// # Examples
/// ```
/// use std::path::Path;
/// use gomodernize::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new("./cmd/main.go")), "cmd/main.go");
/// assert_eq!(normalize_display_path(Path::new(".\\pkg\\a.go")), "pkg/a.go");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a directory name matches any exclusion pattern.
/// Supports exact names and suffix patterns of the form `*.ext`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| match exclude.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => name.ends_with(suffix),
        _ => name == exclude,
    })
}

/// Collects `.go` files below `root`, respecting `.gitignore` files in
/// addition to the default and user exclusions.
///
/// `include` force-includes folders that would otherwise be excluded.
/// When `include_tests` is false, `_test.go` files are skipped. A `root`
/// that is itself a file is returned as is.
#[must_use]
pub fn collect_go_files(
    root: &Path,
    exclude: &[String],
    include: &[String],
    include_tests: bool,
) -> Vec<PathBuf> {
    use ignore::WalkBuilder;

    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut all_excludes: Vec<String> = exclude
        .iter()
        .cloned()
        .chain(DEFAULT_EXCLUDE_FOLDERS().iter().map(|&s| s.to_owned()))
        .collect();
    all_excludes.retain(|ex| !include.iter().any(|inc| ex == inc));

    let root_for_filter = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            // Files are filtered after the walk
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            match entry.file_name().to_str() {
                Some(name) => !is_excluded(name, &all_excludes),
                None => true,
            }
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    continue;
                }
                if !path.extension().is_some_and(|ext| ext == "go") {
                    continue;
                }
                if !include_tests && is_test_path(&path.to_string_lossy()) {
                    continue;
                }
                files.push(path.to_path_buf());
            }
            Err(err) => tracing::debug!("walk error: {err}"),
        }
    }
    files.sort();
    files
}
