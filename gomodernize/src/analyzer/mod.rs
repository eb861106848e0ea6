//! gomodernize analyzer module.
//!
//! - `types`: result types (`AnalysisResult`, `ParseError`, `AnalysisSummary`)
//! - `processing`: file discovery, per-file analysis and aggregation
//! - the `GoModernize` struct holding analysis options

mod processing;
/// Result types and analysis summaries.
pub mod types;

pub use types::{AnalysisResult, AnalysisSummary, ParseError};

use crate::config::Config;
use crate::version::GoVersion;

/// The main analyzer struct.
/// Configuration options for the analysis are stored here.
#[derive(Debug, Clone)]
pub struct GoModernize {
    /// Whether to include `_test.go` files in the analysis.
    pub include_tests: bool,
    /// Folders to exclude from analysis.
    pub exclude_folders: Vec<String>,
    /// Folders to force-include in analysis (overrides default exclusions).
    pub include_folders: Vec<String>,
    /// Version assumed for files without a build constraint or `go.mod`.
    pub go_version: Option<GoVersion>,
    /// Configuration object.
    pub config: Config,
}

impl Default for GoModernize {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl GoModernize {
    /// Creates an analyzer whose options start from `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let section = &config.gomodernize;
        Self {
            include_tests: section.include_tests(),
            exclude_folders: section.exclude_folders.clone().unwrap_or_default(),
            include_folders: section.include_folders.clone().unwrap_or_default(),
            go_version: section.go_version,
            config,
        }
    }

    /// Builder-style method to include test files.
    #[must_use]
    pub fn with_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    /// Builder-style method to add excluded folders.
    #[must_use]
    pub fn with_excludes(mut self, folders: Vec<String>) -> Self {
        self.exclude_folders.extend(folders);
        self
    }

    /// Builder-style method to set included folders.
    #[must_use]
    pub fn with_includes(mut self, folders: Vec<String>) -> Self {
        self.include_folders = folders;
        self
    }

    /// Builder-style method to override the fallback Go version.
    #[must_use]
    pub fn with_go_version(mut self, version: Option<GoVersion>) -> Self {
        if version.is_some() {
            self.go_version = version;
        }
        self
    }
}
