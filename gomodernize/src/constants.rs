use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the configuration file looked up from the analysed path upwards.
pub const CONFIG_FILENAME: &str = ".gomodernize.toml";

/// Module file whose `go` directive sets the default language version.
pub const GO_MOD_FILENAME: &str = "go.mod";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "GOMODERNIZE_LOG";

/// Files handed to one rayon task at a time.
pub const CHUNK_SIZE: usize = 500;

/// Upper bound on fix-and-reanalyze rounds in one `--fix` run.
pub const MAX_FIX_PASSES: usize = 10;

/// Regex for `goX.Y` terms in `//go:build` lines. Group 1 captures a
/// leading negation.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_build_go_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(!?)\bgo(\d+)\.(\d+)\b").expect("Invalid build constraint regex pattern")
    })
}

/// Regex for the `go` directive of a `go.mod` file.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_go_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*go[ \t]+([0-9][0-9A-Za-z.]*)")
            .expect("Invalid go directive regex pattern")
    })
}

/// Regex for identifying test files.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_test_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"_test\.go$").expect("Invalid test file regex pattern"))
}

/// Regex for suppression comments: `//nolint`, `//nolint:a,b` and
/// `//gomodernize:ignore`. Group 1 captures the optional name list.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_suppression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"//\s*(?:nolint(?::([\w\-, ]+))?|gomodernize:ignore)\b")
            .expect("Invalid suppression regex pattern")
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("vendor");
        s.insert(".git");
        s.insert("node_modules");
        s.insert("testdata");
        s
    })
}

pub use get_build_go_version_re as BUILD_GO_VERSION_RE;
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_go_directive_re as GO_DIRECTIVE_RE;
pub use get_suppression_re as SUPPRESSION_RE;
pub use get_test_file_re as TEST_FILE_RE;
