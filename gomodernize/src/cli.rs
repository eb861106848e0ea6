use crate::version::GoVersion;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.gomodernize.toml):
  Looked up from the analysed path upwards.

  [gomodernize]
  go_version = \"1.21\"        # Used when no go.mod or //go:build names one
  exclude_folders = [\"gen\"]  # Added to vendor, .git, node_modules, testdata
  include_folders = []       # Force-include these
  include_tests = true       # Analyse *_test.go files
  ignore = [\"GMZ-M001\"]      # Rule codes to skip

SUPPRESSION:
  //nolint, //nolint:stringscutprefix or //gomodernize:ignore on the
  reported line hides the diagnostic.
";

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (logs each file analysed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: diagnostic lines and a one-line summary, no tables.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Exit with code 1 if any diagnostic remains.
    #[arg(long)]
    pub fail_on_diagnostics: bool,
}

/// Options for rewriting files.
#[derive(Args, Debug, Default, Clone)]
pub struct FixOptions {
    /// Apply suggested fixes in place.
    #[arg(long)]
    pub fix: bool,

    /// With --fix, print the rewritten files instead of writing them.
    #[arg(long, requires = "fix")]
    pub dry_run: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a default .gomodernize.toml in the current directory
    Init,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    name = "gomodernize",
    version,
    about = "gomodernize - rewrite Go HasPrefix/TrimPrefix pairs into CutPrefix",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Option<Commands>,

    /// Files or directories to analyse (default: current directory).
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Go version to assume when neither a //go:build line nor go.mod names one.
    #[arg(long, value_name = "VERSION")]
    pub go_version: Option<GoVersion>,

    /// Folders to exclude from analysis.
    #[arg(long = "exclude", alias = "exclude-folder", value_name = "DIR")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include in analysis (overrides default exclusions).
    #[arg(long = "include", alias = "include-folder", value_name = "DIR")]
    pub include_folders: Vec<String>,

    /// Skip *_test.go files.
    #[arg(long)]
    pub no_tests: bool,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Fix options.
    #[command(flatten)]
    pub fix: FixOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "gomodernize",
            "--go-version",
            "1.21",
            "--exclude",
            "gen",
            "--fix",
            "--dry-run",
            "./pkg",
        ])
        .unwrap();
        assert_eq!(cli.go_version, Some(GoVersion::new(1, 21)));
        assert_eq!(cli.exclude_folders, vec!["gen"]);
        assert!(cli.fix.fix && cli.fix.dry_run);
        assert_eq!(cli.paths, vec![PathBuf::from("./pkg")]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_dry_run_requires_fix() {
        assert!(Cli::try_parse_from(["gomodernize", "--dry-run"]).is_err());
    }

    #[test]
    fn test_rejects_bad_version() {
        assert!(Cli::try_parse_from(["gomodernize", "--go-version", "soon"]).is_err());
    }

    #[test]
    fn test_init_subcommand() {
        let cli = Cli::try_parse_from(["gomodernize", "init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
    }
}
