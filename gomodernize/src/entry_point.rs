//! Shared entry point used by both binaries.

use crate::analyzer::GoModernize;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::constants::LOG_ENV_VAR;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Exit code when diagnostics remain and `--fail-on-diagnostics` is set.
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// Exit code for usage and I/O errors.
pub const EXIT_ERROR: i32 = 2;

/// Installs the stderr log subscriber. The filter comes from
/// `GOMODERNIZE_LOG` when set; otherwise `warn`, or `debug` with
/// `--verbose` and `error` with `--quiet`.
fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when running in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run gomodernize with the given arguments, writing to stdout.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run gomodernize with the given arguments, writing output to `writer`.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["gomodernize".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(EXIT_ERROR);
            }
        },
    };

    init_logging(cli.output.verbose, cli.output.quiet);

    if let Some(Commands::Init) = cli.command {
        return match crate::commands::run_init(writer) {
            Ok(()) => Ok(0),
            Err(err) => {
                eprintln!("Error: {err:#}");
                Ok(EXIT_ERROR)
            }
        };
    }

    match run_analysis(&cli, writer) {
        Ok(code) => Ok(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            Ok(EXIT_ERROR)
        }
    }
}

fn run_analysis<W: Write>(cli: &Cli, writer: &mut W) -> Result<i32> {
    let config_path = cli.paths.first().map_or(Path::new("."), |p| p.as_path());
    let config = Config::load_from_path(config_path);
    if let Some(path) = &config.config_file_path {
        tracing::debug!("using configuration {}", path.display());
    }

    let mut analyzer = GoModernize::new(config)
        .with_excludes(cli.exclude_folders.clone())
        .with_go_version(cli.go_version);
    if !cli.include_folders.is_empty() {
        analyzer = analyzer.with_includes(cli.include_folders.clone());
    }
    if cli.no_tests {
        analyzer = analyzer.with_tests(false);
    }
    tracing::debug!(
        "excluding {:?}, {} threads",
        analyzer.exclude_folders,
        rayon::current_num_threads()
    );

    let mut result = analyzer.analyze_paths(&cli.paths)?;

    if cli.fix.fix {
        if cli.fix.dry_run {
            crate::commands::run_fix(&result, true, writer)?;
        } else {
            // Report what is left after rewriting
            let (report, remaining) =
                crate::commands::fix_until_stable(&analyzer, &cli.paths, &result, writer)?;
            if !cli.output.json {
                crate::output::print_fix_report(writer, &report)?;
            }
            result = remaining;
        }
    }

    if cli.output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else if !cli.fix.dry_run {
        if cli.output.quiet {
            crate::output::print_report_quiet(writer, &result)?;
        } else {
            crate::output::print_report(writer, &result)?;
        }
    }

    if cli.output.fail_on_diagnostics && !result.diagnostics.is_empty() {
        return Ok(EXIT_DIAGNOSTICS);
    }
    Ok(0)
}
