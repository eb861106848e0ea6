use crate::constants::CONFIG_FILENAME;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default configuration written by `gomodernize init`.
const DEFAULT_CONFIG: &str = r#"[gomodernize]
# Go version assumed when neither a //go:build line nor go.mod names one
# go_version = "1.21"

# Path filters (vendor, .git, node_modules and testdata are always skipped)
exclude_folders = []
include_folders = []
include_tests = true

# Rule codes to skip
ignore = []
"#;

/// Executes the init command in the current directory.
pub fn run_init<W: Write>(writer: &mut W) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    run_init_in(&current_dir, writer)
}

/// Executes the init command in a specific directory.
///
/// An existing configuration file is left untouched.
pub fn run_init_in<W: Write>(root: &Path, writer: &mut W) -> Result<()> {
    let path = root.join(CONFIG_FILENAME);
    if path.exists() {
        writeln!(writer, "{CONFIG_FILENAME} already exists - skipping.")?;
        return Ok(());
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writeln!(writer, "Created {CONFIG_FILENAME}.")?;
    Ok(())
}
