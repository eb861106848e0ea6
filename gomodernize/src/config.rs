use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILENAME;
use crate::version::GoVersion;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[gomodernize]` section.
    pub gomodernize: GoModernizeConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration options for gomodernize.
pub struct GoModernizeConfig {
    /// Go version assumed when no `go.mod` or build constraint names one.
    pub go_version: Option<GoVersion>,
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to include even if excluded by default.
    pub include_folders: Option<Vec<String>>,
    /// Whether to analyse `_test.go` files.
    pub include_tests: Option<bool>,
    /// List of rule codes to ignore.
    pub ignore: Option<Vec<String>>,
}

impl GoModernizeConfig {
    /// Whether `_test.go` files are analysed (default: true).
    pub fn include_tests(&self) -> bool {
        self.include_tests.unwrap_or(true)
    }

    /// Whether the rule with `code` is disabled.
    pub fn ignores(&self, code: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|codes| codes.iter().any(|c| c == code))
    }
}

impl Config {
    /// Loads configuration from the current directory or its parents.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// A file that exists but does not parse is reported and skipped.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                match fs::read_to_string(&candidate) {
                    Ok(content) => match toml::from_str::<Config>(&content) {
                        Ok(mut config) => {
                            tracing::debug!("loaded configuration from {}", candidate.display());
                            config.config_file_path = Some(candidate);
                            return config;
                        }
                        Err(err) => {
                            tracing::warn!("ignoring invalid {}: {err}", candidate.display());
                        }
                    },
                    Err(err) => {
                        tracing::warn!("failed to read {}: {err}", candidate.display());
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.gomodernize.go_version.is_none());
        assert!(config.gomodernize.include_tests());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(
            file,
            r#"[gomodernize]
go_version = "1.21"
exclude_folders = ["gen"]
include_tests = false
ignore = ["GMZ-M001"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        let section = &config.gomodernize;
        assert_eq!(section.go_version, Some(GoVersion::new(1, 21)));
        assert_eq!(section.exclude_folders.as_deref(), Some(&["gen".to_owned()][..]));
        assert!(!section.include_tests());
        assert!(section.ignores("GMZ-M001"));
        assert!(!section.ignores("GMZ-M002"));
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cmd").join("tool");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, "[gomodernize]\ngo_version = \"go1.20\"").unwrap();

        let go_file = nested.join("main.go");
        std::fs::write(&go_file, "package main\n").unwrap();

        let config = Config::load_from_path(&go_file);
        assert_eq!(config.gomodernize.go_version, Some(GoVersion::new(1, 20)));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[gomodernize]\ngo_version = \"soon\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert!(config.gomodernize.go_version.is_none());
        assert!(config.config_file_path.is_none());
    }
}
