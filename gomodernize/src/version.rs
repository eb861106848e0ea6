//! Go language versions and how a file's effective version is determined.

use crate::constants::{BUILD_GO_VERSION_RE, GO_DIRECTIVE_RE, GO_MOD_FILENAME};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A Go language version such as `go1.20`. Patch levels and pre-release
/// suffixes are ignored; they never gate language or library features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct GoVersion {
    /// Major version, always 1 in practice.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

/// First release providing `strings.CutPrefix` and `bytes.CutPrefix`.
pub const CUT_PREFIX_SINCE: GoVersion = GoVersion::new(1, 20);

/// Error for strings that are not Go versions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Go version {0:?}, expected e.g. \"1.21\" or \"go1.21\"")]
pub struct InvalidVersion(pub String);

impl GoVersion {
    /// Creates a version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses `1.21`, `go1.21`, `1.21.3` or `go1.22rc1`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix("go").unwrap_or(text);
        let (major, rest) = split_number(text)?;
        let minor = match rest.strip_prefix('.') {
            Some(rest) => split_number(rest)?.0,
            None if rest.is_empty() => 0,
            None => return None,
        };
        Some(Self::new(major, minor))
    }

    /// Returns true if this version is at least `other`.
    pub fn at_least(self, other: GoVersion) -> bool {
        self >= other
    }
}

fn split_number(text: &str) -> Option<(u32, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let number = text[..end].parse().ok()?;
    Some((number, &text[end..]))
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go{}.{}", self.major, self.minor)
    }
}

impl FromStr for GoVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidVersion(s.to_owned()))
    }
}

impl TryFrom<String> for GoVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Version named by `//go:build` constraints, e.g. `go1.21 && linux`.
///
/// Negated terms (`!go1.21`) are ignored. When several versions are named
/// the highest wins.
pub fn from_build_constraints(constraints: &[String]) -> Option<GoVersion> {
    constraints
        .iter()
        .flat_map(|line| BUILD_GO_VERSION_RE().captures_iter(line))
        .filter(|caps| caps.get(1).map(|neg| neg.as_str()) != Some("!"))
        .filter_map(|caps| {
            let major = caps.get(2)?.as_str().parse().ok()?;
            let minor = caps.get(3)?.as_str().parse().ok()?;
            Some(GoVersion::new(major, minor))
        })
        .max()
}

/// Version from the `go` directive of a `go.mod` file.
pub fn from_go_mod(content: &str) -> Option<GoVersion> {
    GO_DIRECTIVE_RE()
        .captures(content)
        .and_then(|caps| GoVersion::parse(caps.get(1)?.as_str()))
}

/// Walks up from `path` to the nearest `go.mod` and returns its version.
pub fn find_go_mod_version(path: &Path) -> Option<GoVersion> {
    let mut current = path.to_path_buf();
    if current.is_file() {
        current.pop();
    }
    loop {
        let candidate = current.join(GO_MOD_FILENAME);
        if candidate.is_file() {
            return match fs::read_to_string(&candidate) {
                Ok(content) => from_go_mod(&content),
                Err(err) => {
                    tracing::warn!("failed to read {}: {err}", candidate.display());
                    None
                }
            };
        }
        if !current.pop() {
            return None;
        }
    }
}
