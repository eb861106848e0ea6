//! In-process tests for `run_with_args_to`.
#![allow(clippy::unwrap_used)]

use gomodernize::entry_point::{run_with_args_to, EXIT_DIAGNOSTICS, EXIT_ERROR};
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = r##"package lib

import "bytes"

func Body(b []byte) []byte {
	if rest := bytes.TrimPrefix(b, []byte("#!")); !bytes.Equal(b, rest) {
		return rest
	}
	if bytes.HasPrefix(b, []byte("//")) {
		return bytes.TrimPrefix(b, []byte("//"))
	}
	return b
}
"##;

fn run(args: &[&str]) -> (i32, String) {
    let mut out = Vec::new();
    let code = run_with_args_to(args.iter().map(|a| (*a).to_owned()).collect(), &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_help() {
    let (code, out) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("CutPrefix"));
    assert!(out.contains(".gomodernize.toml"));
}

#[test]
fn test_quiet_summary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lib.go"), SAMPLE).unwrap();
    let path = dir.path().to_str().unwrap();

    let (code, out) = run(&[path, "--quiet", "--fail-on-diagnostics"]);
    assert_eq!(code, EXIT_DIAGNOSTICS);
    assert!(out.contains("[SUMMARY] 1 diagnostics in 1 files, 0 parse errors"));
    assert!(out.contains("lib.go:9:5"));
}

#[test]
fn test_parse_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.go"), "package bad\nfunc {").unwrap();
    let path = dir.path().to_str().unwrap();

    let (code, out) = run(&[path, "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["analysis_summary"]["parse_errors_count"], 1);
}

#[test]
fn test_exclude_flag() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("gen")).unwrap();
    fs::write(dir.path().join("gen").join("lib.go"), SAMPLE).unwrap();
    let path = dir.path().to_str().unwrap();

    let (code, _) = run(&[path, "--exclude", "gen", "--fail-on-diagnostics"]);
    assert_eq!(code, 0);
}

#[test]
fn test_conflicting_verbosity_is_usage_error() {
    let (code, _) = run(&["--quiet", "--verbose"]);
    assert_eq!(code, EXIT_ERROR);
}
