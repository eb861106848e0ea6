//! Tests for applying fixes across a file.
#![allow(clippy::unwrap_used)]

use anyhow::Result;
use gomodernize::analyzer::GoModernize;
use gomodernize::commands::{apply_fixes, fix_until_stable, run_fix, select_fixes};
use std::fs;
use tempfile::TempDir;

const NESTED: &str = r#"package p

import "strings"

func f(s, pre string) {
	if strings.HasPrefix(s, pre) {
		if strings.HasPrefix(s, pre) {
			println(strings.TrimPrefix(s, pre))
		}
	}
}
"#;

const NESTED_DISTINCT: &str = r#"package p

import "strings"

func f(s, pre, t, q string) {
	if strings.HasPrefix(s, pre) {
		if strings.HasPrefix(t, q) {
			println(strings.TrimPrefix(t, q), strings.TrimPrefix(s, pre))
		}
	}
}
"#;

const TWO_SITES: &str = r#"package p

import "strings"

func f(s, t string) {
	if strings.HasPrefix(s, "a") {
		println(strings.TrimPrefix(s, "a"))
	}
	if v := strings.TrimPrefix(t, "b"); v != t {
		println(v)
	}
}
"#;

#[test]
fn test_overlapping_fixes_keep_the_first() {
    let result = GoModernize::default().analyze_code(NESTED, "a.go".into());
    assert_eq!(result.diagnostics.len(), 2);

    let (fixes, skipped) = select_fixes(&result.diagnostics);
    assert_eq!(fixes.len(), 1);
    assert_eq!(skipped, 1);

    let fixed = apply_fixes(NESTED, &fixes).unwrap();
    assert!(fixed.contains("\tif after, ok := strings.CutPrefix(s, pre); ok {\n\t\tif strings.HasPrefix(s, pre) {\n\t\t\tprintln(after)"));
}

#[test]
fn test_independent_fixes_apply_together() {
    let result = GoModernize::default().analyze_code(TWO_SITES, "a.go".into());
    let (fixes, skipped) = select_fixes(&result.diagnostics);
    assert_eq!((fixes.len(), skipped), (2, 0));

    let fixed = apply_fixes(TWO_SITES, &fixes).unwrap();
    assert!(fixed.contains("if after, ok := strings.CutPrefix(s, \"a\"); ok {"));
    assert!(fixed.contains("if v, ok := strings.CutPrefix(t, \"b\"); ok {"));
    let again = GoModernize::default().analyze_code(&fixed, "a.go".into());
    assert!(again.diagnostics.is_empty());
}

#[test]
fn test_run_fix_writes_files() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("a.go");
    fs::write(&path, TWO_SITES)?;

    let analyzer = GoModernize::default();
    let result = analyzer.analyze_paths(&[dir.path().to_path_buf()])?;
    let mut out = Vec::new();
    let report = run_fix(&result, false, &mut out)?;

    assert_eq!(report.applied(), 2);
    assert!(report.failures.is_empty());
    assert!(out.is_empty());
    let written = fs::read_to_string(&path)?;
    assert!(!written.contains("TrimPrefix"));
    assert!(analyzer
        .analyze_paths(&[dir.path().to_path_buf()])?
        .diagnostics
        .is_empty());
    Ok(())
}

#[test]
fn test_run_fix_dry_run_leaves_files() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested.go");
    fs::write(&path, NESTED)?;

    let result = GoModernize::default().analyze_paths(&[path.clone()])?;
    let mut out = Vec::new();
    let report = run_fix(&result, true, &mut out)?;

    assert_eq!((report.applied(), report.skipped()), (1, 1));
    assert_eq!(fs::read_to_string(&path)?, NESTED);
    let printed = String::from_utf8(out)?;
    assert!(printed.contains("nested.go"));
    assert!(printed.contains("strings.CutPrefix(s, pre)"));
    Ok(())
}

#[test]
fn test_nested_statements_are_not_fixed_together() {
    let result = GoModernize::default().analyze_code(NESTED_DISTINCT, "a.go".into());
    assert_eq!(result.diagnostics.len(), 2);

    let (fixes, skipped) = select_fixes(&result.diagnostics);
    assert_eq!((fixes.len(), skipped), (1, 1));

    let fixed = apply_fixes(NESTED_DISTINCT, &fixes).unwrap();
    assert!(!fixed.contains("println(after, after)"));
    assert!(fixed.contains("println(strings.TrimPrefix(t, q), after)"));
}

#[test]
fn test_fix_until_stable_rewrites_nested_statements() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("a.go");
    fs::write(&path, NESTED_DISTINCT)?;
    let paths = [dir.path().to_path_buf()];

    let analyzer = GoModernize::default();
    let initial = analyzer.analyze_paths(&paths)?;
    let mut out = Vec::new();
    let (report, remaining) = fix_until_stable(&analyzer, &paths, &initial, &mut out)?;

    assert_eq!(report.applied(), 2);
    assert!(remaining.diagnostics.is_empty());
    let written = fs::read_to_string(&path)?;
    assert!(!written.contains("TrimPrefix"), "{written}");
    assert!(written.contains("if after, ok := strings.CutPrefix(s, pre); ok {"));
    assert!(written.contains("if after0, ok := strings.CutPrefix(t, q); ok {"));
    assert!(written.contains("println(after0, after)"));
    Ok(())
}
