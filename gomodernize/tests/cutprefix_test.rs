//! End-to-end tests for the CutPrefix modernization on Go snippets.
#![allow(clippy::unwrap_used)]

use gomodernize::analyzer::{AnalysisResult, GoModernize};
use gomodernize::fix::TextEdit;
use gomodernize::rules::Diagnostic;
use std::path::PathBuf;

fn analyze(source: &str) -> AnalysisResult {
    GoModernize::default().analyze_code(source, PathBuf::from("input.go"))
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let result = analyze(source);
    assert!(
        result.parse_errors.is_empty(),
        "unexpected parse errors: {:?}",
        result.parse_errors
    );
    result.diagnostics
}

/// Applies the single expected fix and returns the rewritten source.
fn fix_once(source: &str) -> String {
    let found = diagnostics(source);
    assert_eq!(found.len(), 1, "expected exactly one diagnostic: {found:?}");
    found[0].fix().unwrap().apply_verified(source).unwrap()
}

const GUARDED: &str = r#"package p

import "strings"

func f(s, pre string) {
	if strings.HasPrefix(s, pre) {
		x := strings.TrimPrefix(s, pre)
		println(x)
	}
}
"#;

const FRESH_DECL: &str = r#"package p

import "strings"

func f(s, pre string) {
	if v := strings.TrimPrefix(s, pre); v != s {
		println(v)
	}
}
"#;

const REASSIGN: &str = r#"package p

import "strings"

func f(s, pre string) string {
	v := s
	if v = strings.TrimPrefix(s, pre); s != v {
		println(v)
	}
	return v
}
"#;

#[test]
fn test_guarded_trim_is_rewritten() {
    let fixed = fix_once(GUARDED);
    assert_eq!(
        fixed,
        r#"package p

import "strings"

func f(s, pre string) {
	if after, ok := strings.CutPrefix(s, pre); ok {
		x := after
		println(x)
	}
}
"#
    );
}

#[test]
fn test_guarded_trim_reports_condition_span() {
    let found = diagnostics(GUARDED);
    let d = &found[0];
    assert_eq!(&GUARDED[d.range], "strings.HasPrefix(s, pre)");
    assert_eq!((d.line, d.col), (6, 5));
    assert_eq!(d.category, "stringscutprefix");
    assert_eq!(
        d.message,
        "if statement can be modernized using strings.CutPrefix"
    );
    assert_eq!(d.fixes.len(), 1);
    assert_eq!(d.fixes[0].label, "Replace if statement with CutPrefix");
}

#[test]
fn test_different_arguments_are_not_reported() {
    for trim in [
        "strings.TrimPrefix(s, \"x\")",
        "strings.TrimPrefix(t, pre)",
        "strings.TrimSuffix(s, pre)",
    ] {
        let src = format!(
            "package p\n\nimport \"strings\"\n\nfunc f(s, t, pre string) {{\n\tif strings.HasPrefix(s, pre) {{\n\t\tprintln({trim})\n\t}}\n}}\n"
        );
        assert!(diagnostics(&src).is_empty(), "{trim} should not match");
    }
}

#[test]
fn test_every_occurrence_is_replaced() {
    let src = r#"package p

import "strings"

func f(s, pre string) []string {
	var out []string
	if strings.HasPrefix(s, pre) {
		out = append(out, strings.TrimPrefix(s, pre))
		for i := 0; i < 2; i++ {
			out = append(out, strings.ToUpper(strings.TrimPrefix(s, pre)))
		}
		func() { println(strings.TrimPrefix(s, pre)) }()
	}
	return out
}
"#;
    let fixed = fix_once(src);
    assert!(!fixed.contains("TrimPrefix"), "{fixed}");
    assert!(fixed.contains("out = append(out, after)"));
    assert!(fixed.contains("strings.ToUpper(after)"));
    assert!(fixed.contains("func() { println(after) }()"));
}

#[test]
fn test_visible_after_gets_numbered() {
    let src = r#"package p

import "strings"

func f(s, pre string) string {
	after := ""
	if strings.HasPrefix(s, pre) {
		after = strings.TrimPrefix(s, pre)
	}
	return after
}
"#;
    let fixed = fix_once(src);
    assert!(fixed.contains("if after0, ok := strings.CutPrefix(s, pre); ok {"));
    assert!(fixed.contains("after = after0"));
}

#[test]
fn test_all_numbered_names_taken_uses_last() {
    let names: Vec<String> = std::iter::once("after".to_owned())
        .chain((0..10).map(|i| format!("after{i}")))
        .collect();
    let src = format!(
        "package p\n\nimport \"strings\"\n\nvar {} string\n\nfunc f(s, pre string) {{\n\tif strings.HasPrefix(s, pre) {{\n\t\tprintln(strings.TrimPrefix(s, pre))\n\t}}\n}}\n",
        names.join(", ")
    );
    let fixed = fix_once(&src);
    assert!(fixed.contains("if after9, ok := strings.CutPrefix(s, pre); ok {"));
}

#[test]
fn test_reassignment_introduces_fresh_name() {
    let fixed = fix_once(REASSIGN);
    assert_eq!(
        fixed,
        r#"package p

import "strings"

func f(s, pre string) string {
	v := s
	if v0, ok := strings.CutPrefix(s, pre); ok {
		v = v0
		println(v)
	}
	return v
}
"#
    );
}

#[test]
fn test_fresh_declaration_is_rewritten_in_place() {
    let fixed = fix_once(FRESH_DECL);
    assert!(fixed.contains("\tif v, ok := strings.CutPrefix(s, pre); ok {\n\t\tprintln(v)\n"));

    let found = diagnostics(FRESH_DECL);
    assert_eq!(
        &FRESH_DECL[found[0].range],
        "v := strings.TrimPrefix(s, pre); v != s"
    );
}

#[test]
fn test_rewritten_output_is_clean() {
    for src in [GUARDED, FRESH_DECL, REASSIGN] {
        let fixed = fix_once(src);
        assert!(diagnostics(&fixed).is_empty(), "still reported:\n{fixed}");
    }
}

#[test]
fn test_edits_never_overlap_and_output_parses() {
    let combined = r#"package p

import (
	"bytes"
	"strings"
)

func f(s, pre string, b, bp []byte) {
	if strings.HasPrefix(s, pre) {
		println(strings.TrimPrefix(s, pre), strings.TrimPrefix(s, pre))
	}
	if rest := bytes.TrimPrefix(b, bp); !bytes.Equal(rest, b) {
		println(rest)
	}
	if rest := bytes.TrimPrefix(b, bp); rest != nil {
		println(rest)
	}
	x := ""
	if x = strings.TrimPrefix(s, pre); x != s {
	}
	println(x)
}
"#;
    let found = diagnostics(combined);
    assert_eq!(found.len(), 2);
    for d in &found {
        let edits: &[TextEdit] = &d.fixes[0].edits;
        for (i, a) in edits.iter().enumerate() {
            for b in &edits[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
        d.fixes[0].apply_verified(combined).unwrap();
    }
}

#[test]
fn test_bytes_and_aliased_imports() {
    let src = r#"package p

import (
	"bytes"
	str "strings"
)

func f(s, pre string, b, bp []byte) {
	if bytes.HasPrefix(b, bp) {
		println(bytes.TrimPrefix(b, bp))
	}
	if v := str.TrimPrefix(s, pre); v != s {
		println(v)
	}
}
"#;
    let found = diagnostics(src);
    assert_eq!(found.len(), 2);
    let first = found[0].fix().unwrap().apply(src).unwrap();
    assert!(first.contains("if after, ok := bytes.CutPrefix(b, bp); ok {"));
    let second = found[1].fix().unwrap().apply(src).unwrap();
    assert!(second.contains("if v, ok := str.CutPrefix(s, pre); ok {"));
}

#[test]
fn test_shadowed_package_name_is_not_resolved() {
    let src = r#"package p

import "strings"

type prefixer struct{}

func (prefixer) HasPrefix(s, pre string) bool    { return false }
func (prefixer) TrimPrefix(s, pre string) string { return s }

func f(s, pre string) {
	_ = strings.ToLower(s)
	strings := prefixer{}
	if strings.HasPrefix(s, pre) {
		println(strings.TrimPrefix(s, pre))
	}
}
"#;
    assert!(diagnostics(src).is_empty());
}

#[test]
fn test_nested_and_else_if_statements_are_visited() {
    let src = r#"package p

import "strings"

var handler = func(s string) {
	if strings.HasPrefix(s, "a") {
		println(strings.TrimPrefix(s, "a"))
	}
}

func f(s string) {
	if s == "" {
		return
	} else if strings.HasPrefix(s, "b") {
		println(strings.TrimPrefix(s, "b"))
	}
}
"#;
    let found = diagnostics(src);
    assert_eq!(found.len(), 2);
    let fixed = found[1].fix().unwrap().apply_verified(src).unwrap();
    assert!(fixed.contains("} else if after, ok := strings.CutPrefix(s, \"b\"); ok {"));
}

#[test]
fn test_old_build_constraint_disables_rule() {
    let src = format!("//go:build go1.19\n\n{GUARDED}");
    assert!(diagnostics(&src).is_empty());
    let src = format!("//go:build go1.21 && linux\n\n{GUARDED}");
    assert_eq!(diagnostics(&src).len(), 1);
}
