use super::{fresh_name, CAT_CUTPREFIX};
use crate::fix::{EditBuilder, SuggestedFix, TextEdit};
use crate::rules::ids;
use crate::rules::{Context, Diagnostic, Rule, RuleMetadata};
use crate::syntax::ast::{AssignOp, BinaryOp, Expr, Ident, IfStmt, Stmt};
use crate::syntax::callee::{resolve_expr, Domain};
use crate::syntax::visitor::{walk_block, walk_expr, Visitor};
use crate::syntax::{equal_syntax, ScopeGraph};
use crate::version::CUT_PREFIX_SINCE;
use ruff_text_size::{Ranged, TextRange, TextSize};

const META_CUTPREFIX: RuleMetadata = RuleMetadata {
    id: ids::RULE_ID_CUTPREFIX,
    category: CAT_CUTPREFIX,
};

const MESSAGE: &str = "if statement can be modernized using strings.CutPrefix";
const FIX_LABEL: &str = "Replace if statement with CutPrefix";
const DEFAULT_NAME: &str = "after";
const OK_NAME: &str = "ok";

/// Rewrites prefix tests followed by a trim of the same prefix into a
/// single `CutPrefix` call.
///
/// Guarded trim:
///
/// ```go
/// if strings.HasPrefix(s, pre) { use(strings.TrimPrefix(s, pre)) }
/// // becomes
/// if after, ok := strings.CutPrefix(s, pre); ok { use(after) }
/// ```
///
/// Trim then compare:
///
/// ```go
/// if v := strings.TrimPrefix(s, pre); v != s { use(v) }
/// // becomes
/// if v, ok := strings.CutPrefix(s, pre); ok { use(v) }
/// ```
pub(super) struct CutPrefixRule;

impl Rule for CutPrefixRule {
    fn name(&self) -> &'static str {
        "CutPrefixRule"
    }

    fn metadata(&self) -> RuleMetadata {
        META_CUTPREFIX
    }

    fn is_active(&self, context: &Context<'_>) -> bool {
        if !Domain::ALL
            .iter()
            .any(|domain| context.file.imports_path(domain.path()))
        {
            tracing::debug!(
                "{}: {} skipped, neither strings nor bytes is imported",
                context.filename.display(),
                self.code()
            );
            return false;
        }
        match context.go_version {
            Some(version) if !version.at_least(CUT_PREFIX_SINCE) => {
                tracing::debug!(
                    "{}: {} skipped, {version} predates {CUT_PREFIX_SINCE}",
                    context.filename.display(),
                    self.code()
                );
                false
            }
            _ => true,
        }
    }

    fn enter_stmt(&mut self, stmt: &Stmt, context: &Context<'_>) -> Option<Vec<Diagnostic>> {
        let Stmt::If(if_stmt) = stmt else {
            return None;
        };
        tracing::trace!("candidate if statement at {:?}", if_stmt.range);
        let rewrite =
            guarded_trim(if_stmt, context).or_else(|| trim_then_compare(if_stmt, context))?;
        report(rewrite, context).map(|diagnostic| vec![diagnostic])
    }
}

/// A match: the range to highlight, the statement it rewrites and the
/// edits that fix it.
struct Rewrite {
    range: TextRange,
    stmt: TextRange,
    edits: Vec<TextEdit>,
}

/// `if D.HasPrefix(s, pre) { ... D.TrimPrefix(s, pre) ... }`
fn guarded_trim(stmt: &IfStmt, context: &Context<'_>) -> Option<Rewrite> {
    let scopes = context.scopes;
    let guard = resolve_expr(&stmt.cond, scopes)?;
    if !guard.is_named("HasPrefix") {
        return None;
    }
    let (s, pre) = guard.two_args()?;
    if shadows_ok(stmt, scopes) {
        return None;
    }

    let mut builder = EditBuilder::new();
    let name = match stmt.init.as_deref() {
        None => fresh_name(
            DEFAULT_NAME,
            scopes.scope_of(stmt.range),
            stmt.range.start(),
            scopes,
        ),
        Some(init) => {
            // The declaration moves into the guard, so only an identical
            // trim can be folded; anything else would need two initializers.
            let target = reusable_init(init, guard.domain, s, pre, scopes)?;
            builder = builder.delete(TextRange::new(init.start(), stmt.cond.start()));
            target.name.clone()
        }
    };

    let mut finder = TrimFinder {
        domain: guard.domain,
        s,
        pre,
        scopes,
        found: Vec::new(),
    };
    walk_block(&mut finder, &stmt.body);
    if finder.found.is_empty() {
        return None;
    }

    builder = builder
        .insert(guard.call.fun.start(), format!("{name}, ok := "))
        .replace(guard.function.range, "CutPrefix")
        .insert(guard.call.range.end(), "; ok");
    for occurrence in finder.found {
        builder = builder.replace(occurrence, name.as_str());
    }

    Some(Rewrite {
        range: guard.call.range,
        stmt: stmt.range,
        edits: builder.build(),
    })
}

/// Target of an initializer `v := D.TrimPrefix(s, pre)` that repeats the
/// guard's arguments.
fn reusable_init<'a>(
    init: &'a Stmt,
    domain: Domain,
    s: &Expr,
    pre: &Expr,
    scopes: &ScopeGraph,
) -> Option<&'a Ident> {
    let Stmt::Assign(assign) = init else {
        return None;
    };
    if assign.op != AssignOp::Define {
        return None;
    }
    let (target, value) = assign.as_simple()?;
    let target = target.as_ident()?;
    let trim = resolve_expr(value, scopes)?;
    if !trim.is(domain, "TrimPrefix") {
        return None;
    }
    let (s2, pre2) = trim.two_args()?;
    (equal_syntax(s, s2) && equal_syntax(pre, pre2)).then_some(target)
}

/// `if v := D.TrimPrefix(s, pre); v != s { ... }`, in either operand order.
///
/// With `=` instead of `:=` the outer `v` is assigned inside the body, so
/// after the rewrite it only holds the trimmed value when the prefix was
/// present. When it is absent `v` keeps its previous value rather than a
/// copy of `s`.
fn trim_then_compare(stmt: &IfStmt, context: &Context<'_>) -> Option<Rewrite> {
    let scopes = context.scopes;
    let Stmt::Assign(assign) = stmt.init.as_deref()? else {
        return None;
    };
    let (target, value) = assign.as_simple()?;
    let var = target.as_ident()?;
    let trim = resolve_expr(value, scopes)?;
    if !trim.is_named("TrimPrefix") {
        return None;
    }
    let (s, _) = trim.two_args()?;

    let Expr::Binary(cmp) = &stmt.cond else {
        return None;
    };
    if cmp.op != BinaryOp::Neq {
        return None;
    }
    let compares_input = (equal_syntax(target, &cmp.x) && equal_syntax(s, &cmp.y))
        || (equal_syntax(target, &cmp.y) && equal_syntax(s, &cmp.x));
    if !compares_input || shadows_ok(stmt, scopes) {
        return None;
    }

    let mut builder = EditBuilder::new();
    let name = if assign.op == AssignOp::Assign {
        // The outer variable must still receive the trimmed value.
        let fresh = fresh_name(
            &var.name,
            scopes.scope_of(stmt.range),
            stmt.range.start(),
            scopes,
        );
        let (pos, indent) = match stmt.body.stmts.first() {
            Some(first) => (first.start(), indentation(context, first.start())),
            None => (stmt.body.rbrace(), ""),
        };
        builder = builder.insert(pos, format!("{} = {fresh}\n{indent}", var.name));
        fresh
    } else {
        var.name.clone()
    };

    let edits = builder
        .replace(
            TextRange::new(assign.range.start(), trim.call.fun.end()),
            format!("{name}, ok := {}.CutPrefix", trim.qualifier.name),
        )
        .replace(stmt.cond.range(), "ok")
        .build();

    Some(Rewrite {
        range: TextRange::new(assign.range.start(), stmt.cond.end()),
        stmt: stmt.range,
        edits,
    })
}

/// Leading whitespace of the line holding `pos`, or nothing when `pos` is
/// not the first token on its line.
fn indentation<'a>(context: &Context<'a>, pos: TextSize) -> &'a str {
    let line_start = context
        .line_index
        .line_start(context.line_index.line_index(pos));
    let prefix = &context.source[line_start..pos.to_usize()];
    if prefix.bytes().all(|b| b == b' ' || b == b'\t') {
        prefix
    } else {
        ""
    }
}

/// Reports whether the `ok` declared by the fix would hide a visible `ok`
/// that the statement still reads.
fn shadows_ok(stmt: &IfStmt, scopes: &ScopeGraph) -> bool {
    let visible = scopes
        .scope_of(stmt.range)
        .is_some_and(|scope| scopes.is_visible(scope, OK_NAME, stmt.range.start()));
    if !visible {
        return false;
    }
    let mut finder = NameFinder {
        name: OK_NAME,
        found: false,
    };
    finder.visit_expr(&stmt.cond);
    walk_block(&mut finder, &stmt.body);
    if finder.found {
        tracing::debug!("skipping if statement at {:?}: it reads an outer ok", stmt.range);
    }
    finder.found
}

/// Looks for a reference to `name`.
struct NameFinder<'n> {
    name: &'n str,
    found: bool,
}

impl<'a> Visitor<'a> for NameFinder<'_> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if self.found {
            return;
        }
        if let Expr::Ident(ident) = expr {
            self.found = ident.name == self.name;
            return;
        }
        walk_expr(self, expr);
    }
}

/// Collects trims of the guarded value, without descending into a match.
struct TrimFinder<'b> {
    domain: Domain,
    s: &'b Expr,
    pre: &'b Expr,
    scopes: &'b ScopeGraph,
    found: Vec<TextRange>,
}

impl<'a> Visitor<'a> for TrimFinder<'_> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Some(site) = resolve_expr(expr, self.scopes) {
            if site.is(self.domain, "TrimPrefix") {
                if let Some((s, pre)) = site.two_args() {
                    if equal_syntax(self.s, s) && equal_syntax(self.pre, pre) {
                        self.found.push(site.call.range);
                        return;
                    }
                }
            }
        }
        walk_expr(self, expr);
    }
}

/// Packages a match into a diagnostic with a single fix. Edits that fail
/// validation indicate a bug in the matcher; the match is dropped.
fn report(rewrite: Rewrite, context: &Context<'_>) -> Option<Diagnostic> {
    let fix = match SuggestedFix::new(FIX_LABEL, rewrite.edits) {
        Ok(fix) => fix,
        Err(err) => {
            tracing::error!(
                "{}: dropping {} match at {:?}: {err}",
                context.filename.display(),
                META_CUTPREFIX.id,
                rewrite.range
            );
            return None;
        }
    };
    let (line, col) = context.line_index.line_col(rewrite.range.start());
    Some(Diagnostic {
        rule_id: META_CUTPREFIX.id.to_owned(),
        category: META_CUTPREFIX.category.to_owned(),
        message: MESSAGE.to_owned(),
        file: context.filename.clone(),
        line,
        col,
        range: rewrite.range,
        stmt_range: rewrite.stmt,
        fixes: vec![fix],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::Decl;
    use crate::syntax::parse_file;
    use crate::utils::LineIndex;
    use crate::version::GoVersion;
    use std::path::PathBuf;

    fn run(source: &str, go_version: Option<GoVersion>) -> Vec<Diagnostic> {
        let file = parse_file(source).unwrap();
        let scopes = ScopeGraph::build(&file);
        let context = Context {
            filename: PathBuf::from("a.go"),
            line_index: LineIndex::new(source),
            source,
            file: &file,
            scopes: &scopes,
            go_version,
        };
        let mut rule = CutPrefixRule;
        if !rule.is_active(&context) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for decl in &file.decls {
            if let Decl::Func(func) = decl {
                for stmt in &func.body.as_ref().unwrap().stmts {
                    out.extend(rule.enter_stmt(stmt, &context).unwrap_or_default());
                }
            }
        }
        out
    }

    fn fixed(source: &str) -> String {
        let diagnostics = run(source, None);
        assert_eq!(diagnostics.len(), 1, "expected one diagnostic");
        diagnostics[0].fix().unwrap().apply(source).unwrap()
    }

    #[test]
    fn test_guarded_trim() {
        let src = "package p\n\nimport \"strings\"\n\nfunc f(s, pre string) {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(strings.TrimPrefix(s, pre))\n\t}\n}\n";
        let out = fixed(src);
        assert!(out.contains("\tif after, ok := strings.CutPrefix(s, pre); ok {\n\t\tprintln(after)\n"));
    }

    #[test]
    fn test_diagnostic_position_and_metadata() {
        let src = "package p\n\nimport \"strings\"\n\nfunc f(s, pre string) {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(strings.TrimPrefix(s, pre))\n\t}\n}\n";
        let diagnostics = run(src, None);
        let d = &diagnostics[0];
        assert_eq!((d.line, d.col), (6, 5));
        assert_eq!(d.rule_id, "GMZ-M001");
        assert_eq!(d.category, "stringscutprefix");
        assert_eq!(d.message, MESSAGE);
        assert_eq!(&src[d.range], "strings.HasPrefix(s, pre)");
        assert_eq!(d.fixes.len(), 1);
        assert_eq!(d.fixes[0].label, FIX_LABEL);
    }

    #[test]
    fn test_guard_without_trim_is_ignored() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(s)\n\t}\n}\n";
        assert!(run(src, None).is_empty());
    }

    #[test]
    fn test_reused_initializer_is_folded() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) {\n\tif rest := strings.TrimPrefix(s, pre); strings.HasPrefix(s, pre) {\n\t\tprintln(rest, strings.TrimPrefix(s, pre))\n\t}\n}\n";
        let out = fixed(src);
        assert!(out.contains("\tif rest, ok := strings.CutPrefix(s, pre); ok {\n\t\tprintln(rest, rest)\n"));
    }

    #[test]
    fn test_unrelated_initializer_blocks_guarded_trim() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) {\n\tif n := len(s); strings.HasPrefix(s, pre) {\n\t\tprintln(n, strings.TrimPrefix(s, pre))\n\t}\n}\n";
        assert!(run(src, None).is_empty());
    }

    #[test]
    fn test_trim_then_compare_either_order() {
        for cond in ["v != s", "s != v"] {
            let src = format!("package p\nimport \"bytes\"\nfunc f(s, pre []byte) {{\n\tif v := bytes.TrimPrefix(s, pre); {cond} {{\n\t\tprintln(v)\n\t}}\n}}\n");
            let out = fixed(&src);
            assert!(out.contains("\tif v, ok := bytes.CutPrefix(s, pre); ok {\n"), "{out}");
        }
    }

    #[test]
    fn test_compare_against_prefix_is_ignored() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) {\n\tif v := strings.TrimPrefix(s, pre); v != pre {\n\t\tprintln(v)\n\t}\n}\n";
        assert!(run(src, None).is_empty());
    }

    #[test]
    fn test_reassignment_into_empty_body() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) string {\n\tv := \"\"\n\tif v = strings.TrimPrefix(s, pre); v != s {}\n\treturn v\n}\n";
        let out = fixed(src);
        assert!(out.contains("\tif v0, ok := strings.CutPrefix(s, pre); ok {v = v0\n}\n"), "{out}");
    }

    #[test]
    fn test_reassignment_keeps_old_value_without_prefix() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) string {\n\tv := \"old\"\n\tif v = strings.TrimPrefix(s, pre); v != s {\n\t\tprintln(v)\n\t}\n\treturn v\n}\n";
        let out = fixed(src);
        assert!(
            out.contains("\tif v0, ok := strings.CutPrefix(s, pre); ok {\n\t\tv = v0\n\t\tprintln(v)\n\t}\n\treturn v\n"),
            "{out}"
        );
        // No assignment to v is left outside the body.
        assert!(!out.contains("\tv = s"));
    }

    #[test]
    fn test_outer_ok_read_in_body_is_skipped() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string, ok bool) {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(ok, strings.TrimPrefix(s, pre))\n\t}\n\tif v := strings.TrimPrefix(s, pre); v != s {\n\t\tprintln(v, ok)\n\t}\n}\n";
        assert!(run(src, None).is_empty());
    }

    #[test]
    fn test_outer_ok_not_read_is_shadowed() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string, ok bool) bool {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(strings.TrimPrefix(s, pre))\n\t}\n\treturn ok\n}\n";
        assert!(fixed(src).contains("if after, ok := strings.CutPrefix(s, pre); ok {"));
    }

    #[test]
    fn test_aliased_qualifier_is_kept() {
        let src = "package p\nimport str \"strings\"\nfunc f(s, pre string) {\n\tif v := str.TrimPrefix(s, pre); v != s {\n\t\tprintln(v)\n\t}\n}\n";
        assert!(fixed(src).contains("if v, ok := str.CutPrefix(s, pre); ok {"));
    }

    #[test]
    fn test_inactive_below_go1_20() {
        let src = "package p\nimport \"strings\"\nfunc f(s, pre string) {\n\tif strings.HasPrefix(s, pre) {\n\t\tprintln(strings.TrimPrefix(s, pre))\n\t}\n}\n";
        assert!(run(src, Some(GoVersion::new(1, 19))).is_empty());
        assert_eq!(run(src, Some(GoVersion::new(1, 20))).len(), 1);
    }

    #[test]
    fn test_inactive_without_import() {
        let src = "package p\nimport _ \"strings\"\nfunc f(s string) {\n\tif s != \"\" {\n\t}\n}\n";
        assert!(run(src, None).is_empty());
    }
}
