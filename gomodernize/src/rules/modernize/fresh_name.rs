use crate::syntax::{ScopeGraph, ScopeId};
use ruff_text_size::TextSize;

/// Suffixes `0` through `9` are tried before giving up.
const MAX_ATTEMPTS: usize = 10;

/// Picks a name for a new binding that does not capture anything visible
/// from `scope` at `pos`.
///
/// `desired` is returned when it is free. Otherwise `desired0` through
/// `desired9` are tried in order; if all of them are taken the last one is
/// returned anyway. Without a scope there is nothing to collide with.
#[must_use]
pub fn fresh_name(desired: &str, scope: Option<ScopeId>, pos: TextSize, graph: &ScopeGraph) -> String {
    let Some(scope) = scope else {
        return desired.to_owned();
    };
    if !graph.is_visible(scope, desired, pos) {
        return desired.to_owned();
    }

    let mut candidate = desired.to_owned();
    for i in 0..MAX_ATTEMPTS {
        candidate = format!("{desired}{i}");
        if !graph.is_visible(scope, &candidate, pos) {
            return candidate;
        }
    }
    tracing::debug!("no free name derived from {desired:?}, using {candidate:?}");
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{Decl, Stmt};
    use crate::syntax::parse_file;

    /// Builds the graph and returns the scope and start of the last
    /// statement of the last function, which must be an `if`.
    fn pick(source: &str, desired: &str) -> String {
        let file = parse_file(source).unwrap();
        let graph = ScopeGraph::build(&file);
        let Some(Decl::Func(func)) = file.decls.last() else {
            panic!("expected func");
        };
        let Some(Stmt::If(stmt)) = func.body.as_ref().unwrap().stmts.last() else {
            panic!("expected if");
        };
        fresh_name(desired, graph.scope_of(stmt.range), stmt.range.start(), &graph)
    }

    #[test]
    fn test_free_name_is_kept() {
        let src = "package p\nfunc f(ok bool) {\n\tif ok {\n\t}\n}\n";
        assert_eq!(pick(src, "after"), "after");
    }

    #[test]
    fn test_visible_local_gets_suffix() {
        let src = "package p\nfunc f(ok bool) {\n\tafter := 1\n\t_ = after\n\tif ok {\n\t}\n}\n";
        assert_eq!(pick(src, "after"), "after0");
    }

    #[test]
    fn test_later_declaration_is_not_visible() {
        let src = "package p\nfunc f(ok bool) {\n\tif ok {\n\t\tafter := 1\n\t\t_ = after\n\t}\n}\n";
        assert_eq!(pick(src, "after"), "after");
    }

    #[test]
    fn test_skips_taken_suffixes() {
        let src = "package p\nvar after, after0, after1 int\nfunc f(ok bool) {\n\tif ok {\n\t}\n}\n";
        assert_eq!(pick(src, "after"), "after2");
    }

    #[test]
    fn test_all_suffixes_taken_falls_back_to_last() {
        let mut names = vec!["after".to_owned()];
        names.extend((0..10).map(|i| format!("after{i}")));
        let src = format!(
            "package p\nvar {} int\nfunc f(ok bool) {{\n\tif ok {{\n\t}}\n}}\n",
            names.join(", ")
        );
        assert_eq!(pick(&src, "after"), "after9");
    }

    #[test]
    fn test_without_scope_returns_desired() {
        let graph = ScopeGraph::build(&parse_file("package p\nvar after int\n").unwrap());
        assert_eq!(fresh_name("after", None, TextSize::new(0), &graph), "after");
    }
}
