//! Resolution of package-qualified calls into `strings` and `bytes`.

use super::ast::{CallExpr, Expr, Ident};
use super::scope::{ObjectKind, ScopeGraph};
use std::fmt;

/// Standard-library package whose prefix helpers the rules understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Package `strings`.
    Strings,
    /// Package `bytes`.
    Bytes,
}

impl Domain {
    /// Both domains, in the order they are reported.
    pub const ALL: [Domain; 2] = [Domain::Strings, Domain::Bytes];

    /// Import path of the package.
    pub fn path(self) -> &'static str {
        match self {
            Domain::Strings => "strings",
            Domain::Bytes => "bytes",
        }
    }

    /// Maps an import path to a domain.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "strings" => Some(Domain::Strings),
            "bytes" => Some(Domain::Bytes),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A call whose callee resolved to a function of a known domain.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Package the function belongs to.
    pub domain: Domain,
    /// Package identifier as written at the call, e.g. `strings` or an alias.
    pub qualifier: &'a Ident,
    /// Selected function name.
    pub function: &'a Ident,
    /// The call expression itself.
    pub call: &'a CallExpr,
}

impl<'a> CallSite<'a> {
    /// Returns true if the call targets `domain.name`.
    pub fn is(&self, domain: Domain, name: &str) -> bool {
        self.domain == domain && self.function.name == name
    }

    /// Returns true if the call targets `name` in either domain.
    pub fn is_named(&self, name: &str) -> bool {
        self.function.name == name
    }

    /// The two arguments of a two-argument call.
    pub fn two_args(&self) -> Option<(&'a Expr, &'a Expr)> {
        match self.call.args.as_slice() {
            [first, second] if !self.call.ellipsis => Some((first, second)),
            _ => None,
        }
    }
}

/// Resolves `call` to a [`CallSite`] when its callee is `X.F` and `X`
/// denotes an import of `strings` or `bytes` at the call's position.
///
/// A local declaration that shadows the package name defeats resolution.
pub fn resolve_call<'a>(call: &'a CallExpr, scopes: &ScopeGraph) -> Option<CallSite<'a>> {
    let Expr::Selector(sel) = call.fun.as_ref() else {
        return None;
    };
    let Expr::Ident(qualifier) = sel.x.as_ref() else {
        return None;
    };
    let ObjectKind::PkgName { path } = &scopes.resolve(qualifier)?.kind else {
        return None;
    };
    let domain = Domain::from_path(path)?;
    Some(CallSite {
        domain,
        qualifier,
        function: &sel.sel,
        call,
    })
}

/// Convenience wrapper: resolves an expression that must be a call.
pub fn resolve_expr<'a>(expr: &'a Expr, scopes: &ScopeGraph) -> Option<CallSite<'a>> {
    resolve_call(expr.as_call()?, scopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{Decl, Stmt};
    use crate::syntax::parse_file;

    fn first_call_site(source: &str) -> Option<(Domain, String, String)> {
        let file = parse_file(source).unwrap();
        let scopes = ScopeGraph::build(&file);
        let Decl::Func(func) = file.decls.last().unwrap() else {
            panic!("expected func");
        };
        let body = func.body.as_ref().unwrap();
        let Stmt::Expr(expr) = body.stmts.last().unwrap() else {
            panic!("expected expression statement");
        };
        resolve_expr(expr, &scopes).map(|site| {
            (
                site.domain,
                site.qualifier.name.clone(),
                site.function.name.clone(),
            )
        })
    }

    #[test]
    fn test_resolves_plain_import() {
        let src = "package p\nimport \"strings\"\nfunc f(s string) {\n\tstrings.HasPrefix(s, \"a\")\n}\n";
        assert_eq!(
            first_call_site(src),
            Some((Domain::Strings, "strings".to_owned(), "HasPrefix".to_owned()))
        );
    }

    #[test]
    fn test_resolves_aliased_import() {
        let src = "package p\nimport b \"bytes\"\nfunc f(s []byte) {\n\tb.TrimPrefix(s, nil)\n}\n";
        assert_eq!(
            first_call_site(src),
            Some((Domain::Bytes, "b".to_owned(), "TrimPrefix".to_owned()))
        );
    }

    #[test]
    fn test_shadowed_package_does_not_resolve() {
        let src = "package p\nimport \"strings\"\ntype T struct{}\nfunc (T) HasPrefix(a, b string) bool { return false }\nfunc f(s string) {\n\tstrings := T{}\n\tstrings.HasPrefix(s, \"a\")\n}\n";
        assert_eq!(first_call_site(src), None);
    }

    #[test]
    fn test_other_packages_do_not_resolve() {
        let src = "package p\nimport \"path\"\nfunc f(s string) {\n\tpath.Base(s)\n}\n";
        assert_eq!(first_call_site(src), None);
    }

    #[test]
    fn test_two_args() {
        let src = "package p\nimport \"strings\"\nfunc f(s string) {\n\tstrings.HasPrefix(s, \"a\")\n}\n";
        let file = parse_file(src).unwrap();
        let scopes = ScopeGraph::build(&file);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func");
        };
        let Stmt::Expr(expr) = &func.body.as_ref().unwrap().stmts[0] else {
            panic!("expected expression statement");
        };
        let site = resolve_expr(expr, &scopes).unwrap();
        assert!(site.is(Domain::Strings, "HasPrefix"));
        assert!(site.two_args().is_some());
    }
}
