//! Structural equality of syntax trees.
//!
//! Two nodes are equal when they have the same shape, operators,
//! identifier names and literal text. Source positions are ignored.

use super::ast::{
    AssignStmt, BasicLit, Block, CallExpr, CaseClause, CommClause, Decl, Expr, Field, FieldList,
    FuncType, GenDecl, Ident, Spec, Stmt,
};

/// Returns true if `a` and `b` are structurally identical.
pub fn equal_syntax(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Ident(a), Expr::Ident(b)) => ident(a, b),
        (Expr::BasicLit(a), Expr::BasicLit(b)) => lit(a, b),
        (
            Expr::CompositeLit { ty: ta, elts: ea, .. },
            Expr::CompositeLit { ty: tb, elts: eb, .. },
        ) => opt_expr(ta.as_deref(), tb.as_deref()) && exprs(ea, eb),
        (Expr::FuncLit { ty: ta, body: ba, .. }, Expr::FuncLit { ty: tb, body: bb, .. }) => {
            func_type(ta, tb) && block(ba, bb)
        }
        (Expr::Paren { x: a, .. }, Expr::Paren { x: b, .. })
        | (Expr::Star { x: a, .. }, Expr::Star { x: b, .. }) => equal_syntax(a, b),
        (Expr::Selector(a), Expr::Selector(b)) => ident(&a.sel, &b.sel) && equal_syntax(&a.x, &b.x),
        (
            Expr::Index { x: xa, indices: ia, .. },
            Expr::Index { x: xb, indices: ib, .. },
        ) => equal_syntax(xa, xb) && exprs(ia, ib),
        (
            Expr::Slice {
                x: xa,
                low: la,
                high: ha,
                max: ma,
                slice3: sa,
                ..
            },
            Expr::Slice {
                x: xb,
                low: lb,
                high: hb,
                max: mb,
                slice3: sb,
                ..
            },
        ) => {
            sa == sb
                && equal_syntax(xa, xb)
                && opt_expr(la.as_deref(), lb.as_deref())
                && opt_expr(ha.as_deref(), hb.as_deref())
                && opt_expr(ma.as_deref(), mb.as_deref())
        }
        (Expr::TypeAssert { x: xa, ty: ta, .. }, Expr::TypeAssert { x: xb, ty: tb, .. }) => {
            equal_syntax(xa, xb) && opt_expr(ta.as_deref(), tb.as_deref())
        }
        (Expr::Call(a), Expr::Call(b)) => call(a, b),
        (Expr::Unary { op: oa, x: xa, .. }, Expr::Unary { op: ob, x: xb, .. }) => {
            oa == ob && equal_syntax(xa, xb)
        }
        (Expr::Binary(a), Expr::Binary(b)) => {
            a.op == b.op && equal_syntax(&a.x, &b.x) && equal_syntax(&a.y, &b.y)
        }
        (
            Expr::KeyValue { key: ka, value: va, .. },
            Expr::KeyValue { key: kb, value: vb, .. },
        )
        | (
            Expr::MapType { key: ka, value: va, .. },
            Expr::MapType { key: kb, value: vb, .. },
        ) => equal_syntax(ka, kb) && equal_syntax(va, vb),
        (Expr::ArrayType { len: la, elt: ea, .. }, Expr::ArrayType { len: lb, elt: eb, .. }) => {
            opt_expr(la.as_deref(), lb.as_deref()) && equal_syntax(ea, eb)
        }
        (
            Expr::ChanType { dir: da, value: va, .. },
            Expr::ChanType { dir: db, value: vb, .. },
        ) => da == db && equal_syntax(va, vb),
        (Expr::FuncType(a), Expr::FuncType(b)) => func_type(a, b),
        (Expr::StructType { fields: a, .. }, Expr::StructType { fields: b, .. })
        | (Expr::InterfaceType { methods: a, .. }, Expr::InterfaceType { methods: b, .. }) => {
            field_list(a, b)
        }
        (Expr::Ellipsis { elt: a, .. }, Expr::Ellipsis { elt: b, .. }) => {
            opt_expr(a.as_deref(), b.as_deref())
        }
        _ => false,
    }
}

/// Statement counterpart of [`equal_syntax`].
pub fn equal_stmt(a: &Stmt, b: &Stmt) -> bool {
    match (a, b) {
        (Stmt::Decl(a), Stmt::Decl(b)) => gen_decl(a, b),
        (
            Stmt::Labeled { label: la, stmt: sa, .. },
            Stmt::Labeled { label: lb, stmt: sb, .. },
        ) => ident(la, lb) && equal_stmt(sa, sb),
        (Stmt::Expr(a), Stmt::Expr(b)) => equal_syntax(a, b),
        (
            Stmt::Send { chan: ca, value: va, .. },
            Stmt::Send { chan: cb, value: vb, .. },
        ) => equal_syntax(ca, cb) && equal_syntax(va, vb),
        (Stmt::IncDec { x: xa, inc: ia, .. }, Stmt::IncDec { x: xb, inc: ib, .. }) => {
            ia == ib && equal_syntax(xa, xb)
        }
        (Stmt::Assign(a), Stmt::Assign(b)) => assign(a, b),
        (Stmt::Go { call: a, .. }, Stmt::Go { call: b, .. })
        | (Stmt::Defer { call: a, .. }, Stmt::Defer { call: b, .. }) => equal_syntax(a, b),
        (Stmt::Return { results: a, .. }, Stmt::Return { results: b, .. }) => exprs(a, b),
        (
            Stmt::Branch { kind: ka, label: la, .. },
            Stmt::Branch { kind: kb, label: lb, .. },
        ) => {
            ka == kb
                && match (la, lb) {
                    (Some(a), Some(b)) => ident(a, b),
                    (None, None) => true,
                    _ => false,
                }
        }
        (Stmt::Block(a), Stmt::Block(b)) => block(a, b),
        (Stmt::If(a), Stmt::If(b)) => {
            opt_stmt(a.init.as_deref(), b.init.as_deref())
                && equal_syntax(&a.cond, &b.cond)
                && block(&a.body, &b.body)
                && opt_stmt(a.else_branch.as_deref(), b.else_branch.as_deref())
        }
        (Stmt::Switch(a), Stmt::Switch(b)) => {
            opt_stmt(a.init.as_deref(), b.init.as_deref())
                && opt_stmt(a.tag.as_deref(), b.tag.as_deref())
                && all(&a.clauses, &b.clauses, case_clause)
        }
        (Stmt::Select(a), Stmt::Select(b)) => all(&a.clauses, &b.clauses, comm_clause),
        (Stmt::For(a), Stmt::For(b)) => {
            opt_stmt(a.init.as_deref(), b.init.as_deref())
                && opt_expr(a.cond.as_ref(), b.cond.as_ref())
                && opt_stmt(a.post.as_deref(), b.post.as_deref())
                && block(&a.body, &b.body)
        }
        (Stmt::Range(a), Stmt::Range(b)) => {
            a.op == b.op
                && opt_expr(a.key.as_ref(), b.key.as_ref())
                && opt_expr(a.value.as_ref(), b.value.as_ref())
                && equal_syntax(&a.x, &b.x)
                && block(&a.body, &b.body)
        }
        (Stmt::Empty(_), Stmt::Empty(_)) => true,
        _ => false,
    }
}

/// Declaration counterpart of [`equal_syntax`].
pub fn equal_decl(a: &Decl, b: &Decl) -> bool {
    match (a, b) {
        (Decl::Func(a), Decl::Func(b)) => {
            ident(&a.name, &b.name)
                && opt_fields(a.recv.as_ref(), b.recv.as_ref())
                && opt_fields(a.type_params.as_ref(), b.type_params.as_ref())
                && func_type(&a.ty, &b.ty)
                && match (&a.body, &b.body) {
                    (Some(a), Some(b)) => block(a, b),
                    (None, None) => true,
                    _ => false,
                }
        }
        (Decl::Gen(a), Decl::Gen(b)) => gen_decl(a, b),
        _ => false,
    }
}

fn ident(a: &Ident, b: &Ident) -> bool {
    a.name == b.name
}

fn lit(a: &BasicLit, b: &BasicLit) -> bool {
    a.kind == b.kind && a.value == b.value
}

fn call(a: &CallExpr, b: &CallExpr) -> bool {
    a.ellipsis == b.ellipsis && equal_syntax(&a.fun, &b.fun) && exprs(&a.args, &b.args)
}

fn all<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| eq(a, b))
}

fn exprs(a: &[Expr], b: &[Expr]) -> bool {
    all(a, b, equal_syntax)
}

fn opt_expr(a: Option<&Expr>, b: Option<&Expr>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => equal_syntax(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn opt_stmt(a: Option<&Stmt>, b: Option<&Stmt>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => equal_stmt(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn block(a: &Block, b: &Block) -> bool {
    all(&a.stmts, &b.stmts, equal_stmt)
}

fn assign(a: &AssignStmt, b: &AssignStmt) -> bool {
    a.op == b.op && exprs(&a.lhs, &b.lhs) && exprs(&a.rhs, &b.rhs)
}

fn func_type(a: &FuncType, b: &FuncType) -> bool {
    field_list(&a.params, &b.params) && opt_fields(a.results.as_ref(), b.results.as_ref())
}

fn field_list(a: &FieldList, b: &FieldList) -> bool {
    all(&a.fields, &b.fields, field)
}

fn opt_fields(a: Option<&FieldList>, b: Option<&FieldList>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => field_list(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn field(a: &Field, b: &Field) -> bool {
    all(&a.names, &b.names, ident)
        && equal_syntax(&a.ty, &b.ty)
        && match (&a.tag, &b.tag) {
            (Some(a), Some(b)) => lit(a, b),
            (None, None) => true,
            _ => false,
        }
}

fn gen_decl(a: &GenDecl, b: &GenDecl) -> bool {
    a.kind == b.kind && all(&a.specs, &b.specs, spec)
}

fn spec(a: &Spec, b: &Spec) -> bool {
    match (a, b) {
        (Spec::Value(a), Spec::Value(b)) => {
            all(&a.names, &b.names, ident)
                && opt_expr(a.ty.as_ref(), b.ty.as_ref())
                && exprs(&a.values, &b.values)
        }
        (Spec::Type(a), Spec::Type(b)) => {
            a.alias == b.alias && ident(&a.name, &b.name) && equal_syntax(&a.ty, &b.ty)
        }
        _ => false,
    }
}

fn case_clause(a: &CaseClause, b: &CaseClause) -> bool {
    exprs(&a.exprs, &b.exprs) && all(&a.body, &b.body, equal_stmt)
}

fn comm_clause(a: &CommClause, b: &CommClause) -> bool {
    opt_stmt(a.comm.as_deref(), b.comm.as_deref()) && all(&a.body, &b.body, equal_stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_expr;

    fn eq(a: &str, b: &str) -> bool {
        equal_syntax(&parse_expr(a).unwrap(), &parse_expr(b).unwrap())
    }

    #[test]
    fn test_positions_and_spacing_are_ignored() {
        assert!(eq("strings.TrimPrefix(s, pre)", "strings.TrimPrefix( s,pre )"));
        assert!(eq("a[i].b(c...)", "a [ i ] . b ( c ... )"));
    }

    #[test]
    fn test_names_and_literals_matter() {
        assert!(!eq("f(s, pre)", "f(s, pfx)"));
        assert!(!eq("f(\"a\")", "f(`a`)"));
        assert!(!eq("f(1)", "f(1.0)"));
        assert!(!eq("f(x...)", "f(x)"));
    }

    #[test]
    fn test_operators_matter() {
        assert!(eq("a + b*c", "a+b*c"));
        assert!(!eq("a + b", "a - b"));
        assert!(!eq("-x", "^x"));
    }

    #[test]
    fn test_parentheses_are_distinct_nodes() {
        assert!(!eq("(s)", "s"));
        assert!(eq("(s)", "( s )"));
    }

    #[test]
    fn test_composite_and_function_literals() {
        assert!(eq("[]string{\"a\", \"b\"}", "[]string{\"a\",\"b\"}"));
        assert!(!eq("[]string{\"a\"}", "[]string{\"b\"}"));
        assert!(eq(
            "func(x int) int { return x + 1 }",
            "func(x int) int {\n\treturn x + 1\n}"
        ));
        assert!(!eq(
            "func(x int) int { return x + 1 }",
            "func(x int) int { return x + 2 }"
        ));
    }
}
