//! Pre-order traversal of the syntax tree.
//!
//! Implementors override `visit_stmt` / `visit_expr` and call the matching
//! `walk_*` function to continue into children. Not calling it prunes the
//! subtree.

use super::ast::{Block, Decl, Expr, File, GenDecl, Spec, Stmt};

/// A syntax tree visitor. The default methods visit every child.
pub trait Visitor<'a> {
    /// Visits a statement.
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visits an expression.
    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr);
    }
}

/// Visits every function body and package-level initializer of `file`.
pub fn walk_file<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, file: &'a File) {
    for decl in &file.decls {
        match decl {
            Decl::Func(func) => {
                if let Some(body) = &func.body {
                    walk_block(visitor, body);
                }
            }
            Decl::Gen(gen) => walk_gen_decl(visitor, gen),
        }
    }
}

/// Visits the statements of a block.
pub fn walk_block<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, block: &'a Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

fn walk_gen_decl<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, gen: &'a GenDecl) {
    for spec in &gen.specs {
        if let Spec::Value(value) = spec {
            for expr in &value.values {
                visitor.visit_expr(expr);
            }
        }
    }
}

fn walk_opt_stmt<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stmt: Option<&'a Stmt>) {
    if let Some(stmt) = stmt {
        visitor.visit_stmt(stmt);
    }
}

fn walk_opt_expr<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, expr: Option<&'a Expr>) {
    if let Some(expr) = expr {
        visitor.visit_expr(expr);
    }
}

/// Visits the children of a statement.
pub fn walk_stmt<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stmt: &'a Stmt) {
    match stmt {
        Stmt::Decl(gen) => walk_gen_decl(visitor, gen),
        Stmt::Labeled { stmt, .. } => visitor.visit_stmt(stmt),
        Stmt::Expr(expr) => visitor.visit_expr(expr),
        Stmt::Send { chan, value, .. } => {
            visitor.visit_expr(chan);
            visitor.visit_expr(value);
        }
        Stmt::IncDec { x, .. } => visitor.visit_expr(x),
        Stmt::Assign(assign) => {
            for expr in assign.lhs.iter().chain(&assign.rhs) {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Go { call, .. } | Stmt::Defer { call, .. } => visitor.visit_expr(call),
        Stmt::Return { results, .. } => {
            for expr in results {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Block(block) => walk_block(visitor, block),
        Stmt::If(stmt) => {
            walk_opt_stmt(visitor, stmt.init.as_deref());
            visitor.visit_expr(&stmt.cond);
            walk_block(visitor, &stmt.body);
            walk_opt_stmt(visitor, stmt.else_branch.as_deref());
        }
        Stmt::Switch(stmt) => {
            walk_opt_stmt(visitor, stmt.init.as_deref());
            walk_opt_stmt(visitor, stmt.tag.as_deref());
            for clause in &stmt.clauses {
                for expr in &clause.exprs {
                    visitor.visit_expr(expr);
                }
                for stmt in &clause.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::Select(stmt) => {
            for clause in &stmt.clauses {
                walk_opt_stmt(visitor, clause.comm.as_deref());
                for stmt in &clause.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::For(stmt) => {
            walk_opt_stmt(visitor, stmt.init.as_deref());
            walk_opt_expr(visitor, stmt.cond.as_ref());
            walk_opt_stmt(visitor, stmt.post.as_deref());
            walk_block(visitor, &stmt.body);
        }
        Stmt::Range(stmt) => {
            walk_opt_expr(visitor, stmt.key.as_ref());
            walk_opt_expr(visitor, stmt.value.as_ref());
            visitor.visit_expr(&stmt.x);
            walk_block(visitor, &stmt.body);
        }
        Stmt::Branch { .. } | Stmt::Empty(_) => {}
    }
}

/// Visits the children of an expression. Function literal bodies are
/// entered; signatures are not.
pub fn walk_expr<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, expr: &'a Expr) {
    match expr {
        Expr::Ident(_)
        | Expr::BasicLit(_)
        | Expr::FuncType(_)
        | Expr::StructType { .. }
        | Expr::InterfaceType { .. } => {}
        Expr::CompositeLit { ty, elts, .. } => {
            walk_opt_expr(visitor, ty.as_deref());
            for elt in elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::FuncLit { body, .. } => walk_block(visitor, body),
        Expr::Paren { x, .. } | Expr::Star { x, .. } | Expr::Unary { x, .. } => {
            visitor.visit_expr(x);
        }
        Expr::Selector(sel) => visitor.visit_expr(&sel.x),
        Expr::Index { x, indices, .. } => {
            visitor.visit_expr(x);
            for index in indices {
                visitor.visit_expr(index);
            }
        }
        Expr::Slice {
            x, low, high, max, ..
        } => {
            visitor.visit_expr(x);
            walk_opt_expr(visitor, low.as_deref());
            walk_opt_expr(visitor, high.as_deref());
            walk_opt_expr(visitor, max.as_deref());
        }
        Expr::TypeAssert { x, ty, .. } => {
            visitor.visit_expr(x);
            walk_opt_expr(visitor, ty.as_deref());
        }
        Expr::Call(call) => {
            visitor.visit_expr(&call.fun);
            for arg in &call.args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary(bin) => {
            visitor.visit_expr(&bin.x);
            visitor.visit_expr(&bin.y);
        }
        Expr::KeyValue { key, value, .. } => {
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        Expr::ArrayType { len, elt, .. } => {
            walk_opt_expr(visitor, len.as_deref());
            visitor.visit_expr(elt);
        }
        Expr::MapType { key, value, .. } => {
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        Expr::ChanType { value, .. } => visitor.visit_expr(value),
        Expr::Ellipsis { elt, .. } => walk_opt_expr(visitor, elt.as_deref()),
    }
}
