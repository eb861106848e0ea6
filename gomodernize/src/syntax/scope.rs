//! Lexical scopes of a parsed file.
//!
//! The graph follows Go's scoping rules: universe, package and file scopes
//! at the top, then one scope per function, block, `if`, `for`, `switch`,
//! case clause and select clause. Local objects carry the offset from which
//! they are visible, so lookups can answer "what does `name` mean at this
//! position" the way a type checker would.

use super::ast::{
    AssignOp, Block, Decl, Expr, FieldList, File, FuncType, GenDecl, GenKind, Ident, Spec, Stmt,
};
use ruff_text_size::{TextRange, TextSize};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Index of a scope inside a [`ScopeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Kind of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Predeclared identifiers.
    Universe,
    /// Top-level declarations of the package.
    Package,
    /// Imports of one file.
    File,
    /// Function or function literal, including its parameters.
    Func,
    /// Explicit block or statement body.
    Block,
    /// `if` header.
    If,
    /// `for` header.
    For,
    /// `switch` header.
    Switch,
    /// `case`/`default` clause of a switch.
    Case,
    /// `case`/`default` clause of a select.
    Comm,
}

/// What kind of entity a name denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// Imported package.
    PkgName {
        /// Import path.
        path: String,
    },
    /// Variable, parameter or result.
    Var,
    /// Constant.
    Const,
    /// Type name.
    TypeName,
    /// Top-level function.
    Func,
    /// Predeclared identifier.
    Builtin,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Declared name.
    pub name: String,
    /// Kind of entity.
    pub kind: ObjectKind,
    /// Range of the declaring identifier; empty for predeclared names.
    pub decl: TextRange,
    /// Offset from which the object is visible. `None` means the whole scope.
    pub scope_pos: Option<TextSize>,
}

impl Object {
    /// Returns true if the object is visible at `pos`.
    pub fn visible_at(&self, pos: TextSize) -> bool {
        match self.scope_pos {
            Some(scope_pos) => scope_pos <= pos,
            None => true,
        }
    }
}

/// One scope.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Enclosing scope; `None` only for the universe.
    pub parent: Option<ScopeId>,
    /// Scope kind.
    pub kind: ScopeKind,
    /// Source range covered by the scope.
    pub range: TextRange,
    /// Nested scopes in source order.
    pub children: SmallVec<[ScopeId; 4]>,
    objects: FxHashMap<String, Object>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind, range: TextRange) -> Self {
        Self {
            parent,
            kind,
            range,
            children: SmallVec::new(),
            objects: FxHashMap::default(),
        }
    }

    /// Looks up `name` in this scope only, ignoring positions.
    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    /// Number of objects declared directly in this scope.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing is declared directly in this scope.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

const PREDECLARED: &[&str] = &[
    // types
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr",
    // constants and zero value
    "true", "false", "iota", "nil",
    // functions
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Immutable scope tree for one file.
#[derive(Debug, Clone)]
pub struct ScopeGraph {
    scopes: Vec<Scope>,
    /// Scope created by a node, keyed by the node's range.
    node_scopes: FxHashMap<TextRange, ScopeId>,
    file_scope: ScopeId,
}

impl ScopeGraph {
    /// Builds the scope graph of `file`.
    pub fn build(file: &File) -> Self {
        let mut builder = ScopeBuilder::new(file.range);
        builder.declare_package(file);
        builder.declare_imports(file);
        for decl in &file.decls {
            builder.walk_decl(decl);
        }
        builder.finish()
    }

    /// The universe scope.
    pub fn universe(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The package scope.
    pub fn package(&self) -> ScopeId {
        ScopeId(1)
    }

    /// The file scope holding import names.
    pub fn file_scope(&self) -> ScopeId {
        self.file_scope
    }

    /// Returns the scope with the given id.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Scope created by the node spanning `range`: an `if`, `for`,
    /// `switch`, case clause, block, or a function's type.
    pub fn scope_of(&self, range: TextRange) -> Option<ScopeId> {
        self.node_scopes.get(&range).copied()
    }

    /// Innermost scope containing `offset`.
    pub fn innermost_at(&self, offset: TextSize) -> ScopeId {
        let mut current = self.file_scope;
        'descend: loop {
            for &child in &self.scope(current).children {
                if self.scope(child).range.contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Resolves `name` starting at `scope` and walking outwards, considering
    /// only objects visible at `pos`.
    pub fn lookup_parent(
        &self,
        scope: ScopeId,
        name: &str,
        pos: TextSize,
    ) -> Option<(ScopeId, &Object)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(obj) = scope.lookup(name) {
                if obj.visible_at(pos) {
                    return Some((id, obj));
                }
            }
            current = scope.parent;
        }
        None
    }

    /// Returns true if `name` resolves to anything from `scope` at `pos`.
    pub fn is_visible(&self, scope: ScopeId, name: &str, pos: TextSize) -> bool {
        self.lookup_parent(scope, name, pos).is_some()
    }

    /// Resolves an identifier use at its own position.
    pub fn resolve(&self, ident: &Ident) -> Option<&Object> {
        let pos = ident.range.start();
        self.lookup_parent(self.innermost_at(pos), &ident.name, pos)
            .map(|(_, obj)| obj)
    }
}

struct ScopeBuilder {
    scopes: Vec<Scope>,
    node_scopes: FxHashMap<TextRange, ScopeId>,
    current: ScopeId,
}

impl ScopeBuilder {
    fn new(file_range: TextRange) -> Self {
        let mut universe = Scope::new(None, ScopeKind::Universe, file_range);
        for name in PREDECLARED {
            universe.objects.insert(
                (*name).to_owned(),
                Object {
                    name: (*name).to_owned(),
                    kind: ObjectKind::Builtin,
                    decl: TextRange::default(),
                    scope_pos: None,
                },
            );
        }
        let mut builder = Self {
            scopes: vec![universe],
            node_scopes: FxHashMap::default(),
            current: ScopeId(0),
        };
        builder.enter_scope(ScopeKind::Package, file_range, None);
        builder.enter_scope(ScopeKind::File, file_range, None);
        builder
    }

    fn finish(self) -> ScopeGraph {
        ScopeGraph {
            scopes: self.scopes,
            node_scopes: self.node_scopes,
            file_scope: ScopeId(2),
        }
    }

    /// Pushes a new child of the current scope.
    fn enter_scope(&mut self, kind: ScopeKind, range: TextRange, node: Option<TextRange>) {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(self.current), kind, range));
        self.scopes[self.current.0].children.push(id);
        if let Some(node) = node {
            self.node_scopes.insert(node, id);
        }
        self.current = id;
    }

    /// Returns to the parent of the current scope.
    fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    fn declare_in(&mut self, scope: ScopeId, ident: &Ident, kind: ObjectKind, pos: Option<TextSize>) {
        if ident.is_blank() {
            return;
        }
        self.scopes[scope.0]
            .objects
            .entry(ident.name.clone())
            .or_insert_with(|| Object {
                name: ident.name.clone(),
                kind,
                decl: ident.range,
                scope_pos: pos,
            });
    }

    fn declare(&mut self, ident: &Ident, kind: ObjectKind, pos: TextSize) {
        self.declare_in(self.current, ident, kind, Some(pos));
    }

    fn declare_package(&mut self, file: &File) {
        let package = ScopeId(1);
        for decl in &file.decls {
            match decl {
                // Methods live in their receiver type's method set.
                Decl::Func(func) if func.recv.is_none() && func.name.name != "init" => {
                    self.declare_in(package, &func.name, ObjectKind::Func, None);
                }
                Decl::Func(_) => {}
                Decl::Gen(decl) => {
                    for spec in &decl.specs {
                        match spec {
                            Spec::Value(value) => {
                                let kind = if decl.kind == GenKind::Const {
                                    ObjectKind::Const
                                } else {
                                    ObjectKind::Var
                                };
                                for name in &value.names {
                                    self.declare_in(package, name, kind.clone(), None);
                                }
                            }
                            Spec::Type(ty) => {
                                self.declare_in(package, &ty.name, ObjectKind::TypeName, None);
                            }
                        }
                    }
                }
            }
        }
    }

    fn declare_imports(&mut self, file: &File) {
        for spec in &file.imports {
            let Some(local) = spec.local_name() else {
                continue;
            };
            let ident = Ident {
                name: local.to_owned(),
                range: spec.name.as_ref().map_or(spec.range, |name| name.range),
            };
            self.declare_in(
                self.current,
                &ident,
                ObjectKind::PkgName {
                    path: spec.path.clone(),
                },
                None,
            );
        }
    }

    fn walk_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Func(func) => {
                let range = func.range;
                self.enter_scope(ScopeKind::Func, range, Some(func.ty.range));
                let pos = func
                    .body
                    .as_ref()
                    .map_or(func.ty.range.end(), |body| body.range.start());
                if let Some(recv) = &func.recv {
                    self.declare_fields(recv, pos);
                }
                if let Some(type_params) = &func.type_params {
                    for name in type_params.names() {
                        self.declare(name, ObjectKind::TypeName, type_params.range.start());
                    }
                    self.walk_fields(type_params);
                }
                self.walk_signature(&func.ty, pos);
                if let Some(body) = &func.body {
                    self.walk_stmts(&body.stmts);
                }
                self.exit_scope();
            }
            Decl::Gen(decl) => {
                for spec in &decl.specs {
                    match spec {
                        Spec::Value(value) => {
                            if let Some(ty) = &value.ty {
                                self.walk_expr(ty);
                            }
                            self.walk_exprs(&value.values);
                        }
                        Spec::Type(ty) => self.walk_expr(&ty.ty),
                    }
                }
            }
        }
    }

    fn walk_signature(&mut self, ty: &FuncType, pos: TextSize) {
        self.declare_fields(&ty.params, pos);
        self.walk_fields(&ty.params);
        if let Some(results) = &ty.results {
            self.declare_fields(results, pos);
            self.walk_fields(results);
        }
    }

    fn declare_fields(&mut self, fields: &FieldList, pos: TextSize) {
        for name in fields.names() {
            self.declare(name, ObjectKind::Var, pos);
        }
    }

    fn walk_fields(&mut self, fields: &FieldList) {
        for field in &fields.fields {
            self.walk_expr(&field.ty);
        }
    }

    fn walk_local_decl(&mut self, decl: &GenDecl) {
        for spec in &decl.specs {
            match spec {
                Spec::Value(value) => {
                    if let Some(ty) = &value.ty {
                        self.walk_expr(ty);
                    }
                    self.walk_exprs(&value.values);
                    let kind = if decl.kind == GenKind::Const {
                        ObjectKind::Const
                    } else {
                        ObjectKind::Var
                    };
                    for name in &value.names {
                        self.declare(name, kind.clone(), value.range.end());
                    }
                }
                Spec::Type(ty) => {
                    self.declare(&ty.name, ObjectKind::TypeName, ty.name.range.start());
                    self.walk_expr(&ty.ty);
                }
            }
        }
    }

    fn walk_block(&mut self, block: &Block) {
        self.enter_scope(ScopeKind::Block, block.range, Some(block.range));
        self.walk_stmts(&block.stmts);
        self.exit_scope();
    }

    fn walk_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.walk_local_decl(decl),
            Stmt::Labeled { stmt, .. } => self.walk_stmt(stmt),
            Stmt::Expr(expr) => self.walk_expr(expr),
            Stmt::Send { chan, value, .. } => {
                self.walk_expr(chan);
                self.walk_expr(value);
            }
            Stmt::IncDec { x, .. } => self.walk_expr(x),
            Stmt::Assign(assign) => {
                self.walk_exprs(&assign.rhs);
                if assign.op == AssignOp::Define {
                    for target in &assign.lhs {
                        if let Expr::Ident(ident) = target {
                            self.declare(ident, ObjectKind::Var, assign.range.end());
                        }
                    }
                } else {
                    self.walk_exprs(&assign.lhs);
                }
            }
            Stmt::Go { call, .. } | Stmt::Defer { call, .. } => self.walk_expr(call),
            Stmt::Return { results, .. } => self.walk_exprs(results),
            Stmt::Branch { .. } | Stmt::Empty(_) => {}
            Stmt::Block(block) => self.walk_block(block),
            Stmt::If(stmt) => {
                self.enter_scope(ScopeKind::If, stmt.range, Some(stmt.range));
                if let Some(init) = &stmt.init {
                    self.walk_stmt(init);
                }
                self.walk_expr(&stmt.cond);
                self.walk_block(&stmt.body);
                if let Some(else_branch) = &stmt.else_branch {
                    self.walk_stmt(else_branch);
                }
                self.exit_scope();
            }
            Stmt::Switch(stmt) => {
                self.enter_scope(ScopeKind::Switch, stmt.range, Some(stmt.range));
                if let Some(init) = &stmt.init {
                    self.walk_stmt(init);
                }
                // `v := x.(type)` declares `v` per clause, not in the header.
                let type_switch_var = match stmt.tag.as_deref() {
                    Some(Stmt::Assign(assign)) if assign.op == AssignOp::Define => {
                        self.walk_exprs(&assign.rhs);
                        assign.lhs.first().and_then(Expr::as_ident)
                    }
                    Some(tag) => {
                        self.walk_stmt(tag);
                        None
                    }
                    None => None,
                };
                for clause in &stmt.clauses {
                    self.enter_scope(ScopeKind::Case, clause.range, Some(clause.range));
                    self.walk_exprs(&clause.exprs);
                    if let Some(var) = type_switch_var {
                        self.declare(var, ObjectKind::Var, clause.range.start());
                    }
                    self.walk_stmts(&clause.body);
                    self.exit_scope();
                }
                self.exit_scope();
            }
            Stmt::Select(stmt) => {
                for clause in &stmt.clauses {
                    self.enter_scope(ScopeKind::Comm, clause.range, Some(clause.range));
                    if let Some(comm) = &clause.comm {
                        self.walk_stmt(comm);
                    }
                    self.walk_stmts(&clause.body);
                    self.exit_scope();
                }
            }
            Stmt::For(stmt) => {
                self.enter_scope(ScopeKind::For, stmt.range, Some(stmt.range));
                if let Some(init) = &stmt.init {
                    self.walk_stmt(init);
                }
                if let Some(cond) = &stmt.cond {
                    self.walk_expr(cond);
                }
                if let Some(post) = &stmt.post {
                    self.walk_stmt(post);
                }
                self.walk_block(&stmt.body);
                self.exit_scope();
            }
            Stmt::Range(stmt) => {
                self.enter_scope(ScopeKind::For, stmt.range, Some(stmt.range));
                self.walk_expr(&stmt.x);
                let pos = stmt.body.range.start();
                for target in [&stmt.key, &stmt.value].into_iter().flatten() {
                    match (stmt.op, target) {
                        (Some(AssignOp::Define), Expr::Ident(ident)) => {
                            self.declare(ident, ObjectKind::Var, pos);
                        }
                        _ => self.walk_expr(target),
                    }
                }
                self.walk_block(&stmt.body);
                self.exit_scope();
            }
        }
    }

    fn walk_exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.walk_expr(expr);
        }
    }

    /// Only function literals open scopes inside expressions.
    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(_) | Expr::BasicLit(_) => {}
            Expr::FuncLit { ty, body, range } => {
                self.enter_scope(ScopeKind::Func, *range, Some(ty.range));
                self.walk_signature(ty, body.range.start());
                self.walk_stmts(&body.stmts);
                self.exit_scope();
            }
            Expr::CompositeLit { ty, elts, .. } => {
                if let Some(ty) = ty {
                    self.walk_expr(ty);
                }
                self.walk_exprs(elts);
            }
            Expr::Paren { x, .. }
            | Expr::Star { x, .. }
            | Expr::Unary { x, .. } => self.walk_expr(x),
            Expr::Selector(sel) => self.walk_expr(&sel.x),
            Expr::Index { x, indices, .. } => {
                self.walk_expr(x);
                self.walk_exprs(indices);
            }
            Expr::Slice {
                x, low, high, max, ..
            } => {
                self.walk_expr(x);
                for bound in [low, high, max].into_iter().flatten() {
                    self.walk_expr(bound);
                }
            }
            Expr::TypeAssert { x, ty, .. } => {
                self.walk_expr(x);
                if let Some(ty) = ty {
                    self.walk_expr(ty);
                }
            }
            Expr::Call(call) => {
                self.walk_expr(&call.fun);
                self.walk_exprs(&call.args);
            }
            Expr::Binary(bin) => {
                self.walk_expr(&bin.x);
                self.walk_expr(&bin.y);
            }
            Expr::KeyValue { key, value, .. } => {
                self.walk_expr(key);
                self.walk_expr(value);
            }
            Expr::ArrayType { len, elt, .. } => {
                if let Some(len) = len {
                    self.walk_expr(len);
                }
                self.walk_expr(elt);
            }
            Expr::MapType { key, value, .. } => {
                self.walk_expr(key);
                self.walk_expr(value);
            }
            Expr::ChanType { value, .. } => self.walk_expr(value),
            Expr::FuncType(ty) => {
                self.walk_fields(&ty.params);
                if let Some(results) = &ty.results {
                    self.walk_fields(results);
                }
            }
            Expr::StructType { fields, .. } => self.walk_fields(fields),
            Expr::InterfaceType { methods, .. } => self.walk_fields(methods),
            Expr::Ellipsis { elt, .. } => {
                if let Some(elt) = elt {
                    self.walk_expr(elt);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_file;

    fn graph(source: &str) -> (File, ScopeGraph) {
        let file = parse_file(source).unwrap();
        let graph = ScopeGraph::build(&file);
        (file, graph)
    }

    fn offset(source: &str, needle: &str) -> TextSize {
        TextSize::try_from(source.find(needle).unwrap()).unwrap()
    }

    #[test]
    fn test_imports_and_package_objects() {
        let src = "package p\nimport (\n\t\"strings\"\n\tb \"bytes\"\n\t_ \"embed\"\n)\nvar g = 1\nfunc f() {}\n";
        let (_, graph) = graph(src);
        let file_scope = graph.scope(graph.file_scope());
        assert!(matches!(
            file_scope.lookup("strings").map(|o| &o.kind),
            Some(ObjectKind::PkgName { path }) if path == "strings"
        ));
        assert!(file_scope.lookup("b").is_some());
        assert!(file_scope.lookup("bytes").is_none());
        assert!(file_scope.lookup("_").is_none());
        let package = graph.scope(graph.package());
        assert!(package.lookup("g").is_some());
        assert!(package.lookup("f").is_some());
        assert!(graph.is_visible(graph.file_scope(), "len", TextSize::new(0)));
    }

    #[test]
    fn test_local_visible_after_declaring_statement() {
        let src = "package p\nfunc f() {\n\tx := 1\n\t_ = x\n}\n";
        let (_, graph) = graph(src);
        let before = offset(src, "x := 1");
        let after = offset(src, "_ = x");
        assert!(!graph.is_visible(graph.innermost_at(before), "x", before));
        assert!(graph.is_visible(graph.innermost_at(after), "x", after));
    }

    #[test]
    fn test_if_scope_hides_init_from_if_position() {
        let src = "package p\nfunc f(s string) {\n\tif after := s; after != \"\" {\n\t}\n}\n";
        let (file, graph) = graph(src);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func");
        };
        let Stmt::If(stmt) = &func.body.as_ref().unwrap().stmts[0] else {
            panic!("expected if");
        };
        let scope = graph.scope_of(stmt.range).unwrap();
        assert_eq!(graph.scope(scope).kind, ScopeKind::If);
        assert!(!graph.is_visible(scope, "after", stmt.range.start()));
        assert!(graph.is_visible(scope, "after", stmt.body.range.start()));
        assert!(graph.is_visible(scope, "s", stmt.range.start()));
    }

    #[test]
    fn test_local_shadows_import() {
        let src = "package p\nimport \"strings\"\nfunc f() {\n\tstrings := \"x\"\n\t_ = strings\n}\n";
        let (_, graph) = graph(src);
        let pos = offset(src, "_ = strings");
        let (_, obj) = graph
            .lookup_parent(graph.innermost_at(pos), "strings", pos)
            .unwrap();
        assert_eq!(obj.kind, ObjectKind::Var);
    }

    #[test]
    fn test_range_and_func_literal_scopes() {
        let src = "package p\nfunc f(xs []string) {\n\tfor i, x := range xs {\n\t\tg := func(y int) { _ = y }\n\t\t_, _, _ = i, x, g\n\t}\n}\n";
        let (_, graph) = graph(src);
        let in_body = offset(src, "_, _, _");
        let scope = graph.innermost_at(in_body);
        assert_eq!(graph.scope(scope).kind, ScopeKind::Block);
        for name in ["i", "x", "g", "xs"] {
            assert!(graph.is_visible(scope, name, in_body), "{name}");
        }
        let in_lit = offset(src, "_ = y");
        let lit_scope = graph.innermost_at(in_lit);
        assert_eq!(graph.scope(lit_scope).kind, ScopeKind::Func);
        assert!(graph.is_visible(lit_scope, "y", in_lit));
        assert!(!graph.is_visible(scope, "y", in_body));
    }
}
