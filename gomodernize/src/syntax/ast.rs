//! Syntax tree for the supported Go subset.
//!
//! Nodes are closed sum types; analyses match on them exhaustively rather
//! than going through a visitor. All ranges are byte ranges into the
//! source the file was parsed from.

use ruff_text_size::{Ranged, TextRange, TextSize};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Package name from the package clause.
    pub package: Ident,
    /// Import declarations in source order.
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations, imports excluded.
    pub decls: Vec<Decl>,
    /// Bodies of `//go:build` directives.
    pub build_constraints: Vec<String>,
    /// Range of the whole file.
    pub range: TextRange,
}

impl File {
    /// Returns true if the file imports `path` under a usable name.
    ///
    /// Blank (`_`) and dot (`.`) imports do not count.
    pub fn imports_path(&self, path: &str) -> bool {
        self.imports
            .iter()
            .any(|spec| spec.path == path && spec.local_name().is_some())
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Identifier text.
    pub name: String,
    /// Range of the identifier.
    pub range: TextRange,
}

impl Ident {
    /// Returns true for the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// One import spec, e.g. `str "strings"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name, including `_` and `.`.
    pub name: Option<Ident>,
    /// Unquoted import path.
    pub path: String,
    /// Range of the whole spec.
    pub range: TextRange,
}

impl ImportSpec {
    /// Name under which the package is referenced in the file.
    ///
    /// Returns `None` for blank and dot imports.
    pub fn local_name(&self) -> Option<&str> {
        match &self.name {
            Some(name) if name.name == "_" || name.name == "." => None,
            Some(name) => Some(&name.name),
            None => Some(self.path.rsplit('/').next().unwrap_or(&self.path)),
        }
    }
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `func` declaration, with or without receiver.
    Func(FuncDecl),
    /// `var`, `const` or `type` declaration.
    Gen(GenDecl),
}

/// Function or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    /// Receiver list of a method.
    pub recv: Option<FieldList>,
    /// Function name.
    pub name: Ident,
    /// Type parameters, if any.
    pub type_params: Option<FieldList>,
    /// Signature.
    pub ty: FuncType,
    /// Body; absent for external declarations.
    pub body: Option<Block>,
    /// Range of the declaration.
    pub range: TextRange,
}

/// Function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    /// Parameters.
    pub params: FieldList,
    /// Results, if any.
    pub results: Option<FieldList>,
    /// Range from `func` (or the parameter list) to the end of the results.
    pub range: TextRange,
}

/// Parenthesized or braced list of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    /// Fields in order.
    pub fields: Vec<Field>,
    /// Range including delimiters.
    pub range: TextRange,
}

impl FieldList {
    /// Iterates over all declared names.
    pub fn names(&self) -> impl Iterator<Item = &Ident> {
        self.fields.iter().flat_map(|f| f.names.iter())
    }
}

/// A parameter, result, struct field or interface element.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared names; empty for anonymous fields.
    pub names: Vec<Ident>,
    /// Field type (or method signature for interface methods).
    pub ty: Expr,
    /// Struct tag literal.
    pub tag: Option<BasicLit>,
    /// Range of the field.
    pub range: TextRange,
}

/// Kind of a generic declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    /// `var`
    Var,
    /// `const`
    Const,
    /// `type`
    Type,
}

/// `var`, `const` or `type` declaration, grouped or not.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    /// Keyword.
    pub kind: GenKind,
    /// Specs.
    pub specs: Vec<Spec>,
    /// Range of the declaration.
    pub range: TextRange,
}

/// One spec of a generic declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    /// `a, b T = x, y`
    Value(ValueSpec),
    /// `T U` or `T = U`
    Type(TypeSpec),
}

/// Variable or constant spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    /// Declared names.
    pub names: Vec<Ident>,
    /// Optional type.
    pub ty: Option<Expr>,
    /// Initial values.
    pub values: Vec<Expr>,
    /// Range of the spec.
    pub range: TextRange,
}

/// Type spec.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    /// Declared name.
    pub name: Ident,
    /// True for alias declarations (`type A = B`).
    pub alias: bool,
    /// Underlying type.
    pub ty: Expr,
    /// Range of the spec.
    pub range: TextRange,
}

/// Braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements.
    pub stmts: Vec<Stmt>,
    /// Range from `{` through `}`.
    pub range: TextRange,
}

impl Block {
    /// Offset of the closing brace.
    pub fn rbrace(&self) -> TextSize {
        self.range.end() - TextSize::new(1)
    }
}

/// Assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `:=`
    Define,
    /// `=`
    Assign,
    /// `op=`
    Compound(BinaryOp),
}

/// Assignment or short variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// Left-hand side.
    pub lhs: Vec<Expr>,
    /// Operator.
    pub op: AssignOp,
    /// Right-hand side.
    pub rhs: Vec<Expr>,
    /// Range of the statement.
    pub range: TextRange,
}

impl AssignStmt {
    /// Returns the target and value of a one-to-one `=` or `:=`.
    pub fn as_simple(&self) -> Option<(&Expr, &Expr)> {
        match (self.op, self.lhs.as_slice(), self.rhs.as_slice()) {
            (AssignOp::Define | AssignOp::Assign, [lhs], [rhs]) => Some((lhs, rhs)),
            _ => None,
        }
    }
}

/// `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Initializer before the `;`.
    pub init: Option<Box<Stmt>>,
    /// Condition.
    pub cond: Expr,
    /// Then branch.
    pub body: Block,
    /// `else` branch: a block or another `if`.
    pub else_branch: Option<Box<Stmt>>,
    /// Range of the statement.
    pub range: TextRange,
}

/// `switch` statement, expression or type switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    /// Initializer.
    pub init: Option<Box<Stmt>>,
    /// Tag: an expression statement, or `v := x.(type)` for type switches.
    pub tag: Option<Box<Stmt>>,
    /// Case clauses.
    pub clauses: Vec<CaseClause>,
    /// Range of the statement.
    pub range: TextRange,
}

/// `case` or `default` clause of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Case expressions; empty for `default`.
    pub exprs: Vec<Expr>,
    /// Clause body.
    pub body: Vec<Stmt>,
    /// Range from `case`/`default` to the end of the body.
    pub range: TextRange,
}

/// `select` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    /// Communication clauses.
    pub clauses: Vec<CommClause>,
    /// Range of the statement.
    pub range: TextRange,
}

/// `case` or `default` clause of a select.
#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    /// Send or receive statement; `None` for `default`.
    pub comm: Option<Box<Stmt>>,
    /// Clause body.
    pub body: Vec<Stmt>,
    /// Range of the clause.
    pub range: TextRange,
}

/// Three-clause or condition-only `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Init statement.
    pub init: Option<Box<Stmt>>,
    /// Condition.
    pub cond: Option<Expr>,
    /// Post statement.
    pub post: Option<Box<Stmt>>,
    /// Loop body.
    pub body: Block,
    /// Range of the statement.
    pub range: TextRange,
}

/// `for ... range` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    /// Key target.
    pub key: Option<Expr>,
    /// Value target.
    pub value: Option<Expr>,
    /// `:=` or `=`; absent for `for range x`.
    pub op: Option<AssignOp>,
    /// Ranged-over expression.
    pub x: Expr,
    /// Loop body.
    pub body: Block,
    /// Range of the statement.
    pub range: TextRange,
}

/// Kind of branch statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `goto`
    Goto,
    /// `fallthrough`
    Fallthrough,
}

/// Statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Declaration inside a function body.
    Decl(GenDecl),
    /// `label: stmt`
    Labeled {
        /// Label.
        label: Ident,
        /// Labeled statement.
        stmt: Box<Stmt>,
        /// Range.
        range: TextRange,
    },
    /// Expression statement.
    Expr(Expr),
    /// `ch <- v`
    Send {
        /// Channel.
        chan: Expr,
        /// Sent value.
        value: Expr,
        /// Range.
        range: TextRange,
    },
    /// `x++` or `x--`
    IncDec {
        /// Operand.
        x: Expr,
        /// True for `++`.
        inc: bool,
        /// Range.
        range: TextRange,
    },
    /// Assignment or short variable declaration.
    Assign(AssignStmt),
    /// `go f()`
    Go {
        /// Called expression.
        call: Expr,
        /// Range.
        range: TextRange,
    },
    /// `defer f()`
    Defer {
        /// Called expression.
        call: Expr,
        /// Range.
        range: TextRange,
    },
    /// `return ...`
    Return {
        /// Returned values.
        results: Vec<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `break`, `continue`, `goto`, `fallthrough`.
    Branch {
        /// Keyword.
        kind: BranchKind,
        /// Target label.
        label: Option<Ident>,
        /// Range.
        range: TextRange,
    },
    /// Nested block.
    Block(Block),
    /// `if` statement.
    If(IfStmt),
    /// `switch` statement.
    Switch(SwitchStmt),
    /// `select` statement.
    Select(SelectStmt),
    /// Three-clause `for` loop.
    For(ForStmt),
    /// `for range` loop.
    Range(RangeStmt),
    /// Empty statement.
    Empty(TextRange),
}

impl Ranged for Stmt {
    fn range(&self) -> TextRange {
        match self {
            Stmt::Decl(decl) => decl.range,
            Stmt::Expr(expr) => expr.range(),
            Stmt::Assign(assign) => assign.range,
            Stmt::Block(block) => block.range,
            Stmt::If(stmt) => stmt.range,
            Stmt::Switch(stmt) => stmt.range,
            Stmt::Select(stmt) => stmt.range,
            Stmt::For(stmt) => stmt.range,
            Stmt::Range(stmt) => stmt.range,
            Stmt::Labeled { range, .. }
            | Stmt::Send { range, .. }
            | Stmt::IncDec { range, .. }
            | Stmt::Go { range, .. }
            | Stmt::Defer { range, .. }
            | Stmt::Return { range, .. }
            | Stmt::Branch { range, .. }
            | Stmt::Empty(range) => *range,
        }
    }
}

/// Kind of a basic literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Imaginary.
    Imag,
    /// Rune.
    Char,
    /// String, interpreted or raw.
    String,
}

/// Literal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    /// Literal kind.
    pub kind: LitKind,
    /// Source text, quotes included.
    pub value: String,
    /// Range.
    pub range: TextRange,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&^`
    AndNot,
    /// `&&`
    LAnd,
    /// `||`
    LOr,
    /// `==`
    Eql,
    /// `!=`
    Neq,
    /// `<`
    Lss,
    /// `<=`
    Leq,
    /// `>`
    Gtr,
    /// `>=`
    Geq,
}

impl BinaryOp {
    /// Operator precedence, 1 (lowest) to 5.
    pub fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eql | Self::Neq | Self::Lss | Self::Leq | Self::Gtr | Self::Geq => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul | Self::Quo | Self::Rem | Self::Shl | Self::Shr | Self::And | Self::AndNot => 5,
        }
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `^`
    Xor,
    /// `&`
    Addr,
    /// `<-`
    Recv,
    /// `~`
    Tilde,
}

/// Channel direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Called expression.
    pub fun: Box<Expr>,
    /// Arguments.
    pub args: Vec<Expr>,
    /// True when the last argument is followed by `...`.
    pub ellipsis: bool,
    /// Range through the closing parenthesis.
    pub range: TextRange,
}

/// Selector expression `x.sel`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    /// Operand.
    pub x: Box<Expr>,
    /// Selected name.
    pub sel: Ident,
    /// Range.
    pub range: TextRange,
}

/// Binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Left operand.
    pub x: Box<Expr>,
    /// Operator.
    pub op: BinaryOp,
    /// Right operand.
    pub y: Box<Expr>,
    /// Range.
    pub range: TextRange,
}

/// Expression, including type expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier.
    Ident(Ident),
    /// Literal.
    BasicLit(BasicLit),
    /// `T{...}`, or `{...}` with the type elided.
    CompositeLit {
        /// Literal type.
        ty: Option<Box<Expr>>,
        /// Elements.
        elts: Vec<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `func(...) {...}`
    FuncLit {
        /// Signature.
        ty: FuncType,
        /// Body.
        body: Block,
        /// Range.
        range: TextRange,
    },
    /// `(x)`
    Paren {
        /// Inner expression.
        x: Box<Expr>,
        /// Range including parentheses.
        range: TextRange,
    },
    /// `x.sel`
    Selector(SelectorExpr),
    /// `x[i]` or `x[T1, T2]`
    Index {
        /// Operand.
        x: Box<Expr>,
        /// Indices.
        indices: Vec<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `x[lo:hi:max]`
    Slice {
        /// Operand.
        x: Box<Expr>,
        /// Low bound.
        low: Option<Box<Expr>>,
        /// High bound.
        high: Option<Box<Expr>>,
        /// Capacity bound.
        max: Option<Box<Expr>>,
        /// True for the three-index form.
        slice3: bool,
        /// Range.
        range: TextRange,
    },
    /// `x.(T)`, or `x.(type)` when `ty` is absent.
    TypeAssert {
        /// Operand.
        x: Box<Expr>,
        /// Asserted type.
        ty: Option<Box<Expr>>,
        /// Range.
        range: TextRange,
    },
    /// Function call or conversion.
    Call(CallExpr),
    /// `*x`, dereference or pointer type.
    Star {
        /// Operand.
        x: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// Unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        x: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// Binary expression.
    Binary(BinaryExpr),
    /// `key: value` inside a composite literal.
    KeyValue {
        /// Key.
        key: Box<Expr>,
        /// Value.
        value: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `[N]T`, `[...]T` or `[]T`.
    ArrayType {
        /// Length; `None` for slices.
        len: Option<Box<Expr>>,
        /// Element type.
        elt: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `map[K]V`
    MapType {
        /// Key type.
        key: Box<Expr>,
        /// Value type.
        value: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `chan T` and directional variants.
    ChanType {
        /// Direction.
        dir: ChanDir,
        /// Element type.
        value: Box<Expr>,
        /// Range.
        range: TextRange,
    },
    /// `func(...) ...` used as a type.
    FuncType(FuncType),
    /// `struct{...}`
    StructType {
        /// Fields.
        fields: FieldList,
        /// Range.
        range: TextRange,
    },
    /// `interface{...}`
    InterfaceType {
        /// Methods and embedded elements.
        methods: FieldList,
        /// Range.
        range: TextRange,
    },
    /// `...T` in a parameter list, or `...` as an array length.
    Ellipsis {
        /// Element type.
        elt: Option<Box<Expr>>,
        /// Range.
        range: TextRange,
    },
}

impl Expr {
    /// Returns the identifier if this is a bare identifier.
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Returns the call if this is a call expression.
    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl Ranged for Expr {
    fn range(&self) -> TextRange {
        match self {
            Expr::Ident(ident) => ident.range,
            Expr::BasicLit(lit) => lit.range,
            Expr::Selector(sel) => sel.range,
            Expr::Call(call) => call.range,
            Expr::Binary(bin) => bin.range,
            Expr::FuncType(ty) => ty.range,
            Expr::CompositeLit { range, .. }
            | Expr::FuncLit { range, .. }
            | Expr::Paren { range, .. }
            | Expr::Index { range, .. }
            | Expr::Slice { range, .. }
            | Expr::TypeAssert { range, .. }
            | Expr::Star { range, .. }
            | Expr::Unary { range, .. }
            | Expr::KeyValue { range, .. }
            | Expr::ArrayType { range, .. }
            | Expr::MapType { range, .. }
            | Expr::ChanType { range, .. }
            | Expr::StructType { range, .. }
            | Expr::InterfaceType { range, .. }
            | Expr::Ellipsis { range, .. } => *range,
        }
    }
}

macro_rules! impl_ranged {
    ($($ty:ty),* $(,)?) => {
        $(impl Ranged for $ty {
            fn range(&self) -> TextRange {
                self.range
            }
        })*
    };
}

impl_ranged!(
    File, Ident, ImportSpec, FuncDecl, FuncType, FieldList, Field, GenDecl, ValueSpec, TypeSpec,
    Block, AssignStmt, IfStmt, SwitchStmt, CaseClause, SelectStmt, CommClause, ForStmt, RangeStmt,
    BasicLit, CallExpr, SelectorExpr, BinaryExpr,
);

impl Ranged for Decl {
    fn range(&self) -> TextRange {
        match self {
            Decl::Func(func) => func.range,
            Decl::Gen(gen) => gen.range,
        }
    }
}

impl Ranged for Spec {
    fn range(&self) -> TextRange {
        match self {
            Spec::Value(spec) => spec.range,
            Spec::Type(spec) => spec.range,
        }
    }
}
