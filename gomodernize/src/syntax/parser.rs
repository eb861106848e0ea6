//! Go parsing on top of `tree-sitter-go`.
//!
//! tree-sitter produces a concrete syntax tree with exact byte ranges; this
//! module lowers it into the closed types of [`super::ast`], which is what
//! the scope graph and the rules match on. Trees that contain `ERROR` or
//! `MISSING` nodes are rejected, so fixes are only ever computed against
//! well-formed files.

use super::ast::{
    AssignOp, AssignStmt, BasicLit, BinaryExpr, BinaryOp, Block, BranchKind, CallExpr,
    CaseClause, ChanDir, CommClause, Decl, Expr, Field, FieldList, File, ForStmt, FuncDecl,
    FuncType, GenDecl, GenKind, Ident, IfStmt, ImportSpec, LitKind, RangeStmt, SelectStmt,
    SelectorExpr, Spec, Stmt, SwitchStmt, TypeSpec, UnaryOp, ValueSpec,
};
use super::ParseError;
use ruff_text_size::{TextRange, TextSize};
use tree_sitter::{Node, Parser};

type PResult<T> = Result<T, ParseError>;

/// Parses a complete source file.
///
/// # Errors
///
/// Returns the position of the first syntax error, or of a construct the
/// lowering does not understand.
pub fn parse_file(source: &str) -> PResult<File> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| ParseError::new(format!("failed to load Go grammar: {e}"), 0))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new("parser produced no tree", 0))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source));
    }
    Lower { source }.file(root)
}

/// Parses a single expression.
///
/// The expression is wrapped in a `var` declaration, so its ranges are
/// offsets into that wrapper rather than into `source`.
#[cfg(test)]
pub(crate) fn parse_expr(source: &str) -> PResult<Expr> {
    let file = parse_file(&format!("package p\nvar _ = {source}\n"))?;
    let value = file.decls.into_iter().find_map(|decl| match decl {
        Decl::Gen(decl) => decl.specs.into_iter().find_map(|spec| match spec {
            Spec::Value(spec) => spec.values.into_iter().next(),
            Spec::Type(_) => None,
        }),
        Decl::Func(_) => None,
    });
    value.ok_or_else(|| ParseError::new("expected an expression", 0))
}

/// Locates the first `ERROR` or `MISSING` node below `node`.
fn first_error(node: Node<'_>, source: &str) -> ParseError {
    if node.is_missing() {
        return ParseError::new(format!("missing {}", node.kind()), node.start_byte());
    }
    if node.is_error() {
        let text = source.get(node.byte_range()).unwrap_or_default();
        let snippet: String = text.chars().take(20).collect();
        return ParseError::new(format!("syntax error near {snippet:?}"), node.start_byte());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error(child, source);
        }
    }
    ParseError::new("syntax error", node.start_byte())
}

fn size(offset: usize) -> TextSize {
    u32::try_from(offset).map_or(TextSize::new(u32::MAX), TextSize::new)
}

fn span(start: usize, end: usize) -> TextRange {
    TextRange::new(size(start), size(end))
}

fn range_of(node: Node<'_>) -> TextRange {
    span(node.start_byte(), node.end_byte())
}

/// Named children, comments excluded.
fn named(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Named children carrying the field `name`.
fn by_field<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor)
        .filter(|child| child.is_named() && !child.is_extra())
        .collect()
}

/// First anonymous token of `kind` among the direct children.
fn token<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| !child.is_named() && child.kind() == kind);
    found
}

fn binary_op(op: &str) -> Option<BinaryOp> {
    Some(match op {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Quo,
        "%" => BinaryOp::Rem,
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "^" => BinaryOp::Xor,
        "<<" => BinaryOp::Shl,
        ">>" => BinaryOp::Shr,
        "&^" => BinaryOp::AndNot,
        "&&" => BinaryOp::LAnd,
        "||" => BinaryOp::LOr,
        "==" => BinaryOp::Eql,
        "!=" => BinaryOp::Neq,
        "<" => BinaryOp::Lss,
        "<=" => BinaryOp::Leq,
        ">" => BinaryOp::Gtr,
        ">=" => BinaryOp::Geq,
        _ => return None,
    })
}

fn assign_op(op: &str) -> Option<AssignOp> {
    match op {
        ":=" => Some(AssignOp::Define),
        "=" => Some(AssignOp::Assign),
        _ => op
            .strip_suffix('=')
            .and_then(binary_op)
            .map(AssignOp::Compound),
    }
}

/// Lowering from the tree-sitter tree into [`super::ast`].
struct Lower<'s> {
    source: &'s str,
}

impl Lower<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn ident(&self, node: Node<'_>) -> Ident {
        Ident {
            name: self.text(node).to_owned(),
            range: range_of(node),
        }
    }

    fn unexpected(node: Node<'_>) -> ParseError {
        ParseError::new(format!("unexpected {}", node.kind()), node.start_byte())
    }

    fn field<'t>(node: Node<'t>, name: &str) -> PResult<Node<'t>> {
        node.child_by_field_name(name).ok_or_else(|| {
            ParseError::new(format!("{} without {name}", node.kind()), node.start_byte())
        })
    }

    fn first_named(node: Node<'_>) -> PResult<Node<'_>> {
        named(node)
            .into_iter()
            .next()
            .ok_or_else(|| Self::unexpected(node))
    }

    // ---- declarations ----

    fn file(&self, root: Node<'_>) -> PResult<File> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut decls = Vec::new();
        let mut build_constraints = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    if let Some(rest) = self.text(child).strip_prefix("//go:build") {
                        build_constraints.push(rest.trim().to_owned());
                    }
                }
                "package_clause" => package = Some(self.ident(Self::first_named(child)?)),
                "import_declaration" => self.imports(child, &mut imports),
                "function_declaration" | "method_declaration" => {
                    decls.push(Decl::Func(self.func_decl(child)?));
                }
                "const_declaration" | "var_declaration" | "type_declaration" => {
                    decls.push(Decl::Gen(self.gen_decl(child)?));
                }
                _ if child.is_named() => return Err(Self::unexpected(child)),
                _ => {}
            }
        }

        let package =
            package.ok_or_else(|| ParseError::new("expected package clause", root.start_byte()))?;
        Ok(File {
            package,
            imports,
            decls,
            build_constraints,
            range: range_of(root),
        })
    }

    fn imports(&self, node: Node<'_>, out: &mut Vec<ImportSpec>) {
        for child in named(node) {
            match child.kind() {
                "import_spec" => {
                    let Some(path) = child.child_by_field_name("path") else {
                        continue;
                    };
                    let raw = self.text(path);
                    let unquoted = raw.get(1..raw.len().saturating_sub(1)).unwrap_or(raw);
                    out.push(ImportSpec {
                        name: child.child_by_field_name("name").map(|n| self.ident(n)),
                        path: unquoted.to_owned(),
                        range: range_of(child),
                    });
                }
                "import_spec_list" => self.imports(child, out),
                _ => {}
            }
        }
    }

    fn func_decl(&self, node: Node<'_>) -> PResult<FuncDecl> {
        let recv = node
            .child_by_field_name("receiver")
            .map(|n| self.field_list(n))
            .transpose()?;
        let type_params = node
            .child_by_field_name("type_parameters")
            .map(|n| self.field_list(n))
            .transpose()?;
        let body = node
            .child_by_field_name("body")
            .map(|n| self.block(n))
            .transpose()?;
        Ok(FuncDecl {
            recv,
            name: self.ident(Self::field(node, "name")?),
            type_params,
            ty: self.signature(node, node.start_byte())?,
            body,
            range: range_of(node),
        })
    }

    /// Parameters and results of `node`; the range starts at `start`.
    fn signature(&self, node: Node<'_>, start: usize) -> PResult<FuncType> {
        let params_node = Self::field(node, "parameters")?;
        let params = self.field_list(params_node)?;
        let (results, end) = match node.child_by_field_name("result") {
            Some(result) if result.kind() == "parameter_list" => {
                (Some(self.field_list(result)?), result.end_byte())
            }
            Some(result) => {
                let range = range_of(result);
                let field = Field {
                    names: Vec::new(),
                    ty: self.expr(result)?,
                    tag: None,
                    range,
                };
                (
                    Some(FieldList {
                        fields: vec![field],
                        range,
                    }),
                    result.end_byte(),
                )
            }
            None => (None, params_node.end_byte()),
        };
        Ok(FuncType {
            params,
            results,
            range: span(start, end),
        })
    }

    /// Parameter, type parameter or receiver list.
    fn field_list(&self, node: Node<'_>) -> PResult<FieldList> {
        let mut fields = Vec::new();
        for child in named(node) {
            let names = by_field(child, "name")
                .into_iter()
                .map(|n| self.ident(n))
                .collect();
            let ty_node = Self::field(child, "type")?;
            let mut ty = self.expr(ty_node)?;
            if child.kind() == "variadic_parameter_declaration" {
                let start = token(child, "...").map_or(ty_node.start_byte(), |t| t.start_byte());
                ty = Expr::Ellipsis {
                    elt: Some(Box::new(ty)),
                    range: span(start, ty_node.end_byte()),
                };
            }
            fields.push(Field {
                names,
                ty,
                tag: None,
                range: range_of(child),
            });
        }
        Ok(FieldList {
            fields,
            range: range_of(node),
        })
    }

    fn gen_decl(&self, node: Node<'_>) -> PResult<GenDecl> {
        let kind = match node.kind() {
            "const_declaration" => GenKind::Const,
            "var_declaration" => GenKind::Var,
            _ => GenKind::Type,
        };
        let mut specs = Vec::new();
        self.specs(node, &mut specs)?;
        Ok(GenDecl {
            kind,
            specs,
            range: range_of(node),
        })
    }

    fn specs(&self, node: Node<'_>, out: &mut Vec<Spec>) -> PResult<()> {
        for child in named(node) {
            match child.kind() {
                "const_spec" | "var_spec" => out.push(Spec::Value(ValueSpec {
                    names: by_field(child, "name")
                        .into_iter()
                        .map(|n| self.ident(n))
                        .collect(),
                    ty: child
                        .child_by_field_name("type")
                        .map(|n| self.expr(n))
                        .transpose()?,
                    values: child
                        .child_by_field_name("value")
                        .map(|n| self.expr_list(n))
                        .transpose()?
                        .unwrap_or_default(),
                    range: range_of(child),
                })),
                "type_spec" | "type_alias" => out.push(Spec::Type(TypeSpec {
                    name: self.ident(Self::field(child, "name")?),
                    alias: child.kind() == "type_alias",
                    ty: self.expr(Self::field(child, "type")?)?,
                    range: range_of(child),
                })),
                kind if kind.ends_with("_list") => self.specs(child, out)?,
                _ => {}
            }
        }
        Ok(())
    }

    // ---- statements ----

    fn block(&self, node: Node<'_>) -> PResult<Block> {
        Ok(Block {
            stmts: self.stmt_children(node)?,
            range: range_of(node),
        })
    }

    /// Statements directly inside `node`, skipping children that fill a
    /// field (case values, select communications).
    fn stmt_children(&self, node: Node<'_>) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return Ok(stmts);
        }
        loop {
            let child = cursor.node();
            if cursor.field_name().is_none() && child.is_named() && !child.is_extra() {
                if child.kind() == "statement_list" {
                    stmts.extend(self.stmt_children(child)?);
                } else {
                    stmts.push(self.stmt(child)?);
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        Ok(stmts)
    }

    fn boxed_stmt(&self, node: Option<Node<'_>>) -> PResult<Option<Box<Stmt>>> {
        node.map(|n| self.stmt(n).map(Box::new)).transpose()
    }

    fn stmt(&self, node: Node<'_>) -> PResult<Stmt> {
        let range = range_of(node);
        Ok(match node.kind() {
            "const_declaration" | "var_declaration" | "type_declaration" => {
                Stmt::Decl(self.gen_decl(node)?)
            }
            "expression_statement" => Stmt::Expr(self.expr(Self::first_named(node)?)?),
            "send_statement" => Stmt::Send {
                chan: self.expr(Self::field(node, "channel")?)?,
                value: self.expr(Self::field(node, "value")?)?,
                range,
            },
            "inc_statement" | "dec_statement" => Stmt::IncDec {
                x: self.expr(Self::first_named(node)?)?,
                inc: node.kind() == "inc_statement",
                range,
            },
            "assignment_statement" => {
                let op_node = Self::field(node, "operator")?;
                let op = assign_op(self.text(op_node)).ok_or_else(|| Self::unexpected(op_node))?;
                Stmt::Assign(AssignStmt {
                    lhs: self.expr_list(Self::field(node, "left")?)?,
                    op,
                    rhs: self.expr_list(Self::field(node, "right")?)?,
                    range,
                })
            }
            "short_var_declaration" => Stmt::Assign(AssignStmt {
                lhs: self.expr_list(Self::field(node, "left")?)?,
                op: AssignOp::Define,
                rhs: self.expr_list(Self::field(node, "right")?)?,
                range,
            }),
            "receive_statement" => {
                let right = self.expr(Self::field(node, "right")?)?;
                match node.child_by_field_name("left") {
                    Some(left) => {
                        let op = if token(node, ":=").is_some() {
                            AssignOp::Define
                        } else {
                            AssignOp::Assign
                        };
                        Stmt::Assign(AssignStmt {
                            lhs: self.expr_list(left)?,
                            op,
                            rhs: vec![right],
                            range,
                        })
                    }
                    None => Stmt::Expr(right),
                }
            }
            "labeled_statement" => {
                let label = Self::field(node, "label")?;
                let inner = named(node).into_iter().find(|c| c.id() != label.id());
                let stmt = match inner {
                    Some(inner) => self.stmt(inner)?,
                    None => Stmt::Empty(span(node.end_byte(), node.end_byte())),
                };
                Stmt::Labeled {
                    label: self.ident(label),
                    stmt: Box::new(stmt),
                    range,
                }
            }
            "go_statement" => Stmt::Go {
                call: self.expr(Self::first_named(node)?)?,
                range,
            },
            "defer_statement" => Stmt::Defer {
                call: self.expr(Self::first_named(node)?)?,
                range,
            },
            "return_statement" => Stmt::Return {
                results: match named(node).into_iter().next() {
                    Some(list) => self.expr_list(list)?,
                    None => Vec::new(),
                },
                range,
            },
            "break_statement" | "continue_statement" | "goto_statement"
            | "fallthrough_statement" => Stmt::Branch {
                kind: match node.kind() {
                    "break_statement" => BranchKind::Break,
                    "continue_statement" => BranchKind::Continue,
                    "goto_statement" => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                },
                label: named(node).into_iter().next().map(|n| self.ident(n)),
                range,
            },
            "block" => Stmt::Block(self.block(node)?),
            "if_statement" => Stmt::If(self.if_stmt(node)?),
            "for_statement" => self.for_stmt(node)?,
            "expression_switch_statement" => Stmt::Switch(self.expr_switch(node)?),
            "type_switch_statement" => Stmt::Switch(self.type_switch(node)?),
            "select_statement" => Stmt::Select(self.select(node)?),
            "empty_statement" => Stmt::Empty(range),
            _ => Stmt::Expr(self.expr(node)?),
        })
    }

    fn if_stmt(&self, node: Node<'_>) -> PResult<IfStmt> {
        let else_branch = match node.child_by_field_name("alternative") {
            Some(alt) if alt.kind() == "if_statement" => {
                Some(Box::new(Stmt::If(self.if_stmt(alt)?)))
            }
            Some(alt) => Some(Box::new(Stmt::Block(self.block(alt)?))),
            None => None,
        };
        Ok(IfStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer"))?,
            cond: self.expr(Self::field(node, "condition")?)?,
            body: self.block(Self::field(node, "consequence")?)?,
            else_branch,
            range: range_of(node),
        })
    }

    fn for_stmt(&self, node: Node<'_>) -> PResult<Stmt> {
        let body_node = Self::field(node, "body")?;
        let body = self.block(body_node)?;
        let range = range_of(node);
        let header = named(node)
            .into_iter()
            .find(|child| child.id() != body_node.id());

        match header {
            Some(clause) if clause.kind() == "range_clause" => {
                let targets = clause
                    .child_by_field_name("left")
                    .map(|left| self.expr_list(left))
                    .transpose()?
                    .unwrap_or_default();
                let op = if token(clause, ":=").is_some() {
                    Some(AssignOp::Define)
                } else if token(clause, "=").is_some() {
                    Some(AssignOp::Assign)
                } else {
                    None
                };
                let mut targets = targets.into_iter();
                Ok(Stmt::Range(RangeStmt {
                    key: targets.next(),
                    value: targets.next(),
                    op,
                    x: self.expr(Self::field(clause, "right")?)?,
                    body,
                    range,
                }))
            }
            Some(clause) if clause.kind() == "for_clause" => Ok(Stmt::For(ForStmt {
                init: self.boxed_stmt(clause.child_by_field_name("initializer"))?,
                cond: clause
                    .child_by_field_name("condition")
                    .map(|n| self.expr(n))
                    .transpose()?,
                post: self.boxed_stmt(clause.child_by_field_name("update"))?,
                body,
                range,
            })),
            cond => Ok(Stmt::For(ForStmt {
                init: None,
                cond: cond.map(|n| self.expr(n)).transpose()?,
                post: None,
                body,
                range,
            })),
        }
    }

    fn expr_switch(&self, node: Node<'_>) -> PResult<SwitchStmt> {
        let tag = node
            .child_by_field_name("value")
            .map(|n| self.expr(n).map(|e| Box::new(Stmt::Expr(e))))
            .transpose()?;
        let mut clauses = Vec::new();
        for clause in named(node) {
            let exprs = match clause.kind() {
                "expression_case" => self.expr_list(Self::field(clause, "value")?)?,
                "default_case" => Vec::new(),
                _ => continue,
            };
            clauses.push(CaseClause {
                exprs,
                body: self.stmt_children(clause)?,
                range: range_of(clause),
            });
        }
        Ok(SwitchStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer"))?,
            tag,
            clauses,
            range: range_of(node),
        })
    }

    /// `switch v := x.(type)` is lowered to a tag statement `v := x.(type)`.
    fn type_switch(&self, node: Node<'_>) -> PResult<SwitchStmt> {
        let value = Self::field(node, "value")?;
        let mut assert_end = value.end_byte();
        let mut cursor = node.walk();
        let mut after_type = false;
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type" if !child.is_named() => after_type = true,
                ")" if after_type => {
                    assert_end = child.end_byte();
                    break;
                }
                _ => {}
            }
        }

        let assert = Expr::TypeAssert {
            x: Box::new(self.expr(value)?),
            ty: None,
            range: span(value.start_byte(), assert_end),
        };
        let tag = match node.child_by_field_name("alias") {
            Some(alias) => Stmt::Assign(AssignStmt {
                lhs: self.expr_list(alias)?,
                op: AssignOp::Define,
                rhs: vec![assert],
                range: span(alias.start_byte(), assert_end),
            }),
            None => Stmt::Expr(assert),
        };

        let mut clauses = Vec::new();
        for clause in named(node) {
            let exprs = match clause.kind() {
                "type_case" => by_field(clause, "type")
                    .into_iter()
                    .map(|n| self.expr(n))
                    .collect::<PResult<_>>()?,
                "default_case" => Vec::new(),
                _ => continue,
            };
            clauses.push(CaseClause {
                exprs,
                body: self.stmt_children(clause)?,
                range: range_of(clause),
            });
        }
        Ok(SwitchStmt {
            init: self.boxed_stmt(node.child_by_field_name("initializer"))?,
            tag: Some(Box::new(tag)),
            clauses,
            range: range_of(node),
        })
    }

    fn select(&self, node: Node<'_>) -> PResult<SelectStmt> {
        let mut clauses = Vec::new();
        for clause in named(node) {
            let comm = match clause.kind() {
                "communication_case" => {
                    Some(Box::new(self.stmt(Self::field(clause, "communication")?)?))
                }
                "default_case" => None,
                _ => continue,
            };
            clauses.push(CommClause {
                comm,
                body: self.stmt_children(clause)?,
                range: range_of(clause),
            });
        }
        Ok(SelectStmt {
            clauses,
            range: range_of(node),
        })
    }

    // ---- expressions ----

    /// An `expression_list`, or a single expression in its place.
    fn expr_list(&self, node: Node<'_>) -> PResult<Vec<Expr>> {
        if node.kind() == "expression_list" {
            named(node).into_iter().map(|n| self.expr(n)).collect()
        } else {
            Ok(vec![self.expr(node)?])
        }
    }

    fn boxed(&self, node: Node<'_>) -> PResult<Box<Expr>> {
        self.expr(node).map(Box::new)
    }

    fn opt_boxed(&self, node: Option<Node<'_>>) -> PResult<Option<Box<Expr>>> {
        node.map(|n| self.boxed(n)).transpose()
    }

    fn lit(&self, node: Node<'_>, kind: LitKind) -> BasicLit {
        BasicLit {
            kind,
            value: self.text(node).to_owned(),
            range: range_of(node),
        }
    }

    /// Folds `A | B | C` elements into left-associated `Or` expressions.
    fn union(&self, node: Node<'_>) -> PResult<Expr> {
        let mut terms = named(node).into_iter();
        let first = terms.next().ok_or_else(|| Self::unexpected(node))?;
        let mut acc = self.expr(first)?;
        for term in terms {
            let y = self.expr(term)?;
            acc = Expr::Binary(BinaryExpr {
                range: span(first.start_byte(), term.end_byte()),
                x: Box::new(acc),
                op: BinaryOp::Or,
                y: Box::new(y),
            });
        }
        Ok(acc)
    }

    #[allow(clippy::too_many_lines)]
    fn expr(&self, node: Node<'_>) -> PResult<Expr> {
        let range = range_of(node);
        Ok(match node.kind() {
            "identifier" | "type_identifier" | "field_identifier" | "package_identifier"
            | "blank_identifier" | "label_name" | "nil" | "true" | "false" | "iota" => {
                Expr::Ident(self.ident(node))
            }
            "int_literal" => Expr::BasicLit(self.lit(node, LitKind::Int)),
            "float_literal" => Expr::BasicLit(self.lit(node, LitKind::Float)),
            "imaginary_literal" => Expr::BasicLit(self.lit(node, LitKind::Imag)),
            "rune_literal" => Expr::BasicLit(self.lit(node, LitKind::Char)),
            "interpreted_string_literal" | "raw_string_literal" => {
                Expr::BasicLit(self.lit(node, LitKind::String))
            }
            "parenthesized_expression" | "parenthesized_type" => Expr::Paren {
                x: self.boxed(Self::first_named(node)?)?,
                range,
            },
            "selector_expression" => Expr::Selector(SelectorExpr {
                x: self.boxed(Self::field(node, "operand")?)?,
                sel: self.ident(Self::field(node, "field")?),
                range,
            }),
            "qualified_type" => Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(self.ident(Self::field(node, "package")?))),
                sel: self.ident(Self::field(node, "name")?),
                range,
            }),
            "index_expression" => Expr::Index {
                x: self.boxed(Self::field(node, "operand")?)?,
                indices: by_field(node, "index")
                    .into_iter()
                    .map(|n| self.expr(n))
                    .collect::<PResult<_>>()?,
                range,
            },
            "generic_type" | "type_instantiation_expression" => {
                let mut parts = named(node).into_iter();
                let base = parts.next().ok_or_else(|| Self::unexpected(node))?;
                let mut indices = Vec::new();
                for part in parts {
                    if part.kind() == "type_arguments" {
                        for arg in named(part) {
                            indices.push(self.expr(arg)?);
                        }
                    } else {
                        indices.push(self.expr(part)?);
                    }
                }
                Expr::Index {
                    x: self.boxed(base)?,
                    indices,
                    range,
                }
            }
            "slice_expression" => {
                let max = node.child_by_field_name("capacity");
                Expr::Slice {
                    x: self.boxed(Self::field(node, "operand")?)?,
                    low: self.opt_boxed(node.child_by_field_name("start"))?,
                    high: self.opt_boxed(node.child_by_field_name("end"))?,
                    slice3: max.is_some(),
                    max: self.opt_boxed(max)?,
                    range,
                }
            }
            "type_assertion_expression" => Expr::TypeAssert {
                x: self.boxed(Self::field(node, "operand")?)?,
                ty: Some(self.boxed(Self::field(node, "type")?)?),
                range,
            },
            "call_expression" => Expr::Call(self.call(node)?),
            "type_conversion_expression" => Expr::Call(CallExpr {
                fun: self.boxed(Self::field(node, "type")?)?,
                args: vec![self.expr(Self::field(node, "operand")?)?],
                ellipsis: token(node, "...").is_some(),
                range,
            }),
            "unary_expression" => {
                let op_node = Self::field(node, "operator")?;
                let x = self.boxed(Self::field(node, "operand")?)?;
                let op = match self.text(op_node) {
                    "*" => return Ok(Expr::Star { x, range }),
                    "+" => UnaryOp::Plus,
                    "-" => UnaryOp::Neg,
                    "!" => UnaryOp::Not,
                    "^" => UnaryOp::Xor,
                    "&" => UnaryOp::Addr,
                    "<-" => UnaryOp::Recv,
                    _ => return Err(Self::unexpected(op_node)),
                };
                Expr::Unary { op, x, range }
            }
            "binary_expression" => {
                let op_node = Self::field(node, "operator")?;
                let op = binary_op(self.text(op_node)).ok_or_else(|| Self::unexpected(op_node))?;
                Expr::Binary(BinaryExpr {
                    x: self.boxed(Self::field(node, "left")?)?,
                    op,
                    y: self.boxed(Self::field(node, "right")?)?,
                    range,
                })
            }
            "composite_literal" => Expr::CompositeLit {
                ty: Some(self.boxed(Self::field(node, "type")?)?),
                elts: self.elements(Self::field(node, "body")?)?,
                range,
            },
            "literal_value" => Expr::CompositeLit {
                ty: None,
                elts: self.elements(node)?,
                range,
            },
            "literal_element" => self.expr(Self::first_named(node)?)?,
            "keyed_element" => {
                let parts = named(node);
                let [key, value] = parts.as_slice() else {
                    return Err(Self::unexpected(node));
                };
                Expr::KeyValue {
                    key: self.boxed(*key)?,
                    value: self.boxed(*value)?,
                    range,
                }
            }
            "func_literal" => Expr::FuncLit {
                ty: self.signature(node, node.start_byte())?,
                body: self.block(Self::field(node, "body")?)?,
                range,
            },
            "pointer_type" => Expr::Star {
                x: self.boxed(Self::first_named(node)?)?,
                range,
            },
            "array_type" => Expr::ArrayType {
                len: Some(self.boxed(Self::field(node, "length")?)?),
                elt: self.boxed(Self::field(node, "element")?)?,
                range,
            },
            "implicit_length_array_type" => {
                let dots = token(node, "...").map_or(range, range_of);
                Expr::ArrayType {
                    len: Some(Box::new(Expr::Ellipsis {
                        elt: None,
                        range: dots,
                    })),
                    elt: self.boxed(Self::field(node, "element")?)?,
                    range,
                }
            }
            "slice_type" => Expr::ArrayType {
                len: None,
                elt: self.boxed(Self::field(node, "element")?)?,
                range,
            },
            "map_type" => Expr::MapType {
                key: self.boxed(Self::field(node, "key")?)?,
                value: self.boxed(Self::field(node, "value")?)?,
                range,
            },
            "channel_type" => {
                let text = self.text(node);
                let dir = if text.starts_with("<-") {
                    ChanDir::Recv
                } else if text
                    .strip_prefix("chan")
                    .is_some_and(|rest| rest.trim_start().starts_with("<-"))
                {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Expr::ChanType {
                    dir,
                    value: self.boxed(Self::field(node, "value")?)?,
                    range,
                }
            }
            "function_type" => Expr::FuncType(self.signature(node, node.start_byte())?),
            "struct_type" => {
                let list = Self::first_named(node)?;
                Expr::StructType {
                    fields: self.struct_fields(list)?,
                    range,
                }
            }
            "interface_type" => Expr::InterfaceType {
                methods: self.interface_elems(node)?,
                range,
            },
            "negated_type" => Expr::Unary {
                op: UnaryOp::Tilde,
                x: self.boxed(Self::first_named(node)?)?,
                range,
            },
            "type_elem" | "type_constraint" | "constraint_elem" | "union_type" => {
                self.union(node)?
            }
            "variadic_argument" => self.expr(Self::first_named(node)?)?,
            _ => return Err(Self::unexpected(node)),
        })
    }

    fn call(&self, node: Node<'_>) -> PResult<CallExpr> {
        let fun_node = Self::field(node, "function")?;
        let mut fun = self.expr(fun_node)?;
        if let Some(type_args) = node.child_by_field_name("type_arguments") {
            fun = Expr::Index {
                x: Box::new(fun),
                indices: named(type_args)
                    .into_iter()
                    .map(|n| self.expr(n))
                    .collect::<PResult<_>>()?,
                range: span(fun_node.start_byte(), type_args.end_byte()),
            };
        }

        let mut args = Vec::new();
        let mut ellipsis = false;
        let arg_list = Self::field(node, "arguments")?;
        for arg in named(arg_list) {
            if arg.kind() == "variadic_argument" {
                ellipsis = true;
            }
            args.push(self.expr(arg)?);
        }
        if token(arg_list, "...").is_some() {
            ellipsis = true;
        }
        Ok(CallExpr {
            fun: Box::new(fun),
            args,
            ellipsis,
            range: range_of(node),
        })
    }

    fn elements(&self, node: Node<'_>) -> PResult<Vec<Expr>> {
        named(node).into_iter().map(|n| self.expr(n)).collect()
    }

    fn struct_fields(&self, list: Node<'_>) -> PResult<FieldList> {
        let mut fields = Vec::new();
        for decl in named(list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let names: Vec<Ident> = by_field(decl, "name")
                .into_iter()
                .map(|n| self.ident(n))
                .collect();
            let ty_node = Self::field(decl, "type")?;
            let mut ty = self.expr(ty_node)?;
            if names.is_empty() {
                if let Some(star) = token(decl, "*") {
                    ty = Expr::Star {
                        x: Box::new(ty),
                        range: span(star.start_byte(), ty_node.end_byte()),
                    };
                }
            }
            let tag = decl
                .child_by_field_name("tag")
                .map(|n| self.lit(n, LitKind::String));
            fields.push(Field {
                names,
                ty,
                tag,
                range: range_of(decl),
            });
        }
        Ok(FieldList {
            fields,
            range: range_of(list),
        })
    }

    fn interface_elems(&self, node: Node<'_>) -> PResult<FieldList> {
        let mut fields = Vec::new();
        for elem in named(node) {
            let field = match elem.kind() {
                "method_elem" | "method_spec" => {
                    let params = Self::field(elem, "parameters")?;
                    Field {
                        names: vec![self.ident(Self::field(elem, "name")?)],
                        ty: Expr::FuncType(self.signature(elem, params.start_byte())?),
                        tag: None,
                        range: range_of(elem),
                    }
                }
                _ => Field {
                    names: Vec::new(),
                    ty: self.expr(elem)?,
                    tag: None,
                    range: range_of(elem),
                },
            };
            fields.push(field);
        }
        Ok(FieldList {
            fields,
            range: range_of(node),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruff_text_size::Ranged;

    fn parse(source: &str) -> File {
        parse_file(source).unwrap()
    }

    fn func_body(file: &File) -> &[Stmt] {
        for decl in &file.decls {
            if let Decl::Func(func) = decl {
                return &func.body.as_ref().unwrap().stmts;
            }
        }
        panic!("no function in file");
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse("package p\n\nimport (\n\t\"bytes\"\n\tstr \"strings\"\n\t_ \"embed\"\n)\n");
        assert_eq!(file.package.name, "p");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].local_name(), Some("bytes"));
        assert_eq!(file.imports[1].local_name(), Some("str"));
        assert_eq!(file.imports[2].local_name(), None);
        assert!(file.imports_path("strings"));
        assert!(!file.imports_path("embed"));
    }

    #[test]
    fn test_build_constraints_collected() {
        let file = parse("//go:build go1.21 && linux\n\n// doc\npackage p\n");
        assert_eq!(file.build_constraints, vec!["go1.21 && linux".to_owned()]);
    }

    #[test]
    fn test_if_with_init_and_ranges() {
        let src = "package p\nfunc f() {\n\tif v := g(s); v != s {\n\t\tuse(v)\n\t}\n}\n";
        let file = parse(src);
        let Stmt::If(stmt) = &func_body(&file)[0] else {
            panic!("expected if");
        };
        assert_eq!(&src[stmt.init.as_ref().unwrap().range()], "v := g(s)");
        assert_eq!(&src[stmt.cond.range()], "v != s");
        assert_eq!(&src[stmt.body.range], "{\n\t\tuse(v)\n\t}");
        assert_eq!(&src[stmt.range], "if v := g(s); v != s {\n\t\tuse(v)\n\t}");
        let Expr::Binary(cmp) = &stmt.cond else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.op, BinaryOp::Neq);
    }

    #[test]
    fn test_selector_call_ranges() {
        let src = "package p\nvar x = strings.HasPrefix(s, \"v\")\n";
        let file = parse(src);
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected var");
        };
        let Spec::Value(value) = &decl.specs[0] else {
            panic!("expected value spec");
        };
        let Expr::Call(call) = &value.values[0] else {
            panic!("expected call");
        };
        let Expr::Selector(sel) = call.fun.as_ref() else {
            panic!("expected selector");
        };
        assert_eq!(&src[sel.sel.range], "HasPrefix");
        assert_eq!(&src[call.range], "strings.HasPrefix(s, \"v\")");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_else_if_chain() {
        let src = "package p\nfunc f() {\n\tif a {\n\t} else if b {\n\t} else {\n\t}\n}\n";
        let file = parse(src);
        let Stmt::If(stmt) = &func_body(&file)[0] else {
            panic!("expected if");
        };
        let Some(else_branch) = &stmt.else_branch else {
            panic!("expected else");
        };
        let Stmt::If(inner) = else_branch.as_ref() else {
            panic!("expected else if");
        };
        assert!(matches!(inner.else_branch.as_deref(), Some(Stmt::Block(_))));
    }

    #[test]
    fn test_grouped_params() {
        let file = parse("package p\nfunc f(a, b string, c ...int) (n int, err error) {}\n");
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func");
        };
        let names: Vec<_> = func.ty.params.names().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(func.ty.params.fields.len(), 2);
        assert!(matches!(func.ty.params.fields[1].ty, Expr::Ellipsis { .. }));
        assert_eq!(func.ty.results.as_ref().unwrap().fields.len(), 2);
    }

    #[test]
    fn test_statement_forms() {
        let src = r#"package p

func f(ch chan int) {
	var a, b string
	const k = 1
	x := []byte("x")
	x = append(x, 'y')
	n += 2
	n++
	ch <- 1
	go func() {}()
	defer close(ch)
	for i := 0; i < 3; i++ {
		continue
	}
	for {
		break
	}
	for range ch {
	}
	switch v := y.(type) {
	case int, *T:
	default:
	}
	select {
	case v := <-ch:
		_ = v
	default:
	}
outer:
	for k, v := range m {
		_, _ = k, v
		break outer
	}
	return
}
"#;
        let file = parse(src);
        let body = func_body(&file);
        assert_eq!(body.len(), 16);
        assert!(matches!(
            &body[4],
            Stmt::Assign(AssignStmt {
                op: AssignOp::Compound(BinaryOp::Add),
                ..
            })
        ));
        let Stmt::Switch(switch) = &body[12] else {
            panic!("expected type switch");
        };
        assert!(matches!(
            switch.tag.as_deref(),
            Some(Stmt::Assign(AssignStmt {
                op: AssignOp::Define,
                ..
            }))
        ));
        assert_eq!(switch.clauses.len(), 2);
        let Stmt::Select(select) = &body[13] else {
            panic!("expected select");
        };
        assert_eq!(select.clauses[0].body.len(), 1);
        assert!(matches!(body[14], Stmt::Labeled { .. }));
    }

    #[test]
    fn test_struct_and_interface_types() {
        let src = "package p\ntype T struct {\n\tA, B int `json:\"a\"`\n\t*Embedded\n\tio.Reader\n}\ntype I interface {\n\tM(x int) error\n\t~int | string\n}\n";
        let file = parse(src);
        assert_eq!(file.decls.len(), 2);
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let Spec::Type(spec) = &decl.specs[0] else {
            panic!("expected type spec");
        };
        let Expr::StructType { fields, .. } = &spec.ty else {
            panic!("expected struct");
        };
        assert_eq!(fields.fields.len(), 3);
        assert!(fields.fields[0].tag.is_some());
        assert!(matches!(fields.fields[1].ty, Expr::Star { .. }));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = parse_file("package p\nfunc f() {\n\tif {\n\t}\n}\n").unwrap_err();
        assert!(err.offset >= 10, "{err}");
        assert!(parse_file("package broken\nfunc {").is_err());
    }
}
