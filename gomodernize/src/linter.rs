use crate::rules::{Context, Diagnostic, Rule};
use crate::syntax::ast::{File, Stmt};
use crate::syntax::visitor::{walk_file, walk_stmt, Visitor};

/// Visitor for traversing the syntax tree and applying rules.
pub struct LinterVisitor<'a> {
    rules: Vec<Box<dyn Rule>>,
    context: Context<'a>,
    /// List of diagnostics collected during the traversal.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> LinterVisitor<'a> {
    /// Creates a new `LinterVisitor`, keeping only the rules that apply to
    /// the file described by `context`.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>, context: Context<'a>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| rule.is_active(&context))
            .collect();
        Self {
            rules,
            context,
            diagnostics: Vec::new(),
        }
    }

    /// Runs every active rule over `file` in pre-order.
    #[must_use]
    pub fn run(mut self, file: &File) -> Vec<Diagnostic> {
        if !self.rules.is_empty() {
            walk_file(&mut self, file);
        }
        self.diagnostics
    }
}

impl<'b> Visitor<'b> for LinterVisitor<'_> {
    fn visit_stmt(&mut self, stmt: &'b Stmt) {
        for rule in &mut self.rules {
            if let Some(mut diagnostics) = rule.enter_stmt(stmt, &self.context) {
                self.diagnostics.append(&mut diagnostics);
            }
        }
        walk_stmt(self, stmt);
    }
}
