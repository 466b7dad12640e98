//! State shared by the rules while one sweep runs.

use crate::engine::RewriteOptions;
use jsnorm_ast::types::ScopeId;
use jsnorm_core::text::TextSpan;
use jsnorm_diagnostics::{Diagnostic, DiagnosticCollection, DiagnosticMessage};
use jsnorm_resolver::ScopeTree;
use tracing::trace;

/// What a rule may consult or produce besides its replacement node.
pub struct RuleContext<'a> {
    pub tree: &'a mut ScopeTree,
    pub diagnostics: &'a mut DiagnosticCollection,
    /// The function (or program) scope enclosing the node being rewritten.
    pub scope: ScopeId,
    pub options: &'a RewriteOptions,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        tree: &'a mut ScopeTree,
        diagnostics: &'a mut DiagnosticCollection,
        scope: ScopeId,
    ) -> Self {
        Self {
            tree,
            diagnostics,
            scope,
            options: &RewriteOptions::DEFAULT,
        }
    }

    pub fn with_options(mut self, options: &'a RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// A fresh `$tmpN`, declared in the enclosing function when the sweep ends.
    pub fn temporary(&mut self) -> String {
        let name = self.tree.mint_temporary(self.scope);
        trace!(%name, "minted temporary");
        name
    }

    /// A fresh `$labelN` unused in the enclosing function.
    pub fn label(&mut self) -> String {
        self.tree.mint_label(self.scope)
    }

    pub fn warn(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics.add(Diagnostic::with_span(span, message, args));
    }
}
