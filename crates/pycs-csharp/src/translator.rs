//! Shared translation state.
//!
//! Statement translation, expression rendering and pattern rendering are
//! separate `impl` blocks on [`Translator`] (see `stmt.rs`, `def.rs`,
//! `expr.rs` and `pattern.rs`); this module owns the state they share.

use crate::diagnostic::Diagnostic;
use crate::emitter::Emitter;
use crate::error::{Result, TranslateError};
use crate::options::{RuntimeNames, TranslateOptions};
use crate::scope::{ScopeFrame, ScopeHandle, ScopeKind, ScopeStack};
use indexmap::IndexSet;
use pycs_syntax::Span;

pub(crate) struct Translator<'o> {
    pub(crate) options: &'o TranslateOptions,
    pub(crate) out: Emitter,
    pub(crate) scopes: ScopeStack,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// `using` lines collected from imports, in first-seen order.
    pub(crate) usings: IndexSet<String>,
    /// Rendered class declarations moved after the top-level statements.
    pub(crate) deferred_types: Vec<String>,
    /// Names of the classes whose bodies are being translated.
    pub(crate) class_names: Vec<String>,
    /// Position of the statement being translated.
    pub(crate) span: Span,
}

impl<'o> Translator<'o> {
    pub(crate) fn new(options: &'o TranslateOptions) -> Self {
        Self {
            options,
            out: Emitter::new(options.indent_width),
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
            usings: IndexSet::new(),
            deferred_types: Vec::new(),
            class_names: Vec::new(),
            span: Span::new(1, 1),
        }
    }

    pub(crate) fn runtime(&self) -> &'o RuntimeNames {
        &self.options.runtime
    }

    pub(crate) fn value_type(&self) -> &'o str {
        &self.options.runtime.value_type
    }

    pub(crate) fn emit(&mut self, line: &str) {
        self.out.line(line);
    }

    pub(crate) fn open_block(&mut self) {
        self.out.open_block();
    }

    pub(crate) fn close_block(&mut self) -> Result<()> {
        let span = self.span;
        self.out
            .close_block()
            .map_err(|err| TranslateError::invariant(span, err.to_string()))
    }

    pub(crate) fn dedent(&mut self) -> Result<()> {
        let span = self.span;
        self.out
            .dedent()
            .map_err(|err| TranslateError::invariant(span, err.to_string()))
    }

    /// Run `f` against a fresh buffer starting at `level` and return what it
    /// wrote. The outer buffer is restored afterwards, also on error.
    pub(crate) fn capture<F>(&mut self, level: usize, f: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let inner = Emitter::at_level(self.options.indent_width, level);
        let outer = std::mem::replace(&mut self.out, inner);
        let result = f(self);
        let inner = std::mem::replace(&mut self.out, outer);
        result?;
        if inner.indent_level() != level {
            return Err(self.invariant(format!(
                "captured block ended at indent level {} instead of {level}",
                inner.indent_level()
            )));
        }
        Ok(inner.into_string())
    }

    pub(crate) fn enter_scope(&mut self, kind: ScopeKind) -> Result<ScopeHandle> {
        self.scopes
            .enter_scope(kind)
            .map_err(|err| self.invariant(err.to_string()))
    }

    pub(crate) fn exit_scope(&mut self, handle: ScopeHandle) -> Result<ScopeFrame> {
        self.scopes
            .exit_scope(handle)
            .map_err(|err| self.invariant(err.to_string()))
    }

    pub(crate) fn frame(&mut self) -> &mut ScopeFrame {
        self.scopes.current_mut()
    }

    /// Emit the declaration lines a finished frame needs at the top of its
    /// body.
    pub(crate) fn emit_declarations(&mut self, frame: &ScopeFrame, prefix: &str) {
        if let Some(line) = frame.declaration_line(prefix, self.value_type()) {
            self.emit(&line);
        }
        if let Some(line) = frame.flag_declaration_line(prefix) {
            self.emit(&line);
        }
    }

    pub(crate) fn invariant(&self, message: impl Into<String>) -> TranslateError {
        TranslateError::invariant(self.span, message)
    }

    pub(crate) fn warn(&mut self, node_kind: &str, span: Span, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(node_kind, span, message);
        tracing::warn!(line = span.line, column = span.column, kind = node_kind, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn note(&mut self, node_kind: &str, span: Span, message: impl Into<String>) {
        let diagnostic = Diagnostic::note(node_kind, span, message);
        tracing::debug!(line = span.line, column = span.column, kind = node_kind, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}
