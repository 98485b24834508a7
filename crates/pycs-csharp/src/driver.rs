//! Whole-module translation.

use crate::def::Bindings;
use crate::diagnostic::{Diagnostic, Severity};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::options::TranslateOptions;
use crate::translator::Translator;
use pycs_syntax::{Module, read_python};
use serde::Serialize;

/// Output of translating one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    /// C# source: `using` header, top-level statements, then type
    /// declarations.
    pub code: String,
    /// Best-effort fallbacks taken, in source order of discovery.
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }
}

/// Translate a parsed module into a C# top-level-statements file.
pub fn translate(module: &Module, options: &TranslateOptions) -> Result<Translation> {
    let mut translator = Translator::new(options);
    translator.check_top_level("before")?;
    let bindings = Bindings::of(&module.body);
    let root = translator.scopes.root_mut();
    root.reserve(bindings.locals);
    root.reserve(bindings.globals);
    let body = translator.capture(0, |t| {
        for stmt in &module.body {
            tracing::debug!(line = stmt.span.line, "translating top-level statement");
            t.translate_stmt(stmt)?;
        }
        Ok(())
    })?;
    translator.check_top_level("after")?;
    Ok(translator.finish(body))
}

/// Parse and translate Python source text.
pub fn translate_source(source: &str, options: &TranslateOptions) -> Result<Translation> {
    let module = read_python(source)?;
    translate(&module, options)
}

impl Translator<'_> {
    fn check_top_level(&self, when: &str) -> Result<()> {
        let depth = self.scopes.depth();
        if depth != 1 {
            return Err(self.invariant(format!(
                "scope stack at depth {depth} {when} the top level, expected 1"
            )));
        }
        Ok(())
    }

    fn finish(self, body: String) -> Translation {
        let mut out = Emitter::new(self.options.indent_width);
        for using in &self.usings {
            out.line(using);
        }
        if !self.usings.is_empty() {
            out.line("");
        }
        let root = self.scopes.root();
        if let Some(line) = root.declaration_line("", self.value_type()) {
            out.line(&line);
        }
        if let Some(line) = root.flag_declaration_line("") {
            out.line(&line);
        }
        out.push_raw(&body);
        for ty in &self.deferred_types {
            if !out.is_empty() {
                out.line("");
            }
            out.push_raw(ty);
        }
        tracing::debug!(
            diagnostics = self.diagnostics.len(),
            types = self.deferred_types.len(),
            "translation finished"
        );
        Translation {
            code: out.into_string(),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_module() {
        let out = translate(&Module::default(), &TranslateOptions::default()).unwrap();
        assert_eq!(out.code, "");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_declarations_come_first() {
        let out = translate_source("x = 1\ny = x + 2\nprint(y)\n", &TranslateOptions::default())
            .unwrap();
        assert_eq!(out.code, "PyVariable x, y;\nx = 1;\ny = x + 2;\nprint(y);\n");
    }
}
