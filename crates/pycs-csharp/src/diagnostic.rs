//! Non-fatal findings reported alongside the translated code.

use pycs_syntax::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The output does not preserve the source's meaning.
    Warning,
    /// The output is valid but was restructured in a way worth knowing.
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Note => f.write_str("note"),
        }
    }
}

/// A construct that was translated best-effort or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Python construct the diagnostic is about (`yield_expression`, `class_definition`).
    pub node_kind: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(node_kind: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            node_kind: node_kind.into(),
            line: span.line,
            column: span.column,
            message: message.into(),
        }
    }

    pub fn note(node_kind: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            ..Self::warning(node_kind, span, message)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {} [{}]",
            self.line, self.column, self.severity, self.message, self.node_kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning("starred", Span::new(3, 7), "unpacking is not translated");
        assert_eq!(
            diag.to_string(),
            "3:7: warning: unpacking is not translated [starred]"
        );
        let note = Diagnostic::note("class_definition", Span::new(1, 1), "moved");
        assert_eq!(note.severity, Severity::Note);
        assert_eq!(note.to_string(), "1:1: note: moved [class_definition]");
    }

    #[test]
    fn test_json_shape() {
        let diag = Diagnostic::note("raise_statement", Span::new(2, 5), "cause dropped");
        assert_eq!(
            serde_json::to_value(&diag).unwrap(),
            serde_json::json!({
                "severity": "note",
                "node_kind": "raise_statement",
                "line": 2,
                "column": 5,
                "message": "cause dropped",
            })
        );
    }
}
