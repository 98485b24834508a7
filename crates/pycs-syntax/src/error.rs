//! Errors produced while reading Python source.

use serde::Serialize;
use std::fmt;

/// A syntax error reported by the parser, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Collects syntax errors as the parse tree is inspected.
///
/// Translation only starts once the sink is empty.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<SyntaxError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: usize, column: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(line, column, %message, "syntax error");
        self.errors.push(SyntaxError {
            line,
            column,
            message,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

/// Error that can occur when reading source code into the syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("{}", format_syntax_errors(.0))]
    Syntax(Vec<SyntaxError>),

    #[error("failed to load grammar: {0}")]
    Language(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}

fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    match errors {
        [] => "syntax error".to_string(),
        [only] => format!("syntax error at {only}"),
        [first, rest @ ..] => format!(
            "syntax error at {first} (and {} more)",
            rest.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_keeps_report_order() {
        let mut sink = ErrorSink::new();
        assert!(!sink.has_errors());
        sink.report(3, 1, "unexpected `)`");
        sink.report(1, 5, "missing `:`");
        let errors = sink.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 3);
        assert_eq!(errors[1].to_string(), "1:5: missing `:`");
    }

    #[test]
    fn test_syntax_error_display() {
        let err = ReadError::Syntax(vec![
            SyntaxError {
                line: 2,
                column: 4,
                message: "unexpected `=`".into(),
            },
            SyntaxError {
                line: 9,
                column: 1,
                message: "missing `)`".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "syntax error at 2:4: unexpected `=` (and 1 more)"
        );
    }
}
