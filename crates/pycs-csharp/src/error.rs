//! Translation errors.

use pycs_syntax::{ReadError, Span};

/// Error that aborts a translation.
///
/// Unsupported constructs never produce one of these; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Internal bookkeeping went out of balance. Always a translator bug.
    #[error("internal error at {line}:{column}: {message}")]
    Invariant {
        message: String,
        line: usize,
        column: usize,
    },
}

impl TranslateError {
    pub(crate) fn invariant(span: Span, message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
