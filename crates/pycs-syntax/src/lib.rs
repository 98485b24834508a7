//! Typed Python syntax tree for the pycs translator.
//!
//! `pycs-syntax` turns Python 3 source into a closed, typed tree that later
//! stages can match on exhaustively. Parsing is delegated to tree-sitter;
//! this crate only shapes the concrete tree into [`ast`] types and reports
//! syntax errors with 1-based positions.
//!
//! # Example
//!
//! ```ignore
//! use pycs_syntax::{input, StmtKind};
//!
//! let module = input::read_python("x = 1\n")?;
//! assert!(matches!(module.body[0].kind, StmtKind::Assign { .. }));
//! ```
//!
//! Anything the reader does not understand survives as an `Unsupported`
//! node carrying the original source text, so a translator can fall back
//! to a best-effort rendering instead of dropping code.

pub mod ast;
pub mod error;
pub mod input;

pub use ast::{
    Arg, BinaryOp, Block, BoolOp, ClassDef, CmpOp, Comprehension, ComprehensionClause,
    ComprehensionKind, DictItem, ExceptHandler, Expr, FString, FStringPart, FunctionDef,
    IfBranch, ImportName, MatchCase, Module, Param, ParamKind, Pattern, Span, Stmt, StmtKind,
    StrLit, UnaryOp, WithItem,
};
pub use error::{ErrorSink, ReadError, SyntaxError};

#[cfg(feature = "read-python")]
pub use input::read_python;
