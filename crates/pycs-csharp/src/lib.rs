//! Python to C# translation.
//!
//! Takes the typed syntax tree from [`pycs_syntax`] and renders a C# source
//! file using top-level statements:
//!
//! ```text
//! using System.IO;          // hoisted imports
//!
//! PyVariable x, y;          // module-level declarations
//! x = 1;
//! y = x + 2;
//!
//! class Point               // classes, after the statements
//! {
//!     ...
//! }
//! ```
//!
//! Python values are dynamically typed, so every variable is declared with
//! one runtime value type (`PyVariable` unless configured otherwise, see
//! [`RuntimeNames`]). Constructs without a faithful C# spelling are rendered
//! best-effort and reported as [`Diagnostic`]s instead of failing.
//!
//! ```ignore
//! use pycs_csharp::{TranslateOptions, translate_source};
//!
//! let out = translate_source("x = 1\n", &TranslateOptions::default())?;
//! assert_eq!(out.code, "PyVariable x;\nx = 1;\n");
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod error;
pub mod literal;
pub mod options;
pub mod scope;

mod def;
mod driver;
mod expr;
mod pattern;
mod stmt;
mod translator;

pub use diagnostic::{Diagnostic, Severity};
pub use driver::{Translation, translate, translate_source};
pub use emitter::{Emitter, IndentUnderflow};
pub use error::{Result, TranslateError};
pub use options::{RuntimeNames, TranslateOptions};
pub use scope::{BreakTarget, ScopeError, ScopeFrame, ScopeHandle, ScopeKind, ScopeStack};
