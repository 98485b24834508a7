//! Input readers - parse source code into the typed syntax tree.

#[cfg(feature = "read-python")]
pub mod python;

#[cfg(feature = "read-python")]
pub use python::read_python;
