//! Translation options.
//!
//! The C# side of a translation leans on a small runtime library: a dynamic
//! value type plus container types standing in for Python's. Their names
//! are configurable so generated code can target different runtimes.
//!
//! ```toml
//! indent_width = 4
//!
//! [runtime]
//! value_type = "PyVariable"
//! pow_fn = "pow"
//! ```

use serde::{Deserialize, Serialize};

/// Options for a single translation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    pub runtime: RuntimeNames,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            runtime: RuntimeNames::default(),
        }
    }
}

/// Names of runtime-library types and helpers referenced by generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeNames {
    /// Declared type of every translated variable and parameter.
    pub value_type: String,
    pub list_type: String,
    pub dict_type: String,
    pub set_type: String,
    /// Used for tuples C# value tuples cannot express (zero or one element).
    pub tuple_type: String,
    /// Helper called for `**`.
    pub pow_fn: String,
    /// Helper called for `//`.
    pub floordiv_fn: String,
    /// Helper called for `@`.
    pub matmul_fn: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            value_type: "PyVariable".into(),
            list_type: "list".into(),
            dict_type: "dict".into(),
            set_type: "set".into(),
            tuple_type: "tuple".into(),
            pow_fn: "pow".into(),
            floordiv_fn: "floordiv".into(),
            matmul_fn: "matmul".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options: TranslateOptions = toml::from_str(
            r#"
[runtime]
value_type = "dynamic"
"#,
        )
        .unwrap();
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.runtime.value_type, "dynamic");
        assert_eq!(options.runtime.pow_fn, "pow");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let options: TranslateOptions = toml::from_str("").unwrap();
        assert_eq!(options, TranslateOptions::default());
    }
}
