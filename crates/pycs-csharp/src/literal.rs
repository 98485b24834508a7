//! Lexical conversions: identifiers, numbers and string literals.

use pycs_syntax::StrLit;

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Prefix C# reserved words with `@` so they stay usable as names.
pub fn escape_identifier(name: &str) -> String {
    if CSHARP_KEYWORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Integer literal. Octal has no C# spelling and is converted to decimal;
/// Python 2 `L` suffixes are dropped.
pub fn int_literal(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if let Some(digits) = lower.strip_prefix("0o") {
        let digits: String = digits.chars().filter(|c| *c != '_').collect();
        if let Ok(value) = u128::from_str_radix(&digits, 8) {
            return value.to_string();
        }
    }
    text.trim_end_matches(['l', 'L']).to_string()
}

/// Float literal. C# needs a digit after the decimal point (`1.` is `1.0`).
pub fn float_literal(text: &str) -> String {
    match text.find('.') {
        Some(dot) if !text[dot + 1..].starts_with(|c: char| c.is_ascii_digit()) => {
            format!("{}.0{}", &text[..dot], &text[dot + 1..])
        }
        _ => text.to_string(),
    }
}

/// Double-quoted C# string for a Python string literal.
///
/// Raw strings become verbatim strings (`@"..."`), which also keep any
/// embedded newlines of triple-quoted sources.
pub fn string_literal(lit: &StrLit) -> String {
    if lit.raw {
        format!("@\"{}\"", lit.body.replace('"', "\"\""))
    } else {
        format!("\"{}\"", escape_body(&lit.body))
    }
}

/// Literal text of an f-string segment, for use inside `$"..."`.
/// `{{` and `}}` mean the same in both languages and pass through.
pub fn interpolated_segment(body: &str, raw: bool) -> String {
    if raw {
        body.replace('"', "\"\"")
    } else {
        escape_body(body)
    }
}

/// Re-escape the body of a single- or double-quoted Python string for a
/// double-quoted C# string. Escape sequences both languages share are
/// kept as written.
fn escape_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                // Backslash-newline continues the line.
                Some('\n') => {}
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(body: &str, raw: bool) -> StrLit {
        StrLit {
            body: body.into(),
            raw,
            bytes: false,
        }
    }

    #[test]
    fn test_keywords_are_escaped() {
        assert_eq!(escape_identifier("string"), "@string");
        assert_eq!(escape_identifier("params"), "@params");
        assert_eq!(escape_identifier("count"), "count");
    }

    #[test]
    fn test_int_literals() {
        assert_eq!(int_literal("0o17"), "15");
        assert_eq!(int_literal("0O1_0"), "8");
        assert_eq!(int_literal("0x1F"), "0x1F");
        assert_eq!(int_literal("1_000"), "1_000");
        assert_eq!(int_literal("10L"), "10");
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(float_literal("1."), "1.0");
        assert_eq!(float_literal("1.e5"), "1.0e5");
        assert_eq!(float_literal(".5"), ".5");
        assert_eq!(float_literal("2.25"), "2.25");
        assert_eq!(float_literal("1e3"), "1e3");
    }

    #[test]
    fn test_quotes_are_normalized() {
        assert_eq!(string_literal(&lit("it\\'s", false)), "\"it's\"");
        assert_eq!(string_literal(&lit("say \"hi\"", false)), "\"say \\\"hi\\\"\"");
        assert_eq!(string_literal(&lit("tab\\there", false)), "\"tab\\there\"");
    }

    #[test]
    fn test_multiline_body_is_escaped() {
        assert_eq!(string_literal(&lit("a\nb", false)), "\"a\\nb\"");
    }

    #[test]
    fn test_raw_strings_are_verbatim() {
        assert_eq!(string_literal(&lit("\\d+\"", true)), "@\"\\d+\"\"\"");
    }
}
