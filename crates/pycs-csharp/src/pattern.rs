//! `match` patterns as C# switch patterns.

use crate::literal::escape_identifier;
use crate::translator::Translator;
use pycs_syntax::Pattern;

impl Translator<'_> {
    /// Render a case pattern. When the subject is a tuple, a top-level
    /// sequence becomes a positional pattern so `match a, b:` lines up.
    pub(crate) fn render_case_pattern(&mut self, pattern: &Pattern, tuple_subject: bool) -> String {
        match pattern {
            Pattern::Sequence(items)
                if tuple_subject && !items.iter().any(|p| matches!(p, Pattern::Star(_))) =>
            {
                let items: Vec<_> = items.iter().map(|p| self.render_pattern(p)).collect();
                format!("({})", items.join(", "))
            }
            _ => self.render_pattern(pattern),
        }
    }

    pub(crate) fn render_pattern(&mut self, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Wildcard => "_".to_string(),
            Pattern::Capture(name) => format!("var {}", escape_identifier(name)),
            Pattern::Literal(expr) => self.render_expr(expr),
            Pattern::Value(dotted) => dotted
                .split('.')
                .map(escape_identifier)
                .collect::<Vec<_>>()
                .join("."),
            Pattern::Sequence(items) => {
                let items: Vec<_> = items.iter().map(|p| self.render_pattern(p)).collect();
                format!("[{}]", items.join(", "))
            }
            Pattern::Star(None) => "..".to_string(),
            Pattern::Star(Some(name)) => format!(".. var {}", escape_identifier(name)),
            Pattern::Mapping { items, rest } => {
                let span = self.span;
                self.warn(
                    "dict_pattern",
                    span,
                    "mapping patterns have no C# equivalent; rendered as a property pattern",
                );
                let mut entries: Vec<_> = items
                    .iter()
                    .map(|(key, value)| {
                        let key = self.render_pattern(key);
                        let value = self.render_pattern(value);
                        format!("{key}: {value}")
                    })
                    .collect();
                if let Some(rest) = rest {
                    entries.push(format!(".. var {}", escape_identifier(rest)));
                }
                format!("{{ {} }}", entries.join(", "))
            }
            Pattern::Class {
                cls,
                positional,
                keywords,
            } => {
                let mut text = cls.clone();
                if !positional.is_empty() {
                    let items: Vec<_> = positional.iter().map(|p| self.render_pattern(p)).collect();
                    text.push_str(&format!("({})", items.join(", ")));
                }
                if !keywords.is_empty() {
                    let props: Vec<_> = keywords
                        .iter()
                        .map(|(name, p)| format!("{}: {}", escape_identifier(name), self.render_pattern(p)))
                        .collect();
                    text.push_str(&format!(" {{ {} }}", props.join(", ")));
                }
                text
            }
            Pattern::Or(alternatives) => {
                let items: Vec<_> = alternatives
                    .iter()
                    .map(|p| self.render_pattern(p))
                    .collect();
                items.join(" or ")
            }
            Pattern::As { pattern, name } => {
                let name = escape_identifier(name);
                match pattern.as_ref() {
                    Pattern::Wildcard => format!("var {name}"),
                    Pattern::Or(_) => format!("({}) and var {name}", self.render_pattern(pattern)),
                    inner => format!("{} and var {name}", self.render_pattern(inner)),
                }
            }
            Pattern::Unsupported { kind, text, span } => {
                self.warn(kind, *span, "no C# pattern for this; source kept verbatim");
                text.clone()
            }
        }
    }
}
