//! `match` patterns.

use super::ReadContext;
use crate::ast::*;
use crate::error::ReadError;
use tree_sitter::Node;

impl<'a> ReadContext<'a> {
    pub(super) fn read_pattern(&self, node: Node) -> Result<Pattern, ReadError> {
        match node.kind() {
            "case_pattern" => self.read_case_pattern(node),
            "as_pattern" => {
                let children = self.named_children(node);
                let (Some(inner), Some(alias)) = (children.first(), children.last()) else {
                    return Ok(self.unsupported_pattern(node));
                };
                if children.len() < 2 {
                    return Ok(self.unsupported_pattern(node));
                }
                Ok(Pattern::As {
                    pattern: Box::new(self.read_pattern(*inner)?),
                    name: self.node_text(*alias).to_string(),
                })
            }
            "union_pattern" => Ok(Pattern::Or(self.read_patterns(node)?)),
            "list_pattern" | "tuple_pattern" => Ok(Pattern::Sequence(self.read_patterns(node)?)),
            "dict_pattern" => self.read_dict_pattern(node),
            "class_pattern" => self.read_class_pattern(node),
            "splat_pattern" => {
                let name = self
                    .named_children(node)
                    .first()
                    .map(|n| self.node_text(*n).to_string())
                    .filter(|n| n != "_");
                Ok(Pattern::Star(name))
            }
            "dotted_name" | "identifier" => {
                let text = self.node_text(node);
                Ok(if text == "_" {
                    Pattern::Wildcard
                } else if text.contains('.') {
                    Pattern::Value(text.to_string())
                } else {
                    Pattern::Capture(text.to_string())
                })
            }
            "string" | "concatenated_string" | "integer" | "float" | "true" | "false" | "none" => {
                Ok(Pattern::Literal(self.read_expr(node)?))
            }
            _ => Ok(self.unsupported_pattern(node)),
        }
    }

    fn read_patterns(&self, node: Node) -> Result<Vec<Pattern>, ReadError> {
        self.named_children(node)
            .into_iter()
            .map(|n| self.read_pattern(n))
            .collect()
    }

    /// A case_pattern wraps exactly one pattern, or is the anonymous `_`,
    /// or is a negative number (`-` token plus the literal).
    fn read_case_pattern(&self, node: Node) -> Result<Pattern, ReadError> {
        let children = self.named_children(node);
        let text = self.node_text(node).trim();
        match children.as_slice() {
            [] if text == "_" => Ok(Pattern::Wildcard),
            [only] if text.starts_with('-') && matches!(only.kind(), "integer" | "float") => {
                Ok(Pattern::Literal(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(self.read_expr(*only)?),
                }))
            }
            [only] => self.read_pattern(*only),
            _ => Ok(self.unsupported_pattern(node)),
        }
    }

    fn read_dict_pattern(&self, node: Node) -> Result<Pattern, ReadError> {
        let keys = self.fields(node, "key");
        let values = self.fields(node, "value");
        let items = keys
            .into_iter()
            .zip(values)
            .map(|(k, v)| Ok((self.read_pattern(k)?, self.read_pattern(v)?)))
            .collect::<Result<Vec<_>, ReadError>>()?;
        let rest = self
            .named_children(node)
            .into_iter()
            .find(|c| c.kind() == "splat_pattern")
            .and_then(|splat| self.named_children(splat).first().copied())
            .map(|n| self.node_text(n).to_string());
        Ok(Pattern::Mapping { items, rest })
    }

    fn read_class_pattern(&self, node: Node) -> Result<Pattern, ReadError> {
        let children = self.named_children(node);
        let cls = children
            .iter()
            .find(|c| c.kind() == "dotted_name")
            .map(|c| self.node_text(*c).to_string())
            .ok_or_else(|| ReadError::Parse("class_pattern missing class name".into()))?;

        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for child in children.iter().filter(|c| c.kind() != "dotted_name") {
            let inner = match child.kind() {
                "case_pattern" => self.named_children(*child).first().copied(),
                _ => Some(*child),
            };
            match inner {
                Some(kw) if kw.kind() == "keyword_pattern" => {
                    let parts = self.named_children(kw);
                    let (Some(name), Some(value)) = (parts.first(), parts.get(1)) else {
                        return Ok(self.unsupported_pattern(node));
                    };
                    keywords.push((
                        self.node_text(*name).to_string(),
                        self.read_pattern(*value)?,
                    ));
                }
                _ => positional.push(self.read_pattern(*child)?),
            }
        }

        Ok(Pattern::Class {
            cls,
            positional,
            keywords,
        })
    }

    fn unsupported_pattern(&self, node: Node) -> Pattern {
        Pattern::Unsupported {
            kind: node.kind().to_string(),
            text: self.node_text(node).to_string(),
            span: self.span(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::input::read_python;

    fn patterns(source: &str) -> Vec<Pattern> {
        let module = read_python(source).unwrap();
        let Some(StmtKind::Match { cases, .. }) = module.body.into_iter().next().map(|s| s.kind)
        else {
            panic!("expected match statement");
        };
        cases.into_iter().map(|c| c.pattern).collect()
    }

    #[test]
    fn test_literal_and_capture_patterns() {
        let found = patterns(
            "match x:\n    case 1:\n        pass\n    case -2:\n        pass\n    case None:\n        pass\n    case other:\n        pass\n",
        );
        assert_eq!(found[0], Pattern::Literal(Expr::int(1)));
        assert_eq!(
            found[1],
            Pattern::Literal(Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::int(2)),
            })
        );
        assert_eq!(found[2], Pattern::Literal(Expr::None));
        assert_eq!(found[3], Pattern::Capture("other".into()));
    }

    #[test]
    fn test_or_and_value_patterns() {
        let found = patterns(
            "match c:\n    case Color.RED | Color.BLUE:\n        pass\n",
        );
        assert_eq!(
            found[0],
            Pattern::Or(vec![
                Pattern::Value("Color.RED".into()),
                Pattern::Value("Color.BLUE".into()),
            ])
        );
    }

    #[test]
    fn test_sequence_with_star() {
        let found = patterns("match xs:\n    case [first, *rest]:\n        pass\n");
        assert_eq!(
            found[0],
            Pattern::Sequence(vec![
                Pattern::Capture("first".into()),
                Pattern::Star(Some("rest".into())),
            ])
        );
    }

    #[test]
    fn test_class_pattern_with_keywords() {
        let found = patterns("match p:\n    case Point(0, y=ys):\n        pass\n");
        assert_eq!(
            found[0],
            Pattern::Class {
                cls: "Point".into(),
                positional: vec![Pattern::Literal(Expr::int(0))],
                keywords: vec![("y".into(), Pattern::Capture("ys".into()))],
            }
        );
    }

    #[test]
    fn test_as_pattern() {
        let found = patterns("match v:\n    case [1, 2] as pair:\n        pass\n");
        assert!(matches!(
            &found[0],
            Pattern::As { name, pattern } if name == "pair" && matches!(**pattern, Pattern::Sequence(_))
        ));
    }
}
