//! Expressions.

use super::ReadContext;
use crate::ast::*;
use crate::error::ReadError;
use tree_sitter::Node;

impl<'a> ReadContext<'a> {
    pub(super) fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            // Names
            "identifier" | "keyword_identifier" => Ok(Expr::Name(self.node_text(node).to_string())),

            // Literals
            "integer" | "float" => Ok(self.read_number(node)),
            "string" => self.read_string(node),
            "concatenated_string" => {
                let mut parts = self
                    .named_children(node)
                    .into_iter()
                    .map(|n| self.read_expr(n));
                let first = parts
                    .next()
                    .ok_or_else(|| ReadError::Parse("concatenated_string is empty".into()))??;
                parts.try_fold(first, |acc, part| {
                    Ok(Expr::binary(acc, BinaryOp::Add, part?))
                })
            }
            "true" => Ok(Expr::Bool(true)),
            "false" => Ok(Expr::Bool(false)),
            "none" => Ok(Expr::None),
            "ellipsis" => Ok(Expr::Ellipsis),

            // Operators
            "binary_operator" => {
                let op_text = self.node_text(self.field(node, "operator")?);
                let Some(op) = BinaryOp::from_symbol(op_text) else {
                    return Ok(self.unsupported(node));
                };
                Ok(Expr::binary(
                    self.read_expr(self.field(node, "left")?)?,
                    op,
                    self.read_expr(self.field(node, "right")?)?,
                ))
            }
            "unary_operator" => {
                let op = match self.node_text(self.field(node, "operator")?) {
                    "-" => UnaryOp::Neg,
                    "+" => UnaryOp::Pos,
                    "~" => UnaryOp::Invert,
                    _ => return Ok(self.unsupported(node)),
                };
                Ok(Expr::UnaryOp {
                    op,
                    operand: Box::new(self.read_expr(self.field(node, "argument")?)?),
                })
            }
            "not_operator" => Ok(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(self.read_expr(self.field(node, "argument")?)?),
            }),
            "boolean_operator" => {
                let op = match self.node_text(self.field(node, "operator")?) {
                    "and" => BoolOp::And,
                    "or" => BoolOp::Or,
                    _ => return Ok(self.unsupported(node)),
                };
                Ok(Expr::BoolOp {
                    op,
                    left: Box::new(self.read_expr(self.field(node, "left")?)?),
                    right: Box::new(self.read_expr(self.field(node, "right")?)?),
                })
            }
            "comparison_operator" => self.read_comparison(node),
            "conditional_expression" => {
                let children = self.named_children(node);
                let [body, test, orelse] = children.as_slice() else {
                    return Err(ReadError::Parse(
                        "conditional_expression needs three operands".into(),
                    ));
                };
                Ok(Expr::IfExp {
                    test: Box::new(self.read_expr(*test)?),
                    body: Box::new(self.read_expr(*body)?),
                    orelse: Box::new(self.read_expr(*orelse)?),
                })
            }
            "lambda" => Ok(Expr::Lambda {
                params: node
                    .child_by_field_name("parameters")
                    .map(|p| self.read_parameters(p))
                    .transpose()?
                    .unwrap_or_default(),
                body: Box::new(self.read_expr(self.field(node, "body")?)?),
            }),
            "named_expression" => Ok(Expr::NamedExpr {
                target: self.node_text(self.field(node, "name")?).to_string(),
                value: Box::new(self.read_expr(self.field(node, "value")?)?),
            }),

            // Access
            "attribute" => Ok(Expr::attr(
                self.read_expr(self.field(node, "object")?)?,
                self.node_text(self.field(node, "attribute")?),
            )),
            "subscript" => Ok(Expr::Subscript {
                value: Box::new(self.read_expr(self.field(node, "value")?)?),
                index: self
                    .fields(node, "subscript")
                    .into_iter()
                    .map(|n| self.read_expr(n))
                    .collect::<Result<_, _>>()?,
            }),
            "slice" => self.read_slice(node),
            "call" => self.read_call(node),

            // Displays
            "list" | "list_pattern" => Ok(Expr::List(self.read_elements(node)?)),
            "set" => Ok(Expr::Set(self.read_elements(node)?)),
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                Ok(Expr::Tuple(self.read_elements(node)?))
            }
            "dictionary" => self.read_dictionary(node),
            "list_comprehension" => self.read_comprehension(node, ComprehensionKind::List),
            "set_comprehension" => self.read_comprehension(node, ComprehensionKind::Set),
            "dictionary_comprehension" => self.read_comprehension(node, ComprehensionKind::Dict),
            "generator_expression" => self.read_comprehension(node, ComprehensionKind::Generator),
            "list_splat" | "list_splat_pattern" | "parenthesized_list_splat" => {
                Ok(Expr::Starred(Box::new(self.read_expr(self.first_named(node)?)?)))
            }

            // Wrappers
            "parenthesized_expression" | "type" | "expression" => {
                self.read_expr(self.first_named(node)?)
            }
            "await" => Ok(Expr::Await(Box::new(
                self.read_expr(self.first_named(node)?)?,
            ))),
            "yield" => {
                let value = self.named_children(node).into_iter().next();
                if self.has_token(node, "from") {
                    let value = value
                        .ok_or_else(|| ReadError::Parse("yield from has no operand".into()))?;
                    Ok(Expr::YieldFrom(Box::new(self.read_expr(value)?)))
                } else {
                    Ok(Expr::Yield(
                        value.map(|v| self.read_expr(v).map(Box::new)).transpose()?,
                    ))
                }
            }

            _ => Ok(self.unsupported(node)),
        }
    }

    fn unsupported(&self, node: Node) -> Expr {
        tracing::debug!(kind = node.kind(), "unsupported expression");
        Expr::Unsupported {
            kind: node.kind().to_string(),
            text: self.node_text(node).to_string(),
            span: self.span(node),
        }
    }

    fn read_number(&self, node: Node) -> Expr {
        let text = self.node_text(node).to_string();
        if text.ends_with(['j', 'J']) {
            Expr::Imaginary(text)
        } else if node.kind() == "integer" {
            Expr::Int(text)
        } else {
            Expr::Float(text)
        }
    }

    /// Split a string token into prefix flags and body; f-strings keep their
    /// interpolations as typed expressions.
    fn read_string(&self, node: Node) -> Result<Expr, ReadError> {
        let text = self.node_text(node);
        let prefix_len = text.find(['"', '\'']).unwrap_or(0);
        let prefix = text[..prefix_len].to_ascii_lowercase();
        let rest = &text[prefix_len..];
        let quote_len = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
            3
        } else {
            1
        };

        let body_start = node.start_byte() + prefix_len + quote_len;
        let body_end = node.end_byte().saturating_sub(quote_len).max(body_start);
        let raw = prefix.contains('r');

        if !prefix.contains('f') {
            return Ok(Expr::Str(StrLit {
                body: self.slice(body_start, body_end).to_string(),
                raw,
                bytes: prefix.contains('b'),
            }));
        }

        let mut parts = Vec::new();
        let mut pos = body_start;
        for child in self.named_children(node) {
            if child.kind() != "interpolation" {
                continue;
            }
            if child.start_byte() > pos {
                parts.push(FStringPart::Literal(
                    self.slice(pos, child.start_byte()).to_string(),
                ));
            }
            let expr = match child.child_by_field_name("expression") {
                Some(e) => e,
                None => self.first_named(child)?,
            };
            let format_spec = self
                .named_children(child)
                .into_iter()
                .find(|c| c.kind() == "format_specifier")
                .map(|spec| {
                    self.node_text(spec)
                        .trim_start_matches(':')
                        .to_string()
                });
            parts.push(FStringPart::Interpolation {
                expr: self.read_expr(expr)?,
                format_spec,
            });
            pos = child.end_byte();
        }
        if body_end > pos {
            parts.push(FStringPart::Literal(self.slice(pos, body_end).to_string()));
        }

        Ok(Expr::FString(FString { parts, raw }))
    }

    fn read_comparison(&self, node: Node) -> Result<Expr, ReadError> {
        let mut operands = Vec::new();
        let mut operators = Vec::new();
        let mut pending_not = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            if child.is_named() {
                operands.push(self.read_expr(child)?);
                continue;
            }
            let symbol = self
                .node_text(child)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            // Some grammar versions split `not in` / `is not` into two tokens.
            let follows_is =
                operands.len() == operators.len() && operators.last() == Some(&CmpOp::Is);
            if symbol == "not" && follows_is {
                operators.pop();
                operators.push(CmpOp::IsNot);
            } else if symbol == "not" {
                pending_not = true;
            } else if symbol == "in" && pending_not {
                operators.push(CmpOp::NotIn);
                pending_not = false;
            } else {
                match CmpOp::from_symbol(&symbol) {
                    Some(op) => operators.push(op),
                    None => return Ok(self.unsupported(node)),
                }
            }
        }

        let mut operands = operands.into_iter();
        let left = operands
            .next()
            .ok_or_else(|| ReadError::Parse("comparison_operator has no operands".into()))?;
        let comparisons: Vec<_> = operators.into_iter().zip(operands).collect();
        if comparisons.is_empty() {
            return Err(ReadError::Parse("comparison_operator has no operators".into()));
        }
        Ok(Expr::Compare {
            left: Box::new(left),
            comparisons,
        })
    }

    /// `lower:upper:step`, any part optional. The slice node has no fields,
    /// so parts are assigned by counting colons.
    fn read_slice(&self, node: Node) -> Result<Expr, ReadError> {
        let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut index = 0;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == ":" {
                index += 1;
            } else if child.is_named() && !child.is_extra() && index < 3 {
                parts[index] = Some(Box::new(self.read_expr(child)?));
            }
        }
        let [lower, upper, step] = parts;
        Ok(Expr::Slice { lower, upper, step })
    }

    fn read_call(&self, node: Node) -> Result<Expr, ReadError> {
        let func = self.read_expr(self.field(node, "function")?)?;
        let arguments = self.field(node, "arguments")?;
        let args = match arguments.kind() {
            // f(x for x in xs)
            "generator_expression" => vec![Arg::Positional(self.read_expr(arguments)?)],
            _ => self.read_arguments(arguments)?,
        };
        Ok(Expr::Call {
            func: Box::new(func),
            args,
        })
    }

    pub(super) fn read_arguments(&self, node: Node) -> Result<Vec<Arg>, ReadError> {
        self.named_children(node)
            .into_iter()
            .map(|child| {
                Ok(match child.kind() {
                    "keyword_argument" => Arg::Keyword {
                        name: self.node_text(self.field(child, "name")?).to_string(),
                        value: self.read_expr(self.field(child, "value")?)?,
                    },
                    "list_splat" | "parenthesized_list_splat" => {
                        Arg::Star(self.read_expr(self.first_named(child)?)?)
                    }
                    "dictionary_splat" => Arg::DoubleStar(self.read_expr(self.first_named(child)?)?),
                    _ => Arg::Positional(self.read_expr(child)?),
                })
            })
            .collect()
    }

    fn read_elements(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        self.named_children(node)
            .into_iter()
            .map(|n| self.read_expr(n))
            .collect()
    }

    fn read_dictionary(&self, node: Node) -> Result<Expr, ReadError> {
        let items = self
            .named_children(node)
            .into_iter()
            .map(|child| match child.kind() {
                "pair" => Ok(DictItem::Pair {
                    key: self.read_expr(self.field(child, "key")?)?,
                    value: self.read_expr(self.field(child, "value")?)?,
                }),
                "dictionary_splat" => Ok(DictItem::Splat(self.read_expr(self.first_named(child)?)?)),
                other => Err(ReadError::UnexpectedNode {
                    expected: "pair".into(),
                    got: other.into(),
                }),
            })
            .collect::<Result<_, _>>()?;
        Ok(Expr::Dict(items))
    }

    fn read_comprehension(&self, node: Node, kind: ComprehensionKind) -> Result<Expr, ReadError> {
        let body = self.field(node, "body")?;
        let (element, value) = if kind == ComprehensionKind::Dict {
            (
                self.read_expr(self.field(body, "key")?)?,
                Some(self.read_expr(self.field(body, "value")?)?),
            )
        } else {
            (self.read_expr(body)?, None)
        };

        let mut clauses = Vec::new();
        for child in self.named_children(node) {
            match child.kind() {
                "for_in_clause" => {
                    let iters = self.fields(child, "right");
                    let iter = match iters.as_slice() {
                        [only] => self.read_expr(*only)?,
                        many => Expr::Tuple(
                            many.iter()
                                .map(|n| self.read_expr(*n))
                                .collect::<Result<_, _>>()?,
                        ),
                    };
                    clauses.push(ComprehensionClause::For {
                        target: self.read_expr(self.field(child, "left")?)?,
                        iter,
                    });
                }
                "if_clause" => {
                    clauses.push(ComprehensionClause::If(
                        self.read_expr(self.first_named(child)?)?,
                    ));
                }
                _ => {}
            }
        }

        Ok(Expr::Comprehension(Box::new(Comprehension {
            kind,
            element,
            value,
            clauses,
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::input::read_python;

    fn expr(source: &str) -> Expr {
        let module = read_python(source).unwrap();
        match module.body.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expr(e)) => e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_precedence_is_structural() {
        assert_eq!(
            expr("a + b * c\n"),
            Expr::binary(
                Expr::name("a"),
                BinaryOp::Add,
                Expr::binary(Expr::name("b"), BinaryOp::Mul, Expr::name("c"))
            )
        );
    }

    #[test]
    fn test_chained_comparison() {
        let Expr::Compare { left, comparisons } = expr("0 <= i < n\n") else {
            panic!("expected comparison");
        };
        assert_eq!(*left, Expr::int(0));
        assert_eq!(
            comparisons,
            vec![(CmpOp::LtE, Expr::name("i")), (CmpOp::Lt, Expr::name("n"))]
        );
    }

    #[test]
    fn test_membership_operators() {
        let Expr::Compare { comparisons, .. } = expr("x not in seen\n") else {
            panic!("expected comparison");
        };
        assert_eq!(comparisons[0].0, CmpOp::NotIn);
        let Expr::Compare { comparisons, .. } = expr("x is not None\n") else {
            panic!("expected comparison");
        };
        assert_eq!(comparisons[0], (CmpOp::IsNot, Expr::None));
    }

    #[test]
    fn test_conditional_expression() {
        assert_eq!(
            expr("a if c else b\n"),
            Expr::IfExp {
                test: Box::new(Expr::name("c")),
                body: Box::new(Expr::name("a")),
                orelse: Box::new(Expr::name("b")),
            }
        );
    }

    #[test]
    fn test_call_arguments() {
        let Expr::Call { func, args } = expr("f(1, *rest, key=2, **opts)\n") else {
            panic!("expected call");
        };
        assert_eq!(*func, Expr::name("f"));
        assert_eq!(
            args,
            vec![
                Arg::Positional(Expr::int(1)),
                Arg::Star(Expr::name("rest")),
                Arg::Keyword {
                    name: "key".into(),
                    value: Expr::int(2)
                },
                Arg::DoubleStar(Expr::name("opts")),
            ]
        );
    }

    #[test]
    fn test_slices() {
        let Expr::Subscript { index, .. } = expr("xs[1:n:2]\n") else {
            panic!("expected subscript");
        };
        assert_eq!(
            index,
            vec![Expr::Slice {
                lower: Some(Box::new(Expr::int(1))),
                upper: Some(Box::new(Expr::name("n"))),
                step: Some(Box::new(Expr::int(2))),
            }]
        );
        let Expr::Subscript { index, .. } = expr("xs[:3]\n") else {
            panic!("expected subscript");
        };
        assert_eq!(
            index,
            vec![Expr::Slice {
                lower: None,
                upper: Some(Box::new(Expr::int(3))),
                step: None,
            }]
        );
    }

    #[test]
    fn test_string_prefixes() {
        assert_eq!(expr("'it''s'\n"), Expr::binary(Expr::string("it"), BinaryOp::Add, Expr::string("s")));
        let Expr::Str(lit) = expr("r'\\d+'\n") else {
            panic!("expected string");
        };
        assert!(lit.raw);
        assert_eq!(lit.body, "\\d+");
        let Expr::Str(lit) = expr("\"\"\"doc\"\"\"\n") else {
            panic!("expected string");
        };
        assert_eq!(lit.body, "doc");
    }

    #[test]
    fn test_fstring_parts() {
        let Expr::FString(fstring) = expr("f\"n={n:>4} done\"\n") else {
            panic!("expected f-string");
        };
        assert_eq!(
            fstring.parts,
            vec![
                FStringPart::Literal("n=".into()),
                FStringPart::Interpolation {
                    expr: Expr::name("n"),
                    format_spec: Some(">4".into()),
                },
                FStringPart::Literal(" done".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(expr("0o17\n"), Expr::Int("0o17".into()));
        assert_eq!(expr("1.5\n"), Expr::Float("1.5".into()));
        assert_eq!(expr("2j\n"), Expr::Imaginary("2j".into()));
    }

    #[test]
    fn test_list_comprehension_clauses() {
        let Expr::Comprehension(comp) = expr("[x * 2 for x in xs if x]\n") else {
            panic!("expected comprehension");
        };
        assert_eq!(comp.kind, ComprehensionKind::List);
        assert_eq!(comp.clauses.len(), 2);
        assert!(matches!(comp.clauses[1], ComprehensionClause::If(Expr::Name(_))));
    }

    #[test]
    fn test_dict_comprehension() {
        let Expr::Comprehension(comp) = expr("{k: v for k, v in pairs}\n") else {
            panic!("expected comprehension");
        };
        assert_eq!(comp.kind, ComprehensionKind::Dict);
        assert_eq!(comp.element, Expr::name("k"));
        assert_eq!(comp.value, Some(Expr::name("v")));
    }

    #[test]
    fn test_lambda_and_walrus() {
        let Expr::Lambda { params, body } = expr("lambda a, b=1: a + b\n") else {
            panic!("expected lambda");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].default, Some(Expr::int(1)));
        assert!(matches!(*body, Expr::BinOp { .. }));

        let Expr::NamedExpr { target, .. } = expr("(n := len(xs))\n") else {
            panic!("expected named expression");
        };
        assert_eq!(target, "n");
    }

    #[test]
    fn test_yield_forms() {
        assert_eq!(expr("yield\n"), Expr::Yield(None));
        assert_eq!(
            expr("yield from gen\n"),
            Expr::YieldFrom(Box::new(Expr::name("gen")))
        );
    }
}
