//! Statements.

use super::ReadContext;
use crate::ast::*;
use crate::error::ReadError;
use tree_sitter::Node;

impl<'a> ReadContext<'a> {
    /// Read every statement of a module or block, comments included.
    ///
    /// A statement whose shape does not match the grammar we expect is kept
    /// as [`StmtKind::Unsupported`] rather than failing the whole read.
    pub(super) fn read_block(&self, node: Node) -> Result<Block, ReadError> {
        let mut body = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let span = self.span(child);
            let kind = match self.read_stmt(child) {
                Ok(kind) => kind,
                Err(err) => {
                    tracing::warn!(kind = child.kind(), line = span.line, %err, "keeping statement verbatim");
                    StmtKind::Unsupported {
                        kind: child.kind().to_string(),
                        text: self.node_text(child).to_string(),
                    }
                }
            };
            body.push(Stmt::new(kind, span));
        }
        Ok(body)
    }

    fn read_stmt(&self, node: Node) -> Result<StmtKind, ReadError> {
        match node.kind() {
            "comment" => {
                let text = self.node_text(node);
                Ok(StmtKind::Comment(
                    text.strip_prefix('#').unwrap_or(text).trim().to_string(),
                ))
            }

            "expression_statement" => self.read_expression_statement(node),
            "assignment" => self.read_assignment(node),
            "augmented_assignment" => self.read_augmented_assignment(node),

            // Control flow
            "if_statement" => self.read_if_statement(node),
            "while_statement" => self.read_while_statement(node),
            "for_statement" => self.read_for_statement(node),
            "try_statement" => self.read_try_statement(node),
            "with_statement" => self.read_with_statement(node),
            "match_statement" => self.read_match_statement(node),

            // Definitions
            "function_definition" => Ok(StmtKind::FunctionDef(
                self.read_function_definition(node, Vec::new())?,
            )),
            "class_definition" => Ok(StmtKind::ClassDef(
                self.read_class_definition(node, Vec::new())?,
            )),
            "decorated_definition" => self.read_decorated_definition(node),

            // Simple statements
            "return_statement" => {
                let value = self
                    .named_children(node)
                    .into_iter()
                    .next()
                    .map(|n| self.read_expr(n))
                    .transpose()?;
                Ok(StmtKind::Return(value))
            }
            "raise_statement" => self.read_raise_statement(node),
            "delete_statement" => {
                let target = self.first_named(node)?;
                let targets = match target.kind() {
                    "expression_list" => self
                        .named_children(target)
                        .into_iter()
                        .map(|n| self.read_expr(n))
                        .collect::<Result<_, _>>()?,
                    _ => vec![self.read_expr(target)?],
                };
                Ok(StmtKind::Delete(targets))
            }
            "assert_statement" => {
                let mut args = self.named_children(node).into_iter();
                let test = args
                    .next()
                    .ok_or_else(|| ReadError::Parse("assert_statement has no condition".into()))?;
                Ok(StmtKind::Assert {
                    test: self.read_expr(test)?,
                    msg: args.next().map(|n| self.read_expr(n)).transpose()?,
                })
            }
            "import_statement" => Ok(StmtKind::Import(self.read_import_names(node)?)),
            "import_from_statement" => self.read_import_from(node),
            // `from __future__ import ...` has no C#-side meaning; keep it visible.
            "future_import_statement" => Ok(StmtKind::Comment(self.node_text(node).to_string())),
            "global_statement" => Ok(StmtKind::Global(self.read_identifiers(node))),
            "nonlocal_statement" => Ok(StmtKind::Nonlocal(self.read_identifiers(node))),
            "pass_statement" => Ok(StmtKind::Pass),
            "break_statement" => Ok(StmtKind::Break),
            "continue_statement" => Ok(StmtKind::Continue),

            // Newer grammars put expression nodes (calls, strings, yields...)
            // straight into the block without an expression_statement.
            _ => self.read_bare_expression(node),
        }
    }

    /// An expression used as a statement. Only kinds the expression reader
    /// cannot model become [`StmtKind::Unsupported`].
    fn read_bare_expression(&self, node: Node) -> Result<StmtKind, ReadError> {
        match self.read_expr(node)? {
            Expr::Unsupported { kind, text, .. } => Ok(StmtKind::Unsupported { kind, text }),
            expr => Ok(StmtKind::Expr(expr)),
        }
    }

    fn read_expression_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let children = self.named_children(node);
        match children.as_slice() {
            [] => Err(ReadError::Parse("expression_statement has no child".into())),
            [only] => match only.kind() {
                "assignment" => self.read_assignment(*only),
                "augmented_assignment" => self.read_augmented_assignment(*only),
                _ => self.read_bare_expression(*only),
            },
            // `a, b` as a statement
            many => Ok(StmtKind::Expr(Expr::Tuple(
                many.iter()
                    .map(|n| self.read_expr(*n))
                    .collect::<Result<_, _>>()?,
            ))),
        }
    }

    fn read_assignment(&self, node: Node) -> Result<StmtKind, ReadError> {
        let left = self.field(node, "left")?;

        if let Some(annotation) = node.child_by_field_name("type") {
            return Ok(StmtKind::AnnAssign {
                target: self.read_expr(left)?,
                annotation: self.read_expr(annotation)?,
                value: node
                    .child_by_field_name("right")
                    .map(|n| self.read_expr(n))
                    .transpose()?,
            });
        }

        // `a = b = c` nests: assignment(left: a, right: assignment(left: b, right: c))
        let mut targets = vec![self.read_expr(left)?];
        let mut value = self.field(node, "right")?;
        while value.kind() == "assignment" && value.child_by_field_name("type").is_none() {
            targets.push(self.read_expr(self.field(value, "left")?)?);
            value = self.field(value, "right")?;
        }

        Ok(StmtKind::Assign {
            targets,
            value: self.read_expr(value)?,
        })
    }

    fn read_augmented_assignment(&self, node: Node) -> Result<StmtKind, ReadError> {
        let left = self.field(node, "left")?;
        let right = self.field(node, "right")?;
        let op_node = self.field(node, "operator")?;

        let op_text = self.node_text(op_node);
        let op = BinaryOp::from_augmented(op_text)
            .ok_or_else(|| ReadError::Parse(format!("unknown augmented op: {op_text}")))?;

        Ok(StmtKind::AugAssign {
            target: self.read_expr(left)?,
            op,
            value: self.read_expr(right)?,
        })
    }

    fn read_if_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let mut branches = vec![IfBranch {
            test: self.read_expr(self.field(node, "condition")?)?,
            body: self.read_block(self.field(node, "consequence")?)?,
        }];
        let mut orelse = None;

        for alt in self.fields(node, "alternative") {
            match alt.kind() {
                "elif_clause" => branches.push(IfBranch {
                    test: self.read_expr(self.field(alt, "condition")?)?,
                    body: self.read_block(self.field(alt, "consequence")?)?,
                }),
                "else_clause" => orelse = Some(self.read_else_clause(alt)?),
                other => {
                    return Err(ReadError::UnexpectedNode {
                        expected: "elif_clause or else_clause".into(),
                        got: other.into(),
                    });
                }
            }
        }

        Ok(StmtKind::If { branches, orelse })
    }

    fn read_else_clause(&self, node: Node) -> Result<Block, ReadError> {
        match node.child_by_field_name("body") {
            Some(body) => self.read_block(body),
            None => {
                let block = self
                    .named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "block")
                    .ok_or_else(|| ReadError::Parse(format!("{} missing body", node.kind())))?;
                self.read_block(block)
            }
        }
    }

    fn read_optional_else(&self, node: Node) -> Result<Option<Block>, ReadError> {
        node.child_by_field_name("alternative")
            .map(|alt| self.read_else_clause(alt))
            .transpose()
    }

    fn read_while_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        Ok(StmtKind::While {
            test: self.read_expr(self.field(node, "condition")?)?,
            body: self.read_block(self.field(node, "body")?)?,
            orelse: self.read_optional_else(node)?,
        })
    }

    fn read_for_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        Ok(StmtKind::For {
            target: self.read_expr(self.field(node, "left")?)?,
            iter: self.read_expr(self.field(node, "right")?)?,
            body: self.read_block(self.field(node, "body")?)?,
            orelse: self.read_optional_else(node)?,
            is_async: self.has_token(node, "async"),
        })
    }

    fn read_try_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let body = self.read_block(self.field(node, "body")?)?;
        let mut handlers = Vec::new();
        let mut orelse = None;
        let mut finalbody = None;

        for child in self.named_children(node) {
            match child.kind() {
                "except_clause" | "except_group_clause" => {
                    handlers.push(self.read_except_clause(child)?)
                }
                "else_clause" => orelse = Some(self.read_else_clause(child)?),
                "finally_clause" => finalbody = Some(self.read_else_clause(child)?),
                _ => {}
            }
        }

        Ok(StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        })
    }

    fn read_except_clause(&self, node: Node) -> Result<ExceptHandler, ReadError> {
        let children = self.named_children(node);
        let block = children
            .iter()
            .find(|c| c.kind() == "block")
            .copied()
            .ok_or_else(|| ReadError::Parse("except_clause missing body".into()))?;
        let header: Vec<Node> = children
            .iter()
            .filter(|c| c.kind() != "block")
            .copied()
            .collect();

        let (mut type_node, mut alias_node) = match node.child_by_field_name("value") {
            Some(value) => (Some(value), node.child_by_field_name("alias")),
            None => (header.first().copied(), header.get(1).copied()),
        };

        // `except E as e` may parse as a single as_pattern.
        if let Some(value) = type_node.filter(|n| n.kind() == "as_pattern") {
            type_node = Some(self.first_named(value)?);
            alias_node = value
                .child_by_field_name("alias")
                .or_else(|| self.named_children(value).get(1).copied());
        }

        let types = match type_node {
            None => Vec::new(),
            Some(n) if n.kind() == "tuple" => self
                .named_children(n)
                .into_iter()
                .map(|e| self.read_expr(e))
                .collect::<Result<_, _>>()?,
            Some(n) if n.kind() == "parenthesized_expression" => {
                let inner = self.first_named(n)?;
                match inner.kind() {
                    "expression_list" | "tuple" => self
                        .named_children(inner)
                        .into_iter()
                        .map(|e| self.read_expr(e))
                        .collect::<Result<_, _>>()?,
                    _ => vec![self.read_expr(inner)?],
                }
            }
            Some(n) => vec![self.read_expr(n)?],
        };

        Ok(ExceptHandler {
            types,
            name: alias_node.map(|n| self.node_text(n).trim().to_string()),
            body: self.read_block(block)?,
            span: self.span(node),
        })
    }

    fn read_with_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let mut items = Vec::new();
        for child in self.named_children(node) {
            if child.kind() != "with_clause" {
                continue;
            }
            for item in self.named_children(child) {
                if item.kind() == "with_item" {
                    items.push(self.read_with_item(item)?);
                }
            }
        }

        Ok(StmtKind::With {
            items,
            body: self.read_block(self.field(node, "body")?)?,
            is_async: self.has_token(node, "async"),
        })
    }

    fn read_with_item(&self, node: Node) -> Result<WithItem, ReadError> {
        let value = self.field(node, "value")?;
        if value.kind() != "as_pattern" {
            return Ok(WithItem {
                context: self.read_expr(value)?,
                target: node
                    .child_by_field_name("alias")
                    .map(|n| self.read_expr(n))
                    .transpose()?,
            });
        }

        let context = self.first_named(value)?;
        let alias = value
            .child_by_field_name("alias")
            .or_else(|| self.named_children(value).get(1).copied());
        let target = match alias {
            Some(a) if a.kind() == "as_pattern_target" => match self.named_children(a).first() {
                Some(inner) => Some(self.read_expr(*inner)?),
                None => Some(Expr::Name(self.node_text(a).trim().to_string())),
            },
            Some(a) => Some(self.read_expr(a)?),
            None => None,
        };

        Ok(WithItem {
            context: self.read_expr(context)?,
            target,
        })
    }

    pub(super) fn read_function_definition(
        &self,
        node: Node,
        decorators: Vec<Expr>,
    ) -> Result<FunctionDef, ReadError> {
        let name = self.node_text(self.field(node, "name")?).to_string();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.read_parameters(p))
            .transpose()?
            .unwrap_or_default();

        Ok(FunctionDef {
            name,
            params,
            returns: node
                .child_by_field_name("return_type")
                .map(|n| self.read_expr(n))
                .transpose()?,
            body: self.read_block(self.field(node, "body")?)?,
            decorators,
            is_async: self.has_token(node, "async"),
        })
    }

    /// Parameters of a `def` or a `lambda`.
    ///
    /// The bare `*` and `/` separators have no C# counterpart and are dropped.
    pub(super) fn read_parameters(&self, node: Node) -> Result<Vec<Param>, ReadError> {
        let mut params = Vec::new();
        for child in self.named_children(node) {
            let param = match child.kind() {
                "identifier" => Param::positional(self.node_text(child)),
                "default_parameter" => Param {
                    default: Some(self.read_expr(self.field(child, "value")?)?),
                    ..Param::positional(self.node_text(self.field(child, "name")?))
                },
                "typed_parameter" => {
                    let inner = self.first_named(child)?;
                    Param {
                        annotation: Some(self.read_expr(self.field(child, "type")?)?),
                        ..self.read_splat_parameter(inner)
                    }
                }
                "typed_default_parameter" => Param {
                    annotation: Some(self.read_expr(self.field(child, "type")?)?),
                    default: Some(self.read_expr(self.field(child, "value")?)?),
                    ..Param::positional(self.node_text(self.field(child, "name")?))
                },
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    self.read_splat_parameter(child)
                }
                "keyword_separator" | "positional_separator" => continue,
                _ => Param::positional(self.node_text(child)),
            };
            params.push(param);
        }
        Ok(params)
    }

    fn read_splat_parameter(&self, node: Node) -> Param {
        let kind = match node.kind() {
            "list_splat_pattern" => ParamKind::VarArgs,
            "dictionary_splat_pattern" => ParamKind::KwArgs,
            _ => ParamKind::Normal,
        };
        let name = self.node_text(node).trim_start_matches('*').trim();
        Param {
            kind,
            ..Param::positional(name)
        }
    }

    fn read_class_definition(
        &self,
        node: Node,
        decorators: Vec<Expr>,
    ) -> Result<ClassDef, ReadError> {
        Ok(ClassDef {
            name: self.node_text(self.field(node, "name")?).to_string(),
            bases: node
                .child_by_field_name("superclasses")
                .map(|n| self.read_arguments(n))
                .transpose()?
                .unwrap_or_default(),
            body: self.read_block(self.field(node, "body")?)?,
            decorators,
        })
    }

    fn read_decorated_definition(&self, node: Node) -> Result<StmtKind, ReadError> {
        let decorators = self
            .named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .map(|d| self.read_expr(self.first_named(d)?))
            .collect::<Result<Vec<_>, _>>()?;

        let definition = self.field(node, "definition")?;
        match definition.kind() {
            "function_definition" => Ok(StmtKind::FunctionDef(
                self.read_function_definition(definition, decorators)?,
            )),
            "class_definition" => Ok(StmtKind::ClassDef(
                self.read_class_definition(definition, decorators)?,
            )),
            other => Err(ReadError::UnexpectedNode {
                expected: "function or class definition".into(),
                got: other.into(),
            }),
        }
    }

    fn read_match_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let subjects = self.fields(node, "subject");
        let subject = match subjects.as_slice() {
            [] => return Err(ReadError::Parse("match_statement missing subject".into())),
            [only] => self.read_expr(*only)?,
            many => Expr::Tuple(
                many.iter()
                    .map(|n| self.read_expr(*n))
                    .collect::<Result<_, _>>()?,
            ),
        };

        // Cases live in the body block; older grammars put them directly
        // under the statement.
        let container = node.child_by_field_name("body").unwrap_or(node);
        let cases = self
            .named_children(container)
            .into_iter()
            .filter(|c| c.kind() == "case_clause")
            .map(|c| self.read_case_clause(c))
            .collect::<Result<_, _>>()?;

        Ok(StmtKind::Match { subject, cases })
    }

    fn read_case_clause(&self, node: Node) -> Result<MatchCase, ReadError> {
        let children = self.named_children(node);

        let mut patterns = self.fields(node, "pattern");
        if patterns.is_empty() {
            patterns = children
                .iter()
                .filter(|c| c.kind() == "case_pattern")
                .copied()
                .collect();
        }
        let pattern = match patterns.as_slice() {
            [only] => self.read_pattern(*only)?,
            many => Pattern::Sequence(
                many.iter()
                    .map(|p| self.read_pattern(*p))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let guard = node
            .child_by_field_name("guard")
            .or_else(|| children.iter().find(|c| c.kind() == "if_clause").copied())
            .map(|g| self.read_expr(self.first_named(g)?))
            .transpose()?;

        let consequence = match node.child_by_field_name("consequence") {
            Some(block) => block,
            None => children
                .iter()
                .find(|c| c.kind() == "block")
                .copied()
                .ok_or_else(|| ReadError::Parse("case_clause missing body".into()))?,
        };

        Ok(MatchCase {
            pattern,
            guard,
            body: self.read_block(consequence)?,
            span: self.span(node),
        })
    }

    fn read_raise_statement(&self, node: Node) -> Result<StmtKind, ReadError> {
        let cause = node.child_by_field_name("cause");
        let exc = self
            .named_children(node)
            .into_iter()
            .find(|c| Some(*c) != cause);
        Ok(StmtKind::Raise {
            exc: exc.map(|n| self.read_expr(n)).transpose()?,
            cause: cause.map(|n| self.read_expr(n)).transpose()?,
        })
    }

    fn read_import_names(&self, node: Node) -> Result<Vec<ImportName>, ReadError> {
        self.fields(node, "name")
            .into_iter()
            .map(|n| match n.kind() {
                "aliased_import" => Ok(ImportName {
                    name: self.node_text(self.field(n, "name")?).to_string(),
                    alias: Some(self.node_text(self.field(n, "alias")?).to_string()),
                }),
                _ => Ok(ImportName {
                    name: self.node_text(n).to_string(),
                    alias: None,
                }),
            })
            .collect()
    }

    fn read_import_from(&self, node: Node) -> Result<StmtKind, ReadError> {
        let module = self.node_text(self.field(node, "module_name")?).to_string();
        let wildcard = self
            .named_children(node)
            .iter()
            .any(|c| c.kind() == "wildcard_import");
        Ok(StmtKind::ImportFrom {
            module,
            names: self.read_import_names(node)?,
            wildcard,
        })
    }

    fn read_identifiers(&self, node: Node) -> Vec<String> {
        self.named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "identifier")
            .map(|c| self.node_text(c).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::input::read_python;

    fn single(source: &str) -> StmtKind {
        let mut module = read_python(source).unwrap();
        assert_eq!(module.body.len(), 1, "{:?}", module.body);
        module.body.remove(0).kind
    }

    #[test]
    fn test_chained_assignment_keeps_target_order() {
        let StmtKind::Assign { targets, value } = single("a = b = 0\n") else {
            panic!("expected assignment");
        };
        assert_eq!(targets, vec![Expr::name("a"), Expr::name("b")]);
        assert_eq!(value, Expr::int(0));
    }

    #[test]
    fn test_tuple_assignment() {
        let StmtKind::Assign { targets, value } = single("a, b = b, a\n") else {
            panic!("expected assignment");
        };
        assert_eq!(
            targets,
            vec![Expr::Tuple(vec![Expr::name("a"), Expr::name("b")])]
        );
        assert_eq!(value, Expr::Tuple(vec![Expr::name("b"), Expr::name("a")]));
    }

    #[test]
    fn test_annotated_assignment() {
        let StmtKind::AnnAssign {
            target,
            annotation,
            value,
        } = single("count: int = 0\n")
        else {
            panic!("expected annotated assignment");
        };
        assert_eq!(target, Expr::name("count"));
        assert_eq!(annotation, Expr::name("int"));
        assert_eq!(value, Some(Expr::int(0)));
    }

    #[test]
    fn test_augmented_assignment() {
        let StmtKind::AugAssign { target, op, value } = single("total //= 2\n") else {
            panic!("expected augmented assignment");
        };
        assert_eq!(target, Expr::name("total"));
        assert_eq!(op, BinaryOp::FloorDiv);
        assert_eq!(value, Expr::int(2));
    }

    #[test]
    fn test_if_elif_else_chain() {
        let source = "if a:\n    x = 1\nelif b:\n    x = 2\nelif c:\n    x = 3\nelse:\n    x = 4\n";
        let StmtKind::If { branches, orelse } = single(source) else {
            panic!("expected if");
        };
        assert_eq!(branches.len(), 3);
        assert_eq!(branches[2].test, Expr::name("c"));
        assert_eq!(orelse.map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_while_else() {
        let StmtKind::While { test, orelse, .. } =
            single("while n:\n    n -= 1\nelse:\n    done()\n")
        else {
            panic!("expected while");
        };
        assert_eq!(test, Expr::name("n"));
        assert!(orelse.is_some());
    }

    #[test]
    fn test_for_with_tuple_target() {
        let StmtKind::For {
            target,
            iter,
            orelse,
            is_async,
            ..
        } = single("for k, v in items:\n    pass\n")
        else {
            panic!("expected for");
        };
        assert_eq!(
            target,
            Expr::Tuple(vec![Expr::name("k"), Expr::name("v")])
        );
        assert_eq!(iter, Expr::name("items"));
        assert!(orelse.is_none());
        assert!(!is_async);
    }

    #[test]
    fn test_try_except_else_finally() {
        let source = "try:\n    risky()\nexcept ValueError as e:\n    log(e)\nexcept (KeyError, IndexError):\n    pass\nexcept:\n    raise\nelse:\n    ok()\nfinally:\n    close()\n";
        let StmtKind::Try {
            handlers,
            orelse,
            finalbody,
            ..
        } = single(source)
        else {
            panic!("expected try");
        };
        assert_eq!(handlers.len(), 3);
        assert_eq!(handlers[0].types, vec![Expr::name("ValueError")]);
        assert_eq!(handlers[0].name.as_deref(), Some("e"));
        assert_eq!(
            handlers[1].types,
            vec![Expr::name("KeyError"), Expr::name("IndexError")]
        );
        assert_eq!(handlers[1].name, None);
        assert!(handlers[2].types.is_empty());
        assert!(orelse.is_some());
        assert!(finalbody.is_some());
    }

    #[test]
    fn test_with_items() {
        let StmtKind::With { items, .. } =
            single("with open(p) as f, lock:\n    f.read()\n")
        else {
            panic!("expected with");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].target, Some(Expr::name("f")));
        assert_eq!(items[1].context, Expr::name("lock"));
        assert_eq!(items[1].target, None);
    }

    #[test]
    fn test_function_parameters() {
        let source = "def f(a, b: int, c=1, *args, d: str = 'x', **kw) -> int:\n    return a\n";
        let StmtKind::FunctionDef(def) = single(source) else {
            panic!("expected def");
        };
        let names: Vec<_> = def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "args", "d", "kw"]);
        assert_eq!(def.params[1].annotation, Some(Expr::name("int")));
        assert_eq!(def.params[2].default, Some(Expr::int(1)));
        assert_eq!(def.params[3].kind, ParamKind::VarArgs);
        assert_eq!(def.params[5].kind, ParamKind::KwArgs);
        assert_eq!(def.returns, Some(Expr::name("int")));
        assert!(!def.is_async);
    }

    #[test]
    fn test_keyword_only_separator_is_dropped() {
        let StmtKind::FunctionDef(def) = single("def f(a, *, b):\n    pass\n") else {
            panic!("expected def");
        };
        assert_eq!(def.params.len(), 2);
    }

    #[test]
    fn test_async_def() {
        let StmtKind::FunctionDef(def) = single("async def run():\n    await go()\n") else {
            panic!("expected def");
        };
        assert!(def.is_async);
    }

    #[test]
    fn test_decorated_class() {
        let source = "@dataclass\nclass Point(Base):\n    x: int = 0\n";
        let StmtKind::ClassDef(class) = single(source) else {
            panic!("expected class");
        };
        assert_eq!(class.name, "Point");
        assert_eq!(class.decorators, vec![Expr::name("dataclass")]);
        assert_eq!(class.bases, vec![Arg::Positional(Expr::name("Base"))]);
        assert_eq!(class.body.len(), 1);
    }

    #[test]
    fn test_imports() {
        let module = read_python("import os.path as p, sys\nfrom . import util\nfrom x import *\n").unwrap();
        let StmtKind::Import(names) = &module.body[0].kind else {
            panic!("expected import");
        };
        assert_eq!(names[0].name, "os.path");
        assert_eq!(names[0].alias.as_deref(), Some("p"));
        assert_eq!(names[1].name, "sys");
        let StmtKind::ImportFrom { module: m, names, .. } = &module.body[1].kind else {
            panic!("expected from-import");
        };
        assert_eq!(m, ".");
        assert_eq!(names[0].name, "util");
        assert!(matches!(
            &module.body[2].kind,
            StmtKind::ImportFrom { wildcard: true, .. }
        ));
    }

    #[test]
    fn test_simple_statements() {
        let module = read_python(
            "global g\ndel a, b\nassert x, 'msg'\nraise E('bad') from err\nreturn\npass\n",
        )
        .unwrap();
        let kinds: Vec<_> = module.body.into_iter().map(|s| s.kind).collect();
        assert_eq!(kinds[0], StmtKind::Global(vec!["g".into()]));
        assert_eq!(
            kinds[1],
            StmtKind::Delete(vec![Expr::name("a"), Expr::name("b")])
        );
        assert!(matches!(&kinds[2], StmtKind::Assert { msg: Some(_), .. }));
        assert!(matches!(
            &kinds[3],
            StmtKind::Raise {
                exc: Some(Expr::Call { .. }),
                cause: Some(Expr::Name(_))
            }
        ));
        assert_eq!(kinds[4], StmtKind::Return(None));
        assert_eq!(kinds[5], StmtKind::Pass);
    }

    #[test]
    fn test_comments_are_kept() {
        let module = read_python("# leading note\nx = 1  # trailing\n").unwrap();
        assert_eq!(module.body[0].kind, StmtKind::Comment("leading note".into()));
        assert!(matches!(module.body[1].kind, StmtKind::Assign { .. }));
        assert_eq!(module.body[2].kind, StmtKind::Comment("trailing".into()));
    }

    #[test]
    fn test_bare_expressions_are_statements() {
        assert!(matches!(single("f()\n"), StmtKind::Expr(Expr::Call { .. })));
        assert!(matches!(single("a[0]\n"), StmtKind::Expr(Expr::Subscript { .. })));
        assert!(matches!(single("x.y\n"), StmtKind::Expr(Expr::Attribute { .. })));
        assert!(matches!(single("\"\"\"Doc.\"\"\"\n"), StmtKind::Expr(Expr::Str(_))));

        let StmtKind::If { branches, .. } = single("if c:\n    print(y)\n") else {
            panic!("expected if");
        };
        assert!(matches!(branches[0].body[0].kind, StmtKind::Expr(Expr::Call { .. })));

        let StmtKind::FunctionDef(def) = single("def g():\n    yield 1\n") else {
            panic!("expected def");
        };
        assert_eq!(
            def.body[0].kind,
            StmtKind::Expr(Expr::Yield(Some(Box::new(Expr::int(1)))))
        );
    }

    #[test]
    fn test_match_cases() {
        let source = "match cmd:\n    case 'go' if ready:\n        go()\n    case _:\n        stop()\n";
        let StmtKind::Match { subject, cases } = single(source) else {
            panic!("expected match");
        };
        assert_eq!(subject, Expr::name("cmd"));
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].pattern, Pattern::Literal(Expr::string("go")));
        assert_eq!(cases[0].guard, Some(Expr::name("ready")));
        assert_eq!(cases[1].pattern, Pattern::Wildcard);
    }
}
