//! Tree-sitter based Python reader.
//!
//! Parsing happens in two passes over the concrete tree. The first walks
//! every `ERROR` and `MISSING` node into an [`ErrorSink`]; any report aborts
//! the read with [`ReadError::Syntax`]. The second builds the typed tree,
//! one module per syntactic category.

mod expr;
mod pattern;
mod stmt;

use crate::ast::{Module, Span};
use crate::error::{ErrorSink, ReadError};
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source into the typed syntax tree.
pub fn read_python(source: &str) -> Result<Module, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Language(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);

    let mut sink = ErrorSink::new();
    ctx.collect_syntax_errors(tree.root_node(), &mut sink);
    if sink.has_errors() {
        return Err(ReadError::Syntax(sink.into_errors()));
    }

    ctx.read_module(&tree)
}

pub(crate) struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or("")
    }

    fn span(&self, node: Node) -> Span {
        let point = node.start_position();
        Span::new(point.row + 1, point.column + 1)
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
        node.child_by_field_name(name)
            .ok_or_else(|| ReadError::Parse(format!("{} missing {}", node.kind(), name)))
    }

    /// Named children, skipping comments and other extras.
    fn named_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .collect()
    }

    fn fields<'t>(&self, node: Node<'t>, name: &str) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.children_by_field_name(name, &mut cursor).collect()
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Result<Node<'t>, ReadError> {
        self.named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| ReadError::Parse(format!("{} has no child", node.kind())))
    }

    /// True if the node has an anonymous child of the given kind (`async`, `from`).
    fn has_token(&self, node: Node, token: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|child| !child.is_named() && child.kind() == token)
    }

    fn collect_syntax_errors(&self, node: Node, sink: &mut ErrorSink) {
        let span = self.span(node);
        if node.is_missing() {
            sink.report(span.line, span.column, format!("missing `{}`", node.kind()));
            return;
        }
        if node.is_error() {
            let snippet = self
                .node_text(node)
                .lines()
                .next()
                .unwrap_or("")
                .trim();
            let message = if snippet.is_empty() {
                "unexpected input".to_string()
            } else if snippet.chars().count() > 24 {
                let short: String = snippet.chars().take(24).collect();
                format!("unexpected `{short}...`")
            } else {
                format!("unexpected `{snippet}`")
            };
            sink.report(span.line, span.column, message);
            return;
        }
        if !node.has_error() {
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_syntax_errors(child, sink);
        }
    }

    fn read_module(&self, tree: &Tree) -> Result<Module, ReadError> {
        let root = tree.root_node();
        tracing::debug!(bytes = self.source.len(), "reading python module");
        Ok(Module {
            body: self.read_block(root)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn test_read_simple_assignment() {
        let module = read_python("x = 1\n").unwrap();
        assert_eq!(module.body.len(), 1);
        assert_eq!(module.body[0].span, Span::new(1, 1));
        match &module.body[0].kind {
            StmtKind::Assign { targets, value } => {
                assert_eq!(targets, &vec![Expr::name("x")]);
                assert_eq!(value, &Expr::int(1));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_is_reported_with_position() {
        let err = read_python("x = (1,\ny = 2\n").unwrap_err();
        match err {
            ReadError::Syntax(errors) => {
                assert!(!errors.is_empty());
                assert!(errors.iter().all(|e| e.line >= 1 && e.column >= 1));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_block_is_syntax_error() {
        assert!(matches!(
            read_python("def f(:\n    pass\n"),
            Err(ReadError::Syntax(_))
        ));
    }

    #[test]
    fn test_empty_source() {
        let module = read_python("").unwrap();
        assert!(module.body.is_empty());
    }

    #[test]
    fn test_statement_spans_are_one_based() {
        let module = read_python("a = 1\n\nif a:\n    b = 2\n").unwrap();
        assert_eq!(module.body[1].span, Span::new(3, 1));
        let StmtKind::If { branches, .. } = &module.body[1].kind else {
            panic!("expected if");
        };
        assert_eq!(branches[0].body[0].span, Span::new(4, 5));
    }
}
