//! Expression rendering.
//!
//! Every expression renders to a single line of C#. Operands are
//! parenthesized only where C# precedence would otherwise regroup them.

use crate::literal::{escape_identifier, float_literal, int_literal, interpolated_segment, string_literal};
use crate::translator::Translator;
use pycs_syntax::{
    Arg, BinaryOp, BoolOp, CmpOp, Comprehension, ComprehensionClause, ComprehensionKind, DictItem,
    Expr, FString, FStringPart, Param, ParamKind, UnaryOp,
};

/// C# operator precedence, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Prec {
    /// Assignment, lambdas and query expressions.
    Lowest,
    Conditional,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

impl Prec {
    /// The next tighter level, used for the right operand of a
    /// left-associative operator.
    fn tighter(self) -> Self {
        match self {
            Self::Lowest => Self::Conditional,
            Self::Conditional => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::BitOr,
            Self::BitOr => Self::BitXor,
            Self::BitXor => Self::BitAnd,
            Self::BitAnd => Self::Equality,
            Self::Equality => Self::Relational,
            Self::Relational => Self::Shift,
            Self::Shift => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative => Self::Unary,
            Self::Unary | Self::Primary => Self::Primary,
        }
    }
}

struct Rendered {
    text: String,
    prec: Prec,
}

impl Rendered {
    fn new(text: impl Into<String>, prec: Prec) -> Self {
        Self {
            text: text.into(),
            prec,
        }
    }

    fn primary(text: impl Into<String>) -> Self {
        Self::new(text, Prec::Primary)
    }
}

fn binary_operator(op: BinaryOp) -> Option<(&'static str, Prec)> {
    Some(match op {
        BinaryOp::Add => ("+", Prec::Additive),
        BinaryOp::Sub => ("-", Prec::Additive),
        BinaryOp::Mul => ("*", Prec::Multiplicative),
        BinaryOp::Div => ("/", Prec::Multiplicative),
        BinaryOp::Mod => ("%", Prec::Multiplicative),
        BinaryOp::LShift => ("<<", Prec::Shift),
        BinaryOp::RShift => (">>", Prec::Shift),
        BinaryOp::BitOr => ("|", Prec::BitOr),
        BinaryOp::BitXor => ("^", Prec::BitXor),
        BinaryOp::BitAnd => ("&", Prec::BitAnd),
        // Lowered to helper calls.
        BinaryOp::Pow | BinaryOp::FloorDiv | BinaryOp::MatMul => return None,
    })
}

impl Translator<'_> {
    /// Render for a context that accepts any expression.
    pub(crate) fn render_expr(&mut self, expr: &Expr) -> String {
        self.render(expr).text
    }

    /// Render, wrapping in parentheses if `expr` binds looser than `min`.
    pub(crate) fn render_at(&mut self, expr: &Expr, min: Prec) -> String {
        let rendered = self.render(expr);
        if rendered.prec < min {
            format!("({})", rendered.text)
        } else {
            rendered.text
        }
    }

    /// Helper function name for operators C# lacks, if `op` is one.
    pub(crate) fn helper_for(&self, op: BinaryOp) -> Option<&str> {
        let runtime = self.runtime();
        match op {
            BinaryOp::Pow => Some(runtime.pow_fn.as_str()),
            BinaryOp::FloorDiv => Some(runtime.floordiv_fn.as_str()),
            BinaryOp::MatMul => Some(runtime.matmul_fn.as_str()),
            _ => None,
        }
    }

    /// A name as C# sees it: the method receiver becomes `this`, reserved
    /// words get `@`.
    pub(crate) fn render_name(&self, name: &str) -> String {
        if self.scopes.receiver() == Some(name) {
            "this".to_string()
        } else {
            escape_identifier(name)
        }
    }

    fn render(&mut self, expr: &Expr) -> Rendered {
        match expr {
            Expr::Name(name) => Rendered::primary(self.render_name(name)),
            Expr::Int(text) => Rendered::primary(int_literal(text)),
            Expr::Float(text) => Rendered::primary(float_literal(text)),
            Expr::Imaginary(text) => {
                let magnitude = text.trim_end_matches(['j', 'J']);
                let magnitude = if magnitude.contains(['.', 'e', 'E']) {
                    float_literal(magnitude)
                } else {
                    int_literal(magnitude)
                };
                Rendered::primary(format!("new System.Numerics.Complex(0, {magnitude})"))
            }
            Expr::Str(lit) => Rendered::primary(string_literal(lit)),
            Expr::FString(fstring) => Rendered::primary(self.render_fstring(fstring)),
            Expr::Bool(true) => Rendered::primary("true"),
            Expr::Bool(false) => Rendered::primary("false"),
            Expr::None => Rendered::primary("null"),
            Expr::Ellipsis => {
                let span = self.span;
                self.warn("ellipsis", span, "`...` has no C# value; emitted null");
                Rendered::primary("null")
            }

            Expr::BinOp { left, op, right } => match binary_operator(*op) {
                Some((symbol, prec)) => {
                    let left = self.render_at(left, prec);
                    let right = self.render_at(right, prec.tighter());
                    Rendered::new(format!("{left} {symbol} {right}"), prec)
                }
                None => {
                    let helper = self.helper_for(*op).unwrap_or_default().to_string();
                    let left = self.render_expr(left);
                    let right = self.render_expr(right);
                    Rendered::primary(format!("{helper}({left}, {right})"))
                }
            },
            Expr::UnaryOp { op, operand } => {
                let symbol = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Pos => "+",
                    UnaryOp::Invert => "~",
                    UnaryOp::Not => "!",
                };
                let mut operand = self.render_at(operand, Prec::Unary);
                // `- -x` must not collapse into `--x`.
                if operand.starts_with(symbol) && matches!(op, UnaryOp::Neg | UnaryOp::Pos) {
                    operand = format!("({operand})");
                }
                Rendered::new(format!("{symbol}{operand}"), Prec::Unary)
            }
            Expr::BoolOp { op, left, right } => {
                let (symbol, prec) = match op {
                    BoolOp::And => ("&&", Prec::And),
                    BoolOp::Or => ("||", Prec::Or),
                };
                let left = self.render_at(left, prec);
                let right = self.render_at(right, prec.tighter());
                Rendered::new(format!("{left} {symbol} {right}"), prec)
            }
            Expr::Compare { left, comparisons } => self.render_comparison(left, comparisons),
            Expr::IfExp { test, body, orelse } => {
                let test = self.render_at(test, Prec::Or);
                let body = self.render_at(body, Prec::Conditional);
                let orelse = self.render_at(orelse, Prec::Conditional);
                Rendered::new(format!("{test} ? {body} : {orelse}"), Prec::Conditional)
            }
            Expr::Lambda { params, body } => {
                let params = self.render_lambda_params(params);
                let body = self.render_expr(body);
                Rendered::new(format!("({params}) => {body}"), Prec::Lowest)
            }
            Expr::NamedExpr { target, value } => {
                self.frame().record_variable(target);
                let target = self.render_name(target);
                let value = self.render_expr(value);
                Rendered::new(format!("{target} = {value}"), Prec::Lowest)
            }

            Expr::Attribute { value, attr } => {
                let value = self.render_at(value, Prec::Primary);
                Rendered::primary(format!("{value}.{}", escape_identifier(attr)))
            }
            Expr::Subscript { value, index } => {
                let value = self.render_at(value, Prec::Primary);
                let index: Vec<_> = index.iter().map(|i| self.render_expr(i)).collect();
                Rendered::primary(format!("{value}[{}]", index.join(", ")))
            }
            // `lo..hi` is a C# range. With a step the bounds are spelled out
            // (`0..^0..2`) so the step reads as a third part.
            Expr::Slice { lower, upper, step } => {
                let stepped = step.is_some();
                let lower = match lower {
                    Some(lower) => self.render_at(lower, Prec::Unary),
                    None if stepped => "0".to_string(),
                    None => String::new(),
                };
                let upper = match upper {
                    Some(upper) => self.render_at(upper, Prec::Unary),
                    None if stepped => "^0".to_string(),
                    None => String::new(),
                };
                let mut text = format!("{lower}..{upper}");
                if let Some(step) = step {
                    text.push_str("..");
                    text.push_str(&self.render_at(step, Prec::Unary));
                }
                Rendered::new(text, Prec::Lowest)
            }
            Expr::Call { func, args } => {
                let func = self.render_at(func, Prec::Primary);
                let args = self.render_args(args);
                Rendered::primary(format!("{func}({args})"))
            }

            Expr::List(items) => {
                let list_type = self.runtime().list_type.clone();
                Rendered::primary(self.render_collection(&list_type, items))
            }
            Expr::Set(items) => {
                let set_type = self.runtime().set_type.clone();
                Rendered::primary(self.render_collection(&set_type, items))
            }
            Expr::Tuple(items) => {
                let elements = self.render_elements(items);
                match items.len() {
                    0 | 1 => Rendered::primary(format!(
                        "new {}({elements})",
                        self.runtime().tuple_type
                    )),
                    _ => Rendered::primary(format!("({elements})")),
                }
            }
            Expr::Dict(items) => Rendered::primary(self.render_dict(items)),
            Expr::Comprehension(comp) => self.render_comprehension(comp),

            Expr::Await(value) => {
                let value = self.render_at(value, Prec::Unary);
                Rendered::new(format!("await {value}"), Prec::Unary)
            }
            Expr::Yield(value) => {
                let span = self.span;
                self.warn(
                    "yield",
                    span,
                    "yield is only translated as a statement; expression kept as written",
                );
                let text = match value {
                    Some(value) => format!("yield {}", self.render_expr(value)),
                    None => "yield".to_string(),
                };
                Rendered::new(text, Prec::Lowest)
            }
            Expr::YieldFrom(value) => {
                let span = self.span;
                self.warn(
                    "yield",
                    span,
                    "yield from is only translated as a statement; expression kept as written",
                );
                Rendered::new(format!("yield from {}", self.render_expr(value)), Prec::Lowest)
            }
            Expr::Starred(value) => {
                let span = self.span;
                self.warn("list_splat", span, "unpacking has no C# equivalent; operand kept");
                Rendered::new(format!("*{}", self.render_at(value, Prec::Unary)), Prec::Unary)
            }
            Expr::Unsupported { kind, text, span } => {
                self.warn(kind, *span, "no C# translation; source kept verbatim");
                Rendered::primary(text.clone())
            }
        }
    }

    fn render_fstring(&mut self, fstring: &FString) -> String {
        let mut out = String::from(if fstring.raw { "$@\"" } else { "$\"" });
        for part in &fstring.parts {
            match part {
                FStringPart::Literal(text) => {
                    out.push_str(&interpolated_segment(text, fstring.raw));
                }
                FStringPart::Interpolation { expr, format_spec } => {
                    // A bare `?:` would end the hole at its colon.
                    let value = self.render_at(expr, Prec::Or);
                    out.push('{');
                    out.push_str(&value);
                    if let Some(spec) = format_spec.as_deref().filter(|s| !s.is_empty()) {
                        out.push(':');
                        out.push_str(spec);
                    }
                    out.push('}');
                }
            }
        }
        out.push('"');
        out
    }

    fn render_comparison(&mut self, left: &Expr, comparisons: &[(CmpOp, Expr)]) -> Rendered {
        let mut pieces = Vec::with_capacity(comparisons.len());
        let mut lhs = left;
        for (op, rhs) in comparisons {
            pieces.push(self.render_single_comparison(lhs, *op, rhs));
            lhs = rhs;
        }

        match pieces.len() {
            1 => pieces.remove(0),
            // `a < b < c` is `a < b && b < c`.
            _ => {
                let parts: Vec<_> = pieces
                    .into_iter()
                    .map(|p| {
                        if p.prec < Prec::And.tighter() {
                            format!("({})", p.text)
                        } else {
                            p.text
                        }
                    })
                    .collect();
                Rendered::new(parts.join(" && "), Prec::And)
            }
        }
    }

    fn render_single_comparison(&mut self, left: &Expr, op: CmpOp, right: &Expr) -> Rendered {
        let relational = |symbol: &str, prec: Prec, this: &mut Self| {
            let l = this.render_at(left, prec);
            let r = this.render_at(right, prec.tighter());
            Rendered::new(format!("{l} {symbol} {r}"), prec)
        };
        match op {
            CmpOp::Eq => relational("==", Prec::Equality, self),
            CmpOp::NotEq => relational("!=", Prec::Equality, self),
            CmpOp::Lt => relational("<", Prec::Relational, self),
            CmpOp::LtE => relational("<=", Prec::Relational, self),
            CmpOp::Gt => relational(">", Prec::Relational, self),
            CmpOp::GtE => relational(">=", Prec::Relational, self),
            CmpOp::Is | CmpOp::IsNot if matches!(right, Expr::None) => {
                let symbol = if op == CmpOp::Is { "==" } else { "!=" };
                relational(symbol, Prec::Equality, self)
            }
            CmpOp::Is => {
                let (l, r) = (self.render_expr(left), self.render_expr(right));
                Rendered::primary(format!("ReferenceEquals({l}, {r})"))
            }
            CmpOp::IsNot => {
                let (l, r) = (self.render_expr(left), self.render_expr(right));
                Rendered::new(format!("!ReferenceEquals({l}, {r})"), Prec::Unary)
            }
            CmpOp::In => {
                let container = self.render_at(right, Prec::Primary);
                let item = self.render_expr(left);
                Rendered::primary(format!("{container}.Contains({item})"))
            }
            CmpOp::NotIn => {
                let container = self.render_at(right, Prec::Primary);
                let item = self.render_expr(left);
                Rendered::new(format!("!{container}.Contains({item})"), Prec::Unary)
            }
        }
    }

    pub(crate) fn render_args(&mut self, args: &[Arg]) -> String {
        let rendered: Vec<_> = args
            .iter()
            .map(|arg| match arg {
                Arg::Positional(value) => self.render_expr(value),
                Arg::Keyword { name, value } => {
                    format!("{}: {}", escape_identifier(name), self.render_expr(value))
                }
                // An array passed to a `params` parameter is spread by C#.
                Arg::Star(value) => self.render_expr(value),
                Arg::DoubleStar(value) => {
                    let span = self.span;
                    self.warn(
                        "dictionary_splat",
                        span,
                        "keyword unpacking has no C# equivalent; mapping passed positionally",
                    );
                    self.render_expr(value)
                }
            })
            .collect();
        rendered.join(", ")
    }

    fn render_elements(&mut self, items: &[Expr]) -> String {
        let rendered: Vec<_> = items.iter().map(|item| self.render_expr(item)).collect();
        rendered.join(", ")
    }

    /// `new list { a, b }`, or `new list()` when empty.
    fn render_collection(&mut self, type_name: &str, items: &[Expr]) -> String {
        if items.is_empty() {
            return format!("new {type_name}()");
        }
        format!("new {type_name} {{ {} }}", self.render_elements(items))
    }

    fn render_dict(&mut self, items: &[DictItem]) -> String {
        let dict_type = self.runtime().dict_type.clone();
        if items.is_empty() {
            return format!("new {dict_type}()");
        }
        let entries: Vec<_> = items
            .iter()
            .map(|item| match item {
                DictItem::Pair { key, value } => {
                    format!("{{ {}, {} }}", self.render_expr(key), self.render_expr(value))
                }
                DictItem::Splat(value) => {
                    let span = self.span;
                    self.warn(
                        "dictionary_splat",
                        span,
                        "mapping unpacking has no C# equivalent; operand kept",
                    );
                    self.render_expr(value)
                }
            })
            .collect();
        format!("new {dict_type} {{ {} }}", entries.join(", "))
    }

    /// `from x in xs where cond select elem`. Tuple targets are bound
    /// through `let` clauses on a fresh range variable.
    fn render_comprehension(&mut self, comp: &Comprehension) -> Rendered {
        let mut clauses = Vec::new();
        for clause in &comp.clauses {
            match clause {
                ComprehensionClause::For { target, iter } => {
                    let iter = self.render_at(iter, Prec::Conditional);
                    match target {
                        Expr::Tuple(names) | Expr::List(names) => {
                            let range = self.frame().fresh_name("_t");
                            clauses.push(format!("from {range} in {iter}"));
                            for (i, name) in names.iter().enumerate() {
                                let name = self.render_expr(name);
                                clauses.push(format!("let {name} = {range}.Item{}", i + 1));
                            }
                        }
                        _ => {
                            let target = self.render_expr(target);
                            clauses.push(format!("from {target} in {iter}"));
                        }
                    }
                }
                ComprehensionClause::If(cond) => {
                    let cond = self.render_at(cond, Prec::Conditional);
                    clauses.push(format!("where {cond}"));
                }
            }
        }

        let element = self.render_at(&comp.element, Prec::Conditional);
        let select = match (&comp.kind, &comp.value) {
            (ComprehensionKind::Dict, Some(value)) => {
                let value = self.render_expr(value);
                format!("select ({element}, {value})")
            }
            _ => format!("select {element}"),
        };
        clauses.push(select);
        Rendered::new(clauses.join(" "), Prec::Lowest)
    }

    fn render_lambda_params(&mut self, params: &[Param]) -> String {
        let mut names = Vec::with_capacity(params.len());
        for param in params {
            if param.default.is_some() || param.kind != ParamKind::Normal {
                let span = self.span;
                self.warn(
                    "lambda_parameters",
                    span,
                    format!(
                        "lambda parameter `{}` loses its default or unpacking",
                        param.name
                    ),
                );
            }
            names.push(escape_identifier(&param.name));
        }
        names.join(", ")
    }
}
