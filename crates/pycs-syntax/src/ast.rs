//! Typed Python syntax tree.
//!
//! Every statement carries the source position of its first token so later
//! stages can attach diagnostics. Node kinds the reader does not understand
//! are preserved as `Unsupported` variants holding the original text rather
//! than being dropped.

use serde::Serialize;

/// 1-based source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Expr(Expr),
    /// `a = b = value`; targets in source order.
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    AugAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },
    /// `if`/`elif` chain; the first branch is the `if` itself.
    If {
        branches: Vec<IfBranch>,
        orelse: Option<Block>,
    },
    While {
        test: Expr,
        body: Block,
        orelse: Option<Block>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Block,
        orelse: Option<Block>,
        is_async: bool,
    },
    Try {
        body: Block,
        handlers: Vec<ExceptHandler>,
        orelse: Option<Block>,
        finalbody: Option<Block>,
    },
    With {
        items: Vec<WithItem>,
        body: Block,
        is_async: bool,
    },
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Match {
        subject: Expr,
        cases: Vec<MatchCase>,
    },
    Return(Option<Expr>),
    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
    },
    Delete(Vec<Expr>),
    Assert {
        test: Expr,
        msg: Option<Expr>,
    },
    Import(Vec<ImportName>),
    ImportFrom {
        /// Dotted module path, including leading dots for relative imports.
        module: String,
        names: Vec<ImportName>,
        wildcard: bool,
    },
    Global(Vec<String>),
    Nonlocal(Vec<String>),
    Pass,
    Break,
    Continue,
    /// `# text`, without the leading hash.
    Comment(String),
    Unsupported {
        kind: String,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfBranch {
    pub test: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptHandler {
    /// Empty for a bare `except:`.
    pub types: Vec<Expr>,
    pub name: Option<String>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithItem {
    pub context: Expr,
    pub target: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Option<Expr>,
    pub body: Block,
    pub decorators: Vec<Expr>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
}

impl Param {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Normal,
            annotation: None,
            default: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    Normal,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Arg>,
    pub body: Block,
    pub decorators: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportName {
    /// Dotted name as written.
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Name(String),
    /// Integer literal as written (`0x1F`, `0o17`, `1_000`).
    Int(String),
    Float(String),
    /// `3j`, as written.
    Imaginary(String),
    Str(StrLit),
    FString(FString),
    Bool(bool),
    None,
    Ellipsis,
    BinOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BoolOp {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a < b <= c` is `left: a, comparisons: [(Lt, b), (LtE, c)]`.
    Compare {
        left: Box<Expr>,
        comparisons: Vec<(CmpOp, Expr)>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    /// `name := value`
    NamedExpr {
        target: String,
        value: Box<Expr>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        index: Vec<Expr>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Arg>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<DictItem>),
    Comprehension(Box<Comprehension>),
    Await(Box<Expr>),
    Yield(Option<Box<Expr>>),
    YieldFrom(Box<Expr>),
    /// `*value` inside a display or assignment target.
    Starred(Box<Expr>),
    Unsupported {
        kind: String,
        text: String,
        span: Span,
    },
}

/// A plain string literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrLit {
    /// Text between the quotes, escapes untouched.
    pub body: String,
    pub raw: bool,
    pub bytes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FString {
    pub parts: Vec<FStringPart>,
    pub raw: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FStringPart {
    /// Literal text, escapes untouched.
    Literal(String),
    Interpolation {
        expr: Expr,
        format_spec: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Arg {
    Positional(Expr),
    Keyword { name: String, value: Expr },
    /// `*args`
    Star(Expr),
    /// `**kwargs`
    DoubleStar(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DictItem {
    Pair { key: Expr, value: Expr },
    Splat(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comprehension {
    pub kind: ComprehensionKind,
    /// The element, or the key for dict comprehensions.
    pub element: Expr,
    /// The value for dict comprehensions.
    pub value: Option<Expr>,
    pub clauses: Vec<ComprehensionClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ComprehensionClause {
    For { target: Expr, iter: Expr },
    If(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinaryOp {
    /// Parse a Python operator token (`+`, `//`, `**`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "@" => Self::MatMul,
            "/" => Self::Div,
            "//" => Self::FloorDiv,
            "%" => Self::Mod,
            "**" => Self::Pow,
            "<<" => Self::LShift,
            ">>" => Self::RShift,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "&" => Self::BitAnd,
            _ => return None,
        })
    }

    /// Parse an augmented assignment token (`+=`, `//=`, ...).
    pub fn from_augmented(symbol: &str) -> Option<Self> {
        symbol.strip_suffix('=').and_then(Self::from_symbol)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::MatMul => "@",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Pos,
    Invert,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    /// Parse a comparison operator with whitespace collapsed (`not in`, `is not`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "==" => Self::Eq,
            "!=" | "<>" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtE,
            ">" => Self::Gt,
            ">=" => Self::GtE,
            "is" => Self::Is,
            "is not" => Self::IsNot,
            "in" => Self::In,
            "not in" => Self::NotIn,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// A bare name that binds the subject.
    Capture(String),
    /// Literal value (numbers, strings, `None`, booleans, negated numbers).
    Literal(Expr),
    /// Dotted constant such as `Color.RED`.
    Value(String),
    /// `[a, b]`, `(a, b)` or a top-level `a, b`.
    Sequence(Vec<Pattern>),
    /// `*rest` inside a sequence; `None` for `*_`.
    Star(Option<String>),
    Mapping {
        items: Vec<(Pattern, Pattern)>,
        rest: Option<String>,
    },
    Class {
        cls: String,
        positional: Vec<Pattern>,
        keywords: Vec<(String, Pattern)>,
    },
    Or(Vec<Pattern>),
    As {
        pattern: Box<Pattern>,
        name: String,
    },
    Unsupported {
        kind: String,
        text: String,
        span: Span,
    },
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Statement at line 1, column 1. Handy for building trees by hand.
    pub fn bare(kind: StmtKind) -> Self {
        Self::new(kind, Span::new(1, 1))
    }

    pub fn expr(expr: Expr) -> Self {
        Self::bare(StmtKind::Expr(expr))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::bare(StmtKind::Assign {
            targets: vec![target],
            value,
        })
    }
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn int(value: i64) -> Self {
        Self::Int(value.to_string())
    }

    pub fn string(body: impl Into<String>) -> Self {
        Self::Str(StrLit {
            body: body.into(),
            raw: false,
            bytes: false,
        })
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn attr(value: Expr, attr: impl Into<String>) -> Self {
        Self::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Self::Call {
            func: Box::new(func),
            args: args.into_iter().map(Arg::Positional).collect(),
        }
    }

    /// Direct subexpressions, in source order.
    ///
    /// Does not descend into lambda bodies or comprehension clauses, which
    /// open their own Python scope.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Name(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Imaginary(_)
            | Self::Str(_)
            | Self::Bool(_)
            | Self::None
            | Self::Ellipsis
            | Self::Lambda { .. }
            | Self::Comprehension(_)
            | Self::Unsupported { .. } => Vec::new(),
            Self::FString(fstring) => fstring
                .parts
                .iter()
                .filter_map(|part| match part {
                    FStringPart::Interpolation { expr, .. } => Some(expr),
                    FStringPart::Literal(_) => None,
                })
                .collect(),
            Self::BinOp { left, right, .. } | Self::BoolOp { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Self::UnaryOp { operand, .. } => vec![operand.as_ref()],
            Self::Compare { left, comparisons } => std::iter::once(left.as_ref())
                .chain(comparisons.iter().map(|(_, e)| e))
                .collect(),
            Self::IfExp { test, body, orelse } => {
                vec![body.as_ref(), test.as_ref(), orelse.as_ref()]
            }
            Self::NamedExpr { value, .. } | Self::Attribute { value, .. } => vec![value.as_ref()],
            Self::Subscript { value, index } => {
                std::iter::once(value.as_ref()).chain(index.iter()).collect()
            }
            Self::Slice { lower, upper, step } => [lower, upper, step]
                .into_iter()
                .flatten()
                .map(|e| e.as_ref())
                .collect(),
            Self::Call { func, args } => std::iter::once(func.as_ref())
                .chain(args.iter().map(|arg| match arg {
                    Arg::Positional(e)
                    | Arg::Keyword { value: e, .. }
                    | Arg::Star(e)
                    | Arg::DoubleStar(e) => e,
                }))
                .collect(),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => items.iter().collect(),
            Self::Dict(items) => items
                .iter()
                .flat_map(|item| match item {
                    DictItem::Pair { key, value } => vec![key, value],
                    DictItem::Splat(e) => vec![e],
                })
                .collect(),
            Self::Await(e) | Self::YieldFrom(e) | Self::Starred(e) => vec![e.as_ref()],
            Self::Yield(e) => e.iter().map(|e| e.as_ref()).collect(),
        }
    }

    /// True if `pred` holds for this expression or any subexpression
    /// reachable through [`Expr::children`].
    pub fn any(&self, pred: &impl Fn(&Expr) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|child| child.any(pred))
    }
}
