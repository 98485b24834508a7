//! Function and class definitions.
//!
//! Definitions open their own [`ScopeFrame`](crate::scope::ScopeFrame). The
//! body is rendered into a side buffer first because the declaration line
//! that heads it is only known once the whole body has been seen.

use crate::error::Result;
use crate::literal::escape_identifier;
use crate::scope::ScopeKind;
use crate::translator::Translator;
use indexmap::IndexSet;
use pycs_syntax::{
    Arg, Block, ClassDef, Expr, FunctionDef, Param, ParamKind, Pattern, Stmt, StmtKind,
};

/// Expressions a statement evaluates directly, targets included.
/// Nested blocks are not entered.
fn stmt_exprs(stmt: &Stmt) -> Vec<&Expr> {
    let mut exprs: Vec<&Expr> = Vec::new();
    match &stmt.kind {
        StmtKind::Expr(expr) => exprs.push(expr),
        StmtKind::Assign { targets, value } => {
            exprs.extend(targets);
            exprs.push(value);
        }
        StmtKind::AnnAssign { target, value, .. } => {
            exprs.push(target);
            exprs.extend(value);
        }
        StmtKind::AugAssign { target, value, .. } => exprs.extend([target, value]),
        StmtKind::If { branches, .. } => exprs.extend(branches.iter().map(|b| &b.test)),
        StmtKind::While { test, .. } => exprs.push(test),
        StmtKind::For { target, iter, .. } => exprs.extend([target, iter]),
        StmtKind::With { items, .. } => {
            for item in items {
                exprs.push(&item.context);
                exprs.extend(&item.target);
            }
        }
        StmtKind::Match { subject, cases } => {
            exprs.push(subject);
            exprs.extend(cases.iter().filter_map(|case| case.guard.as_ref()));
        }
        StmtKind::Return(value) => exprs.extend(value),
        StmtKind::Raise { exc, cause } => {
            exprs.extend(exc);
            exprs.extend(cause);
        }
        StmtKind::Delete(targets) => exprs.extend(targets),
        StmtKind::Assert { test, msg } => {
            exprs.push(test);
            exprs.extend(msg);
        }
        _ => {}
    }
    exprs
}

/// Blocks nested directly in a statement, excluding definition bodies.
fn stmt_blocks(stmt: &Stmt) -> Vec<&Block> {
    let mut blocks: Vec<&Block> = Vec::new();
    match &stmt.kind {
        StmtKind::If { branches, orelse } => {
            blocks.extend(branches.iter().map(|b| &b.body));
            blocks.extend(orelse);
        }
        StmtKind::While { body, orelse, .. } | StmtKind::For { body, orelse, .. } => {
            blocks.push(body);
            blocks.extend(orelse);
        }
        StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            blocks.push(body);
            blocks.extend(handlers.iter().map(|h| &h.body));
            blocks.extend(orelse);
            blocks.extend(finalbody);
        }
        StmtKind::With { body, .. } => blocks.push(body),
        StmtKind::Match { cases, .. } => blocks.extend(cases.iter().map(|c| &c.body)),
        _ => {}
    }
    blocks
}

/// What a function body does that decides its C# return type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BodyShape {
    yields: bool,
    returns_value: bool,
}

impl BodyShape {
    fn of(body: &Block) -> Self {
        let mut shape = Self::default();
        shape.scan_block(body);
        shape
    }

    fn scan_block(&mut self, body: &Block) {
        for stmt in body {
            self.scan_stmt(stmt);
        }
    }

    fn scan_stmt(&mut self, stmt: &Stmt) {
        // Nested definitions have their own shape.
        if matches!(stmt.kind, StmtKind::FunctionDef(_) | StmtKind::ClassDef(_)) {
            return;
        }
        if matches!(stmt.kind, StmtKind::Return(Some(_))) {
            self.returns_value = true;
        }
        let is_yield = |expr: &Expr| matches!(expr, Expr::Yield(_) | Expr::YieldFrom(_));
        if stmt_exprs(stmt).into_iter().any(|expr| expr.any(&is_yield)) {
            self.yields = true;
        }
        for block in stmt_blocks(stmt) {
            self.scan_block(block);
        }
    }
}

/// Names a body binds, whether or not translation has reached them yet.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    pub(crate) locals: IndexSet<String>,
    /// Declared `global` here or in any nested function.
    pub(crate) globals: IndexSet<String>,
}

impl Bindings {
    pub(crate) fn of(body: &Block) -> Self {
        let mut bindings = Self::default();
        bindings.scan_block(body);
        bindings
    }

    fn scan_block(&mut self, body: &Block) {
        for stmt in body {
            self.scan_stmt(stmt);
        }
    }

    fn scan_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::FunctionDef(def) => {
                self.locals.insert(def.name.clone());
                self.globals.extend(Self::of(&def.body).globals);
                return;
            }
            StmtKind::ClassDef(class) => {
                self.locals.insert(class.name.clone());
                return;
            }
            StmtKind::Assign { targets, .. } => {
                for target in targets {
                    self.bind_target(target);
                }
            }
            StmtKind::AnnAssign { target, .. }
            | StmtKind::AugAssign { target, .. }
            | StmtKind::For { target, .. } => self.bind_target(target),
            StmtKind::With { items, .. } => {
                for target in items.iter().filter_map(|item| item.target.as_ref()) {
                    self.bind_target(target);
                }
            }
            StmtKind::Try { handlers, .. } => {
                self.locals
                    .extend(handlers.iter().filter_map(|h| h.name.clone()));
            }
            StmtKind::Match { cases, .. } => {
                for case in cases {
                    self.bind_pattern(&case.pattern);
                }
            }
            StmtKind::Global(names) => self.globals.extend(names.iter().cloned()),
            _ => {}
        }
        for expr in stmt_exprs(stmt) {
            self.bind_walrus(expr);
        }
        for block in stmt_blocks(stmt) {
            self.scan_block(block);
        }
    }

    fn bind_target(&mut self, target: &Expr) {
        match target {
            Expr::Name(name) => {
                self.locals.insert(name.clone());
            }
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.bind_target(item);
                }
            }
            Expr::Starred(inner) => self.bind_target(inner),
            _ => {}
        }
    }

    fn bind_walrus(&mut self, expr: &Expr) {
        if let Expr::NamedExpr { target, .. } = expr {
            self.locals.insert(target.clone());
        }
        for child in expr.children() {
            self.bind_walrus(child);
        }
    }

    fn bind_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Capture(name) | Pattern::Star(Some(name)) => {
                self.locals.insert(name.clone());
            }
            Pattern::Sequence(items) | Pattern::Or(items) => {
                for item in items {
                    self.bind_pattern(item);
                }
            }
            Pattern::Mapping { items, rest } => {
                for (_, value) in items {
                    self.bind_pattern(value);
                }
                self.locals.extend(rest.iter().cloned());
            }
            Pattern::Class {
                positional,
                keywords,
                ..
            } => {
                for item in positional.iter().chain(keywords.iter().map(|(_, p)| p)) {
                    self.bind_pattern(item);
                }
            }
            Pattern::As { pattern, name } => {
                self.locals.insert(name.clone());
                self.bind_pattern(pattern);
            }
            _ => {}
        }
    }
}

/// Last segment of a decorator's name: `staticmethod`, `functools.cache`
/// gives `cache`.
fn decorator_name(decorator: &Expr) -> Option<&str> {
    match decorator {
        Expr::Name(name) => Some(name),
        Expr::Attribute { attr, .. } => Some(attr),
        Expr::Call { func, .. } => decorator_name(func),
        _ => None,
    }
}

impl Translator<'_> {
    pub(crate) fn translate_function(&mut self, def: &FunctionDef) -> Result<()> {
        let span = self.span;
        let in_class = self.scopes.current().kind() == ScopeKind::Class;
        let mut is_static = false;
        let mut binds_receiver = in_class;
        let mut drops_first = in_class;
        for decorator in &def.decorators {
            match decorator_name(decorator) {
                Some("staticmethod") if in_class => {
                    is_static = true;
                    binds_receiver = false;
                    drops_first = false;
                }
                Some("classmethod") if in_class => {
                    is_static = true;
                    binds_receiver = false;
                }
                _ => {
                    let text = self.render_expr(decorator);
                    self.emit(&format!("// @{text}"));
                    self.warn("decorator", span, format!("decorator `{text}` is not applied"));
                }
            }
        }

        let mut params: &[Param] = &def.params;
        let mut receiver = None;
        if drops_first {
            if let Some((first, rest)) = params.split_first() {
                if first.kind == ParamKind::Normal {
                    if binds_receiver {
                        receiver = Some(first.name.clone());
                    }
                    params = rest;
                }
            }
        }

        let shape = BodyShape::of(&def.body);
        let header = self.function_header(def, params, shape, in_class, is_static);

        let level = self.out.indent_level();
        let handle = self.enter_scope(ScopeKind::Function)?;
        for param in &def.params {
            self.frame().exclude(&param.name);
        }
        if let Some(receiver) = receiver {
            self.frame().set_receiver(receiver);
        }
        if shape.yields {
            self.frame().set_generator();
        }
        self.frame().reserve(Bindings::of(&def.body).locals);
        let body = self.capture(level + 1, |t| t.translate_block(&def.body));
        let frame = self.exit_scope(handle)?;
        let body = body?;

        self.emit(&header);
        self.open_block();
        self.emit_declarations(&frame, "");
        self.out.push_raw(&body);
        self.close_block()
    }

    fn function_header(
        &mut self,
        def: &FunctionDef,
        params: &[Param],
        shape: BodyShape,
        in_class: bool,
        is_static: bool,
    ) -> String {
        let params = self.render_params(params);
        let value_type = self.value_type();
        if in_class && def.name == "__init__" {
            if let Some(class_name) = self.class_names.last() {
                return format!("public {class_name}({params})");
            }
        }

        let return_type = match (def.is_async, shape.yields, shape.returns_value) {
            (false, true, _) => format!("IEnumerable<{value_type}>"),
            (false, false, true) => value_type.to_string(),
            (false, false, false) => "void".to_string(),
            (true, true, _) => format!("IAsyncEnumerable<{value_type}>"),
            (true, false, true) => format!("Task<{value_type}>"),
            (true, false, false) => "Task".to_string(),
        };
        let mut modifiers = String::new();
        if in_class {
            modifiers.push_str("public ");
        }
        if is_static {
            modifiers.push_str("static ");
        }
        if def.is_async {
            modifiers.push_str("async ");
        }
        format!(
            "{modifiers}{return_type} {}({params})",
            escape_identifier(&def.name)
        )
    }

    fn render_params(&mut self, params: &[Param]) -> String {
        let value_type = self.value_type();
        let rendered: Vec<_> = params
            .iter()
            .map(|param| {
                let name = escape_identifier(&param.name);
                match param.kind {
                    ParamKind::Normal => match &param.default {
                        Some(default) => {
                            format!("{value_type} {name} = {}", self.render_expr(default))
                        }
                        None => format!("{value_type} {name}"),
                    },
                    ParamKind::VarArgs => format!("params {value_type}[] {name}"),
                    ParamKind::KwArgs => format!("Dictionary<string, {value_type}> {name}"),
                }
            })
            .collect();
        rendered.join(", ")
    }

    /// Classes nested in a class stay in place; all others are rendered at
    /// the outermost level and emitted after the top-level statements.
    pub(crate) fn translate_class(&mut self, class: &ClassDef) -> Result<()> {
        let span = self.span;
        let nested = match self.scopes.current().kind() {
            ScopeKind::Class => true,
            ScopeKind::Function => {
                self.note(
                    "class_definition",
                    span,
                    format!("class `{}` moved out of its enclosing function", class.name),
                );
                false
            }
            ScopeKind::Module => false,
        };
        let level = if nested { self.out.indent_level() } else { 0 };
        let text = self.capture(level, |t| t.translate_class_body(class, nested))?;
        if nested {
            self.out.push_raw(&text);
        } else {
            self.deferred_types.push(text);
        }
        Ok(())
    }

    fn translate_class_body(&mut self, class: &ClassDef, nested: bool) -> Result<()> {
        let span = self.span;
        for decorator in &class.decorators {
            let text = self.render_expr(decorator);
            self.emit(&format!("// @{text}"));
            self.warn("decorator", span, format!("decorator `{text}` is not applied"));
        }

        let mut bases = Vec::new();
        for base in &class.bases {
            match base {
                Arg::Positional(Expr::Name(name)) if name == "object" => {}
                Arg::Positional(expr) => bases.push(self.render_expr(expr)),
                other => {
                    let text = match other {
                        Arg::Keyword { name, .. } => format!("`{name}=`"),
                        _ => "unpacked".to_string(),
                    };
                    self.warn(
                        "argument_list",
                        span,
                        format!("{text} base argument of `{}` dropped", class.name),
                    );
                }
            }
        }
        let name = escape_identifier(&class.name);
        let visibility = if nested { "public " } else { "" };
        let mut header = format!("{visibility}class {name}");
        if !bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&bases.join(", "));
        }

        let level = self.out.indent_level();
        let handle = self.enter_scope(ScopeKind::Class)?;
        self.class_names.push(class.name.clone());
        self.frame().reserve(Bindings::of(&class.body).locals);
        let parts = self.translate_class_members(&class.body, level);
        self.class_names.pop();
        let frame = self.exit_scope(handle)?;
        let (members, initializer) = parts?;

        self.emit(&header);
        self.open_block();
        let value_type = self.value_type();
        if let Some(line) = frame.declaration_line("public static ", value_type) {
            self.emit(&line);
        }
        let fields: Vec<_> = frame
            .fields()
            .filter(|field| !frame.is_declared(field))
            .map(escape_identifier)
            .collect();
        if !fields.is_empty() {
            self.emit(&format!("public {value_type} {};", fields.join(", ")));
        }
        if let Some(line) = frame.flag_declaration_line("static ") {
            self.emit(&line);
        }
        if !initializer.is_empty() {
            self.emit(&format!("static {name}()"));
            self.open_block();
            self.out.push_raw(&initializer);
            self.close_block()?;
        }
        self.out.push_raw(&members);
        self.close_block()
    }

    /// Split a class body into member declarations and the statements that
    /// go into the static constructor.
    fn translate_class_members(&mut self, body: &Block, level: usize) -> Result<(String, String)> {
        let mut members = String::new();
        let mut initializer = String::new();
        for stmt in body {
            match &stmt.kind {
                StmtKind::Pass | StmtKind::Expr(Expr::Ellipsis) => {}
                StmtKind::FunctionDef(_)
                | StmtKind::ClassDef(_)
                | StmtKind::Comment(_)
                | StmtKind::Expr(Expr::Str(_)) => {
                    members.push_str(&self.capture(level + 1, |t| t.translate_stmt(stmt))?);
                }
                _ => {
                    initializer.push_str(&self.capture(level + 2, |t| t.translate_stmt(stmt))?);
                }
            }
        }
        Ok((members, initializer))
    }
}
