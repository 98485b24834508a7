//! Statement translation.

use crate::error::Result;
use crate::expr::Prec;
use crate::literal::escape_identifier;
use crate::scope::BreakTarget;
use crate::translator::Translator;
use pycs_syntax::{
    Block, ExceptHandler, Expr, IfBranch, ImportName, MatchCase, Pattern, Stmt, StmtKind, WithItem,
};

impl Translator<'_> {
    pub(crate) fn translate_block(&mut self, body: &Block) -> Result<()> {
        for stmt in body {
            self.translate_stmt(stmt)?;
        }
        Ok(())
    }

    /// `{ body }` on its own lines at the current level.
    pub(crate) fn translate_braced(&mut self, body: &Block) -> Result<()> {
        self.open_block();
        self.translate_block(body)?;
        self.close_block()
    }

    /// Translate one statement. Every statement leaves the indentation
    /// where it found it.
    pub(crate) fn translate_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        let outer_span = std::mem::replace(&mut self.span, stmt.span);
        let level = self.out.indent_level();
        self.dispatch(stmt)?;
        if self.out.indent_level() != level {
            return Err(self.invariant(format!(
                "statement changed indentation from {level} to {}",
                self.out.indent_level()
            )));
        }
        self.span = outer_span;
        Ok(())
    }

    fn dispatch(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.translate_expr_stmt(expr),
            StmtKind::Assign { targets, value } => {
                self.translate_assign(targets, value);
                Ok(())
            }
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
            } => {
                self.translate_ann_assign(target, annotation, value.as_ref());
                Ok(())
            }
            StmtKind::AugAssign { target, op, value } => {
                let target_text = self.render_expr(target);
                let value_text = self.render_expr(value);
                let line = match self.helper_for(*op) {
                    Some(helper) => format!("{target_text} = {helper}({target_text}, {value_text});"),
                    None => format!("{target_text} {}= {value_text};", op.symbol()),
                };
                self.emit(&line);
                Ok(())
            }
            StmtKind::If { branches, orelse } => self.translate_if(branches, orelse.as_ref()),
            StmtKind::While { test, body, orelse } => {
                self.translate_while(test, body, orelse.as_ref())
            }
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
                is_async,
            } => self.translate_for(target, iter, body, orelse.as_ref(), *is_async),
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.translate_try(body, handlers, orelse.as_ref(), finalbody.as_ref()),
            StmtKind::With {
                items,
                body,
                is_async,
            } => self.translate_with(items, body, *is_async),
            StmtKind::FunctionDef(def) => self.translate_function(def),
            StmtKind::ClassDef(class) => self.translate_class(class),
            StmtKind::Match { subject, cases } => self.translate_match(subject, cases),
            StmtKind::Return(value) => {
                self.translate_return(value.as_ref());
                Ok(())
            }
            StmtKind::Raise { exc, cause } => {
                self.translate_raise(exc.as_ref(), cause.as_ref());
                Ok(())
            }
            StmtKind::Delete(targets) => {
                for target in targets {
                    self.translate_delete(target);
                }
                Ok(())
            }
            StmtKind::Assert { test, msg } => {
                let mut args = vec![self.render_expr(test)];
                if let Some(msg) = msg {
                    args.push(self.render_expr(msg));
                }
                self.emit(&format!("System.Diagnostics.Debug.Assert({});", args.join(", ")));
                Ok(())
            }
            StmtKind::Import(names) => {
                self.translate_import(names);
                Ok(())
            }
            StmtKind::ImportFrom {
                module,
                names,
                wildcard,
            } => {
                self.translate_import_from(module, names, *wildcard);
                Ok(())
            }
            StmtKind::Global(names) => {
                for name in names {
                    self.frame().exclude(name);
                    self.scopes.root_mut().record_variable(name);
                }
                Ok(())
            }
            StmtKind::Nonlocal(names) => {
                for name in names {
                    self.frame().exclude(name);
                }
                Ok(())
            }
            StmtKind::Pass => {
                self.emit(";");
                Ok(())
            }
            StmtKind::Break => {
                self.translate_break();
                Ok(())
            }
            StmtKind::Continue => {
                self.emit("continue;");
                Ok(())
            }
            StmtKind::Comment(text) => {
                self.emit(&format!("// {text}"));
                Ok(())
            }
            StmtKind::Unsupported { kind, text } => {
                self.warn(kind, stmt.span, "statement has no C# translation; kept as a comment");
                let mut lines = text.lines();
                let first = lines.next().unwrap_or_default();
                self.emit(&format!("// unsupported {kind}: {first}"));
                for line in lines {
                    self.emit(&format!("// {line}"));
                }
                Ok(())
            }
        }
    }

    fn translate_expr_stmt(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            // Docstrings and other bare strings.
            Expr::Str(lit) => {
                for line in lit.body.trim().lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        self.emit("//");
                    } else {
                        self.emit(&format!("// {line}"));
                    }
                }
            }
            Expr::Ellipsis => self.emit(";"),
            Expr::Yield(None) => self.emit("yield return null;"),
            Expr::Yield(Some(value)) => {
                let value = self.render_expr(value);
                self.emit(&format!("yield return {value};"));
            }
            Expr::YieldFrom(iterable) => {
                let item = self.frame().fresh_name("_it");
                let iterable = self.render_expr(iterable);
                self.emit(&format!("foreach (var {item} in {iterable})"));
                self.open_block();
                self.emit(&format!("yield return {item};"));
                self.close_block()?;
            }
            _ => {
                let text = self.render_expr(expr);
                self.emit(&format!("{text};"));
            }
        }
        Ok(())
    }

    fn translate_assign(&mut self, targets: &[Expr], value: &Expr) {
        for target in targets {
            self.record_target(target);
        }
        let value = self.render_expr(value);
        let Some((first, rest)) = targets.split_first() else {
            self.emit(&format!("{value};"));
            return;
        };
        let first = self.render_target(first);
        self.emit(&format!("{first} = {value};"));
        for target in rest {
            let target = self.render_target(target);
            self.emit(&format!("{target} = {first};"));
        }
    }

    fn translate_ann_assign(&mut self, target: &Expr, annotation: &Expr, value: Option<&Expr>) {
        match target {
            Expr::Name(name) => {
                let annotation = annotation_text(annotation);
                self.frame().record_annotated(name, &annotation);
            }
            other => self.record_target(other),
        }
        if let Some(value) = value {
            let target = self.render_target(target);
            let value = self.render_expr(value);
            self.emit(&format!("{target} = {value};"));
        }
    }

    /// Record the names an assignment target binds in the current frame.
    /// `self.x` targets become fields of the enclosing class instead.
    pub(crate) fn record_target(&mut self, target: &Expr) {
        match target {
            Expr::Name(name) => {
                self.frame().record_variable(name);
            }
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.record_target(item);
                }
            }
            Expr::Starred(inner) => self.record_target(inner),
            Expr::Attribute { value, attr } => {
                let through_receiver = match value.as_ref() {
                    Expr::Name(name) => self.scopes.receiver() == Some(name.as_str()),
                    _ => false,
                };
                if through_receiver {
                    if let Some(class) = self.scopes.enclosing_class_mut() {
                        class.add_field(attr);
                    }
                }
            }
            _ => {}
        }
    }

    /// Assignment target text. Tuple and list unpacking become C#
    /// deconstruction.
    pub(crate) fn render_target(&mut self, target: &Expr) -> String {
        match target {
            Expr::Tuple(items) | Expr::List(items) => {
                let items: Vec<_> = items.iter().map(|item| self.render_target(item)).collect();
                format!("({})", items.join(", "))
            }
            Expr::Starred(inner) => {
                let span = self.span;
                self.warn(
                    "list_splat_pattern",
                    span,
                    "starred unpacking has no C# deconstruction; bound to the single target",
                );
                self.render_target(inner)
            }
            other => self.render_expr(other),
        }
    }

    fn translate_if(&mut self, branches: &[IfBranch], orelse: Option<&Block>) -> Result<()> {
        for (index, branch) in branches.iter().enumerate() {
            let test = self.render_expr(&branch.test);
            let keyword = if index == 0 { "if" } else { "else if" };
            self.emit(&format!("{keyword} ({test})"));
            self.translate_braced(&branch.body)?;
        }
        if let Some(orelse) = orelse {
            self.emit("else");
            self.translate_braced(orelse)?;
        }
        Ok(())
    }

    fn translate_while(&mut self, test: &Expr, body: &Block, orelse: Option<&Block>) -> Result<()> {
        let sentinel = orelse.map(|_| self.frame().fresh_name("noBreak"));
        if let Some(sentinel) = &sentinel {
            self.emit(&format!("bool {sentinel} = true;"));
        }
        let test = self.render_expr(test);
        self.emit(&format!("while ({test})"));
        self.frame().push_break_target(BreakTarget::Loop {
            on_break: sentinel.as_ref().map(|s| format!("{s} = false;")),
        });
        let result = self.translate_braced(body);
        self.frame().pop_break_target();
        result?;
        if let (Some(sentinel), Some(orelse)) = (sentinel, orelse) {
            self.emit(&format!("if ({sentinel})"));
            self.translate_braced(orelse)?;
        }
        Ok(())
    }

    fn translate_for(
        &mut self,
        target: &Expr,
        iter: &Expr,
        body: &Block,
        orelse: Option<&Block>,
        is_async: bool,
    ) -> Result<()> {
        let sentinel = orelse.map(|_| self.frame().fresh_name("loopExecuted"));
        if let Some(sentinel) = &sentinel {
            self.emit(&format!("bool {sentinel} = false;"));
        }
        self.record_target(target);
        let iter = self.render_expr(iter);
        let item = self.frame().fresh_name("_it");
        let keyword = if is_async { "await foreach" } else { "foreach" };
        self.emit(&format!("{keyword} (var {item} in {iter})"));
        self.open_block();
        if let Some(sentinel) = &sentinel {
            self.emit(&format!("{sentinel} = true;"));
        }
        let target = self.render_target(target);
        self.emit(&format!("{target} = {item};"));
        self.frame()
            .push_break_target(BreakTarget::Loop { on_break: None });
        let result = self.translate_block(body);
        self.frame().pop_break_target();
        result?;
        self.close_block()?;
        if let (Some(sentinel), Some(orelse)) = (sentinel, orelse) {
            self.emit(&format!("if (!{sentinel})"));
            self.translate_braced(orelse)?;
        }
        Ok(())
    }

    fn translate_break(&mut self) {
        match self.scopes.current().break_target().cloned() {
            Some(BreakTarget::Loop { on_break }) => {
                if let Some(update) = on_break {
                    self.emit(&update);
                }
            }
            Some(BreakTarget::Switch) => {
                let span = self.span;
                self.warn(
                    "break_statement",
                    span,
                    "break inside match leaves the switch, not the enclosing loop",
                );
            }
            None => {}
        }
        self.emit("break;");
    }

    fn translate_try(
        &mut self,
        body: &Block,
        handlers: &[ExceptHandler],
        orelse: Option<&Block>,
        finalbody: Option<&Block>,
    ) -> Result<()> {
        let flag = self.frame().enter_try();
        self.emit(&format!("{flag} = false;"));
        self.emit("try");
        self.open_block();
        self.translate_block(body)?;
        self.emit(&format!("{flag} = true;"));
        self.close_block()?;
        for handler in handlers {
            self.translate_handler(handler)?;
        }
        if let Some(finalbody) = finalbody {
            self.emit("finally");
            self.translate_braced(finalbody)?;
        }
        if let Some(orelse) = orelse {
            self.emit(&format!("if ({flag})"));
            self.translate_braced(orelse)?;
        }
        self.frame().exit_try();
        Ok(())
    }

    fn translate_handler(&mut self, handler: &ExceptHandler) -> Result<()> {
        self.span = handler.span;
        let name = handler.name.as_deref().map(escape_identifier);
        let header = match (handler.types.as_slice(), name) {
            ([], None) => "catch".to_string(),
            ([], Some(name)) => format!("catch (Exception {name})"),
            ([ty], None) => format!("catch ({})", self.render_expr(ty)),
            ([ty], Some(name)) => format!("catch ({} {name})", self.render_expr(ty)),
            (types, name) => {
                let name = match name {
                    Some(name) => name,
                    None => self.frame().fresh_name("ex"),
                };
                let tests: Vec<_> = types
                    .iter()
                    .map(|ty| format!("{name} is {}", self.render_at(ty, Prec::Primary)))
                    .collect();
                format!("catch (Exception {name}) when ({})", tests.join(" || "))
            }
        };
        self.emit(&header);
        self.translate_braced(&handler.body)
    }

    fn translate_with(&mut self, items: &[WithItem], body: &Block, is_async: bool) -> Result<()> {
        let keyword = if is_async { "await using" } else { "using" };
        for item in items {
            if let Some(target) = &item.target {
                self.record_target(target);
            }
            let context = self.render_expr(&item.context);
            let header = match &item.target {
                Some(target) => {
                    let target = self.render_target(target);
                    format!("{keyword} ({target} = {context})")
                }
                None => format!("{keyword} ({context})"),
            };
            self.emit(&header);
        }
        self.translate_braced(body)
    }

    fn translate_match(&mut self, subject: &Expr, cases: &[MatchCase]) -> Result<()> {
        let tuple_subject = matches!(subject, Expr::Tuple(_));
        let subject = self.render_expr(subject);
        self.emit(&format!("switch ({subject})"));
        self.open_block();
        self.frame().push_break_target(BreakTarget::Switch);
        let result = cases
            .iter()
            .try_for_each(|case| self.translate_case(case, tuple_subject));
        self.frame().pop_break_target();
        result?;
        self.close_block()
    }

    fn translate_case(&mut self, case: &MatchCase, tuple_subject: bool) -> Result<()> {
        self.span = case.span;
        let guard = case
            .guard
            .as_ref()
            .map(|guard| format!(" when {}", self.render_expr(guard)));
        let label = match (&case.pattern, guard) {
            (Pattern::Wildcard, None) => "default:".to_string(),
            (Pattern::Wildcard, Some(guard)) => format!("case var _{guard}:"),
            (pattern, guard) => {
                let pattern = self.render_case_pattern(pattern, tuple_subject);
                format!("case {pattern}{}:", guard.unwrap_or_default())
            }
        };
        self.emit(&label);
        self.out.indent();
        self.translate_block(&case.body)?;
        if !ends_in_jump(&case.body) {
            self.emit("break;");
        }
        self.dedent()
    }

    fn translate_return(&mut self, value: Option<&Expr>) {
        if self.scopes.current().is_generator() {
            if value.is_some() {
                let span = self.span;
                self.warn(
                    "return_statement",
                    span,
                    "iterator methods cannot return a value; value dropped",
                );
            }
            self.emit("yield break;");
            return;
        }
        match value {
            Some(value) => {
                let value = self.render_expr(value);
                self.emit(&format!("return {value};"));
            }
            None => self.emit("return;"),
        }
    }

    fn translate_raise(&mut self, exc: Option<&Expr>, cause: Option<&Expr>) {
        if cause.is_some() {
            let span = self.span;
            self.note("raise_statement", span, "exception cause (`from ...`) dropped");
        }
        let Some(exc) = exc else {
            self.emit("throw;");
            return;
        };
        let text = match exc {
            Expr::Name(name) if is_type_name(name) => format!("new {}()", self.render_expr(exc)),
            Expr::Call { func, .. } if callee_is_type(func) => {
                format!("new {}", self.render_expr(exc))
            }
            _ => self.render_expr(exc),
        };
        self.emit(&format!("throw {text};"));
    }

    fn translate_delete(&mut self, target: &Expr) {
        match target {
            Expr::Subscript { value, index } => {
                let span = self.span;
                self.note(
                    "delete_statement",
                    span,
                    "del on an item lowered to Remove(); check the collection type",
                );
                let value = self.render_at(value, Prec::Primary);
                let index: Vec<_> = index.iter().map(|i| self.render_expr(i)).collect();
                self.emit(&format!("{value}.Remove({});", index.join(", ")));
            }
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.translate_delete(item);
                }
            }
            other => {
                let target = self.render_expr(other);
                self.emit(&format!("{target} = null;"));
            }
        }
    }

    fn translate_import(&mut self, names: &[ImportName]) {
        for import in names {
            let using = match &import.alias {
                Some(alias) => format!("using {} = {};", escape_identifier(alias), import.name),
                None => format!("using {};", import.name),
            };
            self.usings.insert(using);
        }
    }

    fn translate_import_from(&mut self, module: &str, names: &[ImportName], wildcard: bool) {
        if module.starts_with('.') {
            let span = self.span;
            self.warn(
                "import_from_statement",
                span,
                format!("relative import from `{module}` has no C# equivalent"),
            );
            self.emit(&format!("// from {module} import ..."));
            return;
        }
        if wildcard {
            self.usings.insert(format!("using static {module};"));
            return;
        }
        for import in names {
            let alias = import.alias.as_deref().unwrap_or(&import.name);
            self.usings.insert(format!(
                "using {} = {module}.{};",
                escape_identifier(alias),
                import.name
            ));
        }
    }
}

/// Annotation as written, for the scope record.
fn annotation_text(annotation: &Expr) -> String {
    match annotation {
        Expr::Name(name) => name.clone(),
        Expr::None => "None".to_string(),
        Expr::Str(lit) => lit.body.clone(),
        Expr::Attribute { value, attr } => format!("{}.{attr}", annotation_text(value)),
        Expr::Subscript { value, index } => {
            let index: Vec<_> = index.iter().map(annotation_text).collect();
            format!("{}[{}]", annotation_text(value), index.join(", "))
        }
        Expr::BinOp { left, op, right } => format!(
            "{} {} {}",
            annotation_text(left),
            op.symbol(),
            annotation_text(right)
        ),
        Expr::List(items) | Expr::Tuple(items) => {
            let items: Vec<_> = items.iter().map(annotation_text).collect();
            format!("[{}]", items.join(", "))
        }
        Expr::Unsupported { text, .. } => text.clone(),
        _ => String::new(),
    }
}

/// Whether control cannot fall off the end of `body`.
fn ends_in_jump(body: &Block) -> bool {
    body.iter()
        .rev()
        .find(|stmt| !matches!(stmt.kind, StmtKind::Comment(_)))
        .is_some_and(|stmt| {
            matches!(
                stmt.kind,
                StmtKind::Return(_) | StmtKind::Raise { .. } | StmtKind::Break | StmtKind::Continue
            )
        })
}

fn is_type_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

/// `ValueError(...)` or `errors.ParseError(...)` constructs an exception.
fn callee_is_type(func: &Expr) -> bool {
    match func {
        Expr::Name(name) => is_type_name(name),
        Expr::Attribute { attr, .. } => is_type_name(attr),
        _ => false,
    }
}
