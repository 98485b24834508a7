//! Lexical scope tracking.
//!
//! Python has no declarations: a name becomes local to a function the first
//! time it is assigned. C# needs every local declared up front, so each
//! translated body gets a [`ScopeFrame`] collecting the names assigned in
//! it. The frame is rendered as a single declaration line once the body is
//! complete.

use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
}

/// What a `break` inside the current body leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakTarget {
    /// A loop. `on_break` is the sentinel update an `else` clause needs
    /// before each `break` (`noBreak = false;`).
    Loop { on_break: Option<String> },
    /// A `switch` produced from `match`. C# `break` leaves the switch, not
    /// an enclosing loop.
    Switch,
}

#[derive(Debug, Clone)]
pub struct ScopeFrame {
    kind: ScopeKind,
    /// Assigned names in first-assignment order, with their annotation text.
    variables: IndexMap<String, Option<String>>,
    /// Parameters and `global`/`nonlocal` names; never declared here.
    excluded: HashSet<String>,
    /// Attributes assigned through the receiver (`self.x = ...`).
    fields: IndexSet<String>,
    /// Every name the body binds, collected before it is translated.
    /// Generated names stay clear of these.
    reserved: HashSet<String>,
    /// Completion flags of flagged `try` statements, one per nesting depth.
    exception_flags: Vec<String>,
    try_depth: usize,
    name_counts: HashMap<String, usize>,
    break_targets: Vec<BreakTarget>,
    receiver: Option<String>,
    generator: bool,
}

impl ScopeFrame {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            variables: IndexMap::new(),
            excluded: HashSet::new(),
            fields: IndexSet::new(),
            reserved: HashSet::new(),
            exception_flags: Vec::new(),
            try_depth: 0,
            name_counts: HashMap::new(),
            break_targets: Vec::new(),
            receiver: None,
            generator: false,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Record an assigned name. Returns true if it was not known before.
    pub fn record_variable(&mut self, name: &str) -> bool {
        if self.excluded.contains(name) || self.variables.contains_key(name) {
            return false;
        }
        self.variables.insert(name.to_string(), None);
        true
    }

    /// Record a name together with its type annotation. A later annotation
    /// replaces an earlier one; the declaration position stays.
    pub fn record_annotated(&mut self, name: &str, annotation: &str) -> bool {
        let added = self.record_variable(name);
        if let Some(slot) = self.variables.get_mut(name) {
            *slot = Some(annotation.to_string());
        }
        added
    }

    /// Keep `name` out of this frame's declarations.
    pub fn exclude(&mut self, name: &str) {
        self.variables.shift_remove(name);
        self.excluded.insert(name.to_string());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(|a| a.as_deref())
    }

    /// Declared names in first-assignment order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn add_field(&mut self, name: &str) {
        self.fields.insert(name.to_string());
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Names bound somewhere in the body, including ones not yet reached.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
    }

    fn is_taken(&self, name: &str) -> bool {
        self.variables.contains_key(name)
            || self.excluded.contains(name)
            || self.reserved.contains(name)
    }

    /// A name derived from `base` that is unused in this frame: `base`,
    /// then `base1`, `base2`, ...
    pub fn fresh_name(&mut self, base: &str) -> String {
        loop {
            let count = self.name_counts.entry(base.to_string()).or_insert(0);
            let candidate = if *count == 0 {
                base.to_string()
            } else {
                format!("{base}{count}")
            };
            *count += 1;
            if !self.is_taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Enter a `try` that needs a completion flag and return the flag's
    /// name. Nested flagged tries get distinct names.
    pub fn enter_try(&mut self) -> String {
        let name = match self.exception_flags.get(self.try_depth) {
            Some(name) => name.clone(),
            None => {
                let name = self.fresh_name("noException");
                self.exception_flags.push(name.clone());
                name
            }
        };
        self.try_depth += 1;
        name
    }

    pub fn exit_try(&mut self) {
        self.try_depth = self.try_depth.saturating_sub(1);
    }

    /// Whether any `try ... else` in this body needs the hoisted flag.
    pub fn exception_flag_emitted(&self) -> bool {
        !self.exception_flags.is_empty()
    }

    pub fn push_break_target(&mut self, target: BreakTarget) {
        self.break_targets.push(target);
    }

    pub fn pop_break_target(&mut self) -> Option<BreakTarget> {
        self.break_targets.pop()
    }

    pub fn break_target(&self) -> Option<&BreakTarget> {
        self.break_targets.last()
    }

    pub fn set_receiver(&mut self, name: impl Into<String>) {
        self.receiver = Some(name.into());
    }

    /// Mark this function body as an iterator (it contains `yield`).
    pub fn set_generator(&mut self) {
        self.generator = true;
    }

    pub fn is_generator(&self) -> bool {
        self.generator
    }

    /// `PyVariable a, b;` for the recorded names, or `None` if there are none.
    pub fn declaration_line(&self, prefix: &str, value_type: &str) -> Option<String> {
        if self.variables.is_empty() {
            return None;
        }
        let names: Vec<_> = self.variables.keys().map(|n| escape_name(n)).collect();
        Some(format!("{prefix}{value_type} {};", names.join(", ")))
    }

    /// `bool noException;` when a `try ... else` needed it.
    pub fn flag_declaration_line(&self, prefix: &str) -> Option<String> {
        if !self.exception_flag_emitted() {
            return None;
        }
        Some(format!("{prefix}bool {};", self.exception_flags.join(", ")))
    }
}

fn escape_name(name: &str) -> String {
    crate::literal::escape_identifier(name)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("scope stack would drop its module frame")]
    Underflow,

    #[error("scope exited out of order: handle for depth {expected}, stack at depth {actual}")]
    Mismatch { expected: usize, actual: usize },

    #[error("a module frame can only be the outermost scope")]
    NestedModule,
}

/// Proof of a matching [`ScopeStack::enter_scope`]; consumed on exit.
#[derive(Debug)]
#[must_use = "a scope must be exited with its handle"]
pub struct ScopeHandle {
    depth: usize,
}

/// Stack of open scopes. The module frame sits at the bottom for the
/// stack's whole life, so there is always a current frame.
#[derive(Debug)]
pub struct ScopeStack {
    root: ScopeFrame,
    nested: Vec<ScopeFrame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            root: ScopeFrame::new(ScopeKind::Module),
            nested: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        1 + self.nested.len()
    }

    pub fn current(&self) -> &ScopeFrame {
        self.nested.last().unwrap_or(&self.root)
    }

    pub fn current_mut(&mut self) -> &mut ScopeFrame {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    pub fn root(&self) -> &ScopeFrame {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ScopeFrame {
        &mut self.root
    }

    pub fn enter_scope(&mut self, kind: ScopeKind) -> Result<ScopeHandle, ScopeError> {
        if kind == ScopeKind::Module {
            return Err(ScopeError::NestedModule);
        }
        self.nested.push(ScopeFrame::new(kind));
        tracing::debug!(?kind, depth = self.depth(), "enter scope");
        Ok(ScopeHandle {
            depth: self.depth(),
        })
    }

    /// Pop the frame opened by `handle` and hand it back for rendering.
    pub fn exit_scope(&mut self, handle: ScopeHandle) -> Result<ScopeFrame, ScopeError> {
        if handle.depth != self.depth() {
            return Err(ScopeError::Mismatch {
                expected: handle.depth,
                actual: self.depth(),
            });
        }
        let frame = self.nested.pop().ok_or(ScopeError::Underflow)?;
        tracing::debug!(kind = ?frame.kind(), depth = self.depth(), "exit scope");
        Ok(frame)
    }

    /// Name bound to the instance in the innermost enclosing method.
    /// Lookup stops at a class body.
    pub fn receiver(&self) -> Option<&str> {
        for frame in self.nested.iter().rev() {
            if frame.kind == ScopeKind::Class {
                return None;
            }
            if let Some(receiver) = frame.receiver.as_deref() {
                return Some(receiver);
            }
        }
        None
    }

    /// Innermost class body, for recording instance fields.
    pub fn enclosing_class_mut(&mut self) -> Option<&mut ScopeFrame> {
        self.nested
            .iter_mut()
            .rev()
            .find(|frame| frame.kind == ScopeKind::Class)
    }
}
