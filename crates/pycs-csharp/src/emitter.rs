//! Indentation-aware line buffer.

/// Raised when a block is closed more often than it was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("indent level would drop below zero")]
pub struct IndentUnderflow;

/// Accumulates output text one line at a time, prefixing each line with the
/// current indentation.
#[derive(Debug, Clone)]
pub struct Emitter {
    text: String,
    indent_level: usize,
    indent_unit: String,
}

impl Emitter {
    pub fn new(indent_width: usize) -> Self {
        Self::at_level(indent_width, 0)
    }

    /// An empty buffer whose first line starts `level` levels deep.
    pub fn at_level(indent_width: usize, level: usize) -> Self {
        Self {
            text: String::new(),
            indent_level: level,
            indent_unit: " ".repeat(indent_width),
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn indent_width(&self) -> usize {
        self.indent_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Write one line at the current indentation. Empty lines get no indent.
    pub fn line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent_level {
                self.text.push_str(&self.indent_unit);
            }
            self.text.push_str(line);
        }
        self.text.push('\n');
    }

    /// Append text that is already indented and newline-terminated.
    pub fn push_raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) -> Result<(), IndentUnderflow> {
        self.indent_level = self.indent_level.checked_sub(1).ok_or(IndentUnderflow)?;
        Ok(())
    }

    /// `{` on its own line, then one level deeper.
    pub fn open_block(&mut self) {
        self.line("{");
        self.indent();
    }

    pub fn close_block(&mut self) -> Result<(), IndentUnderflow> {
        self.dedent()?;
        self.line("}");
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
