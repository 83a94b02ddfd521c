//! Indented tree rendering for multi-line diagnostics

const INDENT: &str = "    ";
const BULLET: &str = "  - ";

/// Builds text shaped like
///
/// ```text
/// Root node:
///   - Child
///       - Grandchild
/// ```
///
/// A parent gets a trailing `:` once its first child is added.
#[derive(Debug, Default)]
pub struct TreeFormatter {
    buffer: String,
    /// One entry per open `start_children`; true once a child was written.
    levels: Vec<bool>,
}

impl TreeFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, text: &str) -> &mut Self {
        let depth = self.levels.len();
        if let Some(has_children) = self.levels.last_mut() {
            if !*has_children && !self.buffer.ends_with(':') {
                self.buffer.push(':');
            }
            *has_children = true;
        }
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        if depth > 0 {
            self.buffer.push_str(&INDENT.repeat(depth - 1));
            self.buffer.push_str(BULLET);
        }
        self.buffer.push_str(text);
        self
    }

    /// Append to the current node.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    pub fn start_children(&mut self) -> &mut Self {
        self.levels.push(false);
        self
    }

    pub fn end_children(&mut self) -> &mut Self {
        self.levels.pop();
        self
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}
