//! Indented text accumulator for stub output.

use super::format_docstring;

/// One level of indentation in generated stubs.
pub const INDENT: &str = "    ";

/// Append-only output with a current indentation depth.
///
/// Blank and whitespace-only lines are never indented, so the buffer never
/// contains trailing whitespace that it did not receive verbatim.
///
/// # Example
///
/// ```
/// use nbstub_codegen::builder::OutputBuffer;
///
/// let mut out = OutputBuffer::new();
/// out.write_ln("class Point:");
/// out.push_indent();
/// out.write_ln("x: int");
/// out.write_ln("");
/// out.push_dedent();
///
/// assert_eq!(out.as_str(), "class Point:\n    x: int\n\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    depth: usize,
    buffer: String,
}

impl OutputBuffer {
    /// Create an empty buffer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text.
    pub fn write(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    /// Append a line at the current depth.
    pub fn write_ln(&mut self, line: &str) -> &mut Self {
        if !line.trim().is_empty() {
            self.write_indent();
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
        self
    }

    /// Append a paragraph, indenting each of its non-blank lines.
    pub fn write_par(&mut self, text: &str) -> &mut Self {
        for line in text.split_inclusive('\n') {
            if !line.trim().is_empty() {
                self.write_indent();
            }
            self.buffer.push_str(line);
        }
        self
    }

    /// Append a docstring at the current depth.
    pub fn put_docstring(&mut self, doc: &str) -> &mut Self {
        let doc = format_docstring(doc);
        self.write_par(&doc)
    }

    /// Replace the newline that ends the buffer with `suffix` and a newline.
    ///
    /// Used to turn an emitted header into `header: ...` or `header:`.
    pub fn close_line(&mut self, suffix: &str) -> &mut Self {
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
        }
        self.buffer.push_str(suffix);
        self.buffer.push('\n');
        self
    }

    /// Increase the depth by one level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Decrease the depth by one level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Run `f` one level deeper, restoring the depth afterwards.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_indent();
        let result = f(self);
        self.push_dedent();
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Length of the text emitted so far, in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_not_indented() {
        let mut out = OutputBuffer::new();
        out.push_indent();
        out.write_ln("a").write_ln("").write_ln("   ").write_ln("b");
        assert_eq!(out.as_str(), "    a\n\n\n    b\n");
    }

    #[test]
    fn test_write_par_skips_blank_lines() {
        let mut out = OutputBuffer::new();
        out.push_indent();
        out.write_par("\"\"\"\nfirst\n\nsecond\n\"\"\"\n");
        assert_eq!(out.as_str(), "    \"\"\"\n    first\n\n    second\n    \"\"\"\n");
    }

    #[test]
    fn test_close_line() {
        let mut out = OutputBuffer::new();
        out.write_ln("def f(x: int) -> int");
        out.close_line(": ...");
        assert_eq!(out.as_str(), "def f(x: int) -> int: ...\n");
    }

    #[test]
    fn test_indented_restores_depth() {
        let mut out = OutputBuffer::new();
        out.indented(|o| {
            o.write_ln("pass");
            assert_eq!(o.depth(), 1);
        });
        assert_eq!(out.depth(), 0);
        assert_eq!(out.as_str(), "    pass\n");
    }

    #[test]
    fn test_docstring_at_depth() {
        let mut out = OutputBuffer::new();
        out.indented(|o| {
            o.put_docstring("Hello.");
        });
        assert_eq!(out.as_str(), "    \"\"\"Hello.\"\"\"\n");
    }
}
