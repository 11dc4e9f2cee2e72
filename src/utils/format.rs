//! Formatting helpers for emitted source text
//!
//! Indentation tracking, temporary-name allocation, string-literal escaping
//! and docstring comment rendering.

/// Escape sequences applied to string literals in generated sources
const ESCAPES: [(char, &str); 5] = [
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('\t', "\\t"),
    ('"', "\\\""),
    ('\\', "\\\\"),
];

/// Escape a string for use inside a double-quoted literal.
///
/// Only the five characters of the escape table are rewritten; every other
/// character, non-ASCII included, is copied unchanged.
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match ESCAPES.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Render a block comment from free-form documentation.
///
/// `start` and `end` are emitted on their own lines when non-empty, every
/// line of `contents` gets `line_prefix`, and each line is prefixed with
/// `indent`. Trailing whitespace is trimmed per line.
pub fn docstring_comment(
    indent: &str,
    start: &str,
    line_prefix: &str,
    contents: &str,
    end: &str,
) -> String {
    let mut out = String::new();
    let mut push_line = |text: &str| {
        let line = format!("{}{}", indent, text);
        out.push_str(line.trim_end());
        out.push('\n');
    };

    if !start.is_empty() {
        push_line(start);
    }
    for line in contents.lines() {
        push_line(&format!("{}{}", line_prefix, line));
    }
    if !end.is_empty() {
        push_line(end);
    }
    out
}

/// Indentation level tracker (two spaces per level)
#[derive(Debug, Default, Clone)]
pub struct Indenter {
    depth: usize,
}

impl Indenter {
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    pub fn indent_up(&mut self) {
        self.depth += 1;
    }

    /// Decrease the indentation level.
    ///
    /// # Panics
    ///
    /// Panics when the level is already zero: an unbalanced `indent_down`
    /// is a bug in the backend, not a user error.
    pub fn indent_down(&mut self) {
        assert!(self.depth > 0, "indent_down called at indentation level 0");
        self.depth -= 1;
    }

    /// Current indentation level
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current indentation as a string of spaces
    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

/// Allocator of unique temporary variable names (`name0`, `name1`, ...).
///
/// Names are unique within one allocator only.
#[derive(Debug, Default, Clone)]
pub struct TempNames {
    counter: usize,
}

impl TempNames {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Return `prefix` followed by the next counter value
    pub fn tmp(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.counter);
        self.counter += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("a\nb\"c\\d"), "a\\nb\\\"c\\\\d");
        assert_eq!(escape_string("tab\there\r"), "tab\\there\\r");
    }

    #[test]
    fn test_escape_string_passthrough() {
        assert_eq!(escape_string(""), "");
        assert_eq!(escape_string("plain 'quotes' {}"), "plain 'quotes' {}");
        assert_eq!(escape_string("héllo → 世界\n"), "héllo → 世界\\n");
    }

    #[test]
    fn test_indent_levels() {
        let mut ind = Indenter::new();
        assert_eq!(ind.indent(), "");
        for _ in 0..3 {
            ind.indent_up();
        }
        assert_eq!(ind.indent(), "      ");
        assert_eq!(ind.depth(), 3);
        for _ in 0..3 {
            ind.indent_down();
        }
        assert_eq!(ind.indent(), "");
    }

    #[test]
    #[should_panic(expected = "indentation level 0")]
    fn test_indent_underflow_panics() {
        let mut ind = Indenter::new();
        ind.indent_up();
        ind.indent_down();
        ind.indent_down();
    }

    #[test]
    fn test_tmp_names() {
        let mut names = TempNames::new();
        assert_eq!(names.tmp("x"), "x0");
        assert_eq!(names.tmp("x"), "x1");
        assert_eq!(names.tmp("elem"), "elem2");

        // Separate allocators count independently
        let mut other = TempNames::new();
        assert_eq!(other.tmp("x"), "x0");
    }

    #[test]
    fn test_docstring_comment() {
        let out = docstring_comment("  ", "/**", " * ", "First line\n\nSecond line\n", " */");
        assert_eq!(out, "  /**\n   * First line\n   *\n   * Second line\n   */\n");
    }

    #[test]
    fn test_docstring_comment_without_delimiters() {
        let out = docstring_comment("", "", "// ", "one\ntwo", "");
        assert_eq!(out, "// one\n// two\n");
    }
}
