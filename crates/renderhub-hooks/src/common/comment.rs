//! Comment formatting helpers shared by the header hooks.

/// How to render a block comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlockStyle {
    /// Opening line, e.g. `/*`. Skipped when empty.
    pub start: String,
    /// Prefix for each non-empty content line, e.g. ` * `.
    pub line_prefix: String,
    /// Closing line, e.g. ` */`. Skipped when empty.
    pub end: String,
}

impl CommentBlockStyle {
    /// Creates a style from its three parts.
    pub fn new(start: impl Into<String>, line_prefix: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            line_prefix: line_prefix.into(),
            end: end.into(),
        }
    }

    /// Line-comment style with no delimiters, e.g. `# ` for shell or YAML.
    pub fn lines(prefix: impl Into<String>) -> Self {
        Self::new("", prefix, "")
    }
}

impl Default for CommentBlockStyle {
    fn default() -> Self {
        Self::new("/*", " * ", " */")
    }
}

/// Joins a prefix and content into a single comment line.
pub fn line_comment(prefix: &str, content: &str) -> String {
    format!("{prefix}{content}")
}

/// Renders `lines` as a comment block. Every line, including the
/// delimiters, ends with a newline.
pub fn comment_block<S: AsRef<str>>(style: &CommentBlockStyle, lines: &[S]) -> String {
    let mut block = String::new();
    if !style.start.is_empty() {
        block.push_str(&style.start);
        block.push('\n');
    }
    for line in lines {
        let line = line.as_ref();
        if !line.is_empty() {
            block.push_str(&style.line_prefix);
        }
        block.push_str(line);
        block.push('\n');
    }
    if !style.end.is_empty() {
        block.push_str(&style.end);
        block.push('\n');
    }
    block
}
