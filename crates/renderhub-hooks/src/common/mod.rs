//! Ready-made hooks for code generation.
//!
//! Header hooks ([`TimestampHook`], [`CopyrightHook`], [`LicenseHook`],
//! [`GeneratedWarningHook`]) prepend comments to the rendered output and
//! carry a default [`HookCondition`](crate::HookCondition) restricting them
//! to Go or code output. Data hooks validate and fill render input.

pub mod comment;
pub mod data;
pub mod headers;
pub mod preset;

pub use comment::{CommentBlockStyle, comment_block, line_comment};
pub use data::{defaults_hook, metadata_hook, validate_data_hook};
pub use headers::{
    CopyrightHook, GeneratedWarningHook, LicenseHook, TimestampHook, trailing_whitespace_hook,
};
pub use preset::hooks_from_config;

const CODE_EXTENSIONS: &[&str] = &[".go", ".js", ".ts", ".py", ".java", ".c", ".cpp", ".h", ".hpp"];

const CODE_PATTERNS: &[&str] = &["package ", "import ", "func ", "class ", "def ", "#include"];

/// Returns whether the render looks like Go source.
pub fn is_go_file(template_name: &str, output: &str) -> bool {
    template_name.ends_with(".go")
        || template_name.ends_with(".go.tpl")
        || output.contains("package ")
}

/// Returns whether the render looks like source code in a common language.
pub fn is_code_file(template_name: &str, output: &str) -> bool {
    let by_extension = CODE_EXTENSIONS.iter().any(|ext| {
        template_name.ends_with(ext) || template_name.ends_with(&format!("{ext}.tpl"))
    });

    by_extension || CODE_PATTERNS.iter().any(|pattern| output.contains(pattern))
}
