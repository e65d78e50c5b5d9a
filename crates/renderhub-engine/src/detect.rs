//! Inline source vs. template name detection.

/// Returns `true` when `input` holds template syntax and should be rendered
/// as inline source rather than looked up by name.
pub fn is_template_source(input: &str) -> bool {
    input.contains("{{") || input.contains("{%")
}
