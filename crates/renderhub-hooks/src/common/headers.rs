//! Post-hooks that prepend headers or clean up rendered output.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local, Utc};

use renderhub_core::error::AppError;

use super::comment::{CommentBlockStyle, comment_block, line_comment};
use super::{is_code_file, is_go_file};
use crate::definitions::{HookCondition, PostHook};

const DEFAULT_LINE_PREFIX: &str = "// ";

/// Placeholder replaced by the formatted time in a timestamp message.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

fn go_file() -> HookCondition {
    HookCondition::new(|ctx| is_go_file(&ctx.template_name, &ctx.output))
}

fn code_file() -> HookCondition {
    HookCondition::new(|ctx| is_code_file(&ctx.template_name, &ctx.output))
}

fn guarded(hook: PostHook, condition: Option<HookCondition>) -> PostHook {
    match condition {
        Some(condition) => hook.when(condition),
        None => hook,
    }
}

fn passthrough(name: &'static str) -> PostHook {
    PostHook::named(name, |ctx| Ok(ctx.output.clone()))
}

/// Prepends a "Generated on" line. Runs on Go output by default.
#[derive(Debug, Clone)]
pub struct TimestampHook {
    comment_prefix: String,
    format: String,
    message: String,
    utc: bool,
    fixed_time: Option<DateTime<FixedOffset>>,
    condition: Option<HookCondition>,
}

impl Default for TimestampHook {
    fn default() -> Self {
        Self {
            comment_prefix: DEFAULT_LINE_PREFIX.to_string(),
            format: "%Y-%m-%d %H:%M:%S".to_string(),
            message: format!("Generated on {TIMESTAMP_PLACEHOLDER}"),
            utc: false,
            fixed_time: None,
            condition: Some(go_file()),
        }
    }
}

impl TimestampHook {
    /// Creates the hook with its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the line comment prefix.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Overrides the `chrono` format string.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Overrides the message; `{timestamp}` is replaced by the formatted time.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Formats the current time in UTC instead of local time.
    pub fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Always stamps `time` instead of the current time.
    pub fn fixed_time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.fixed_time = Some(time);
        self
    }

    /// Replaces the run condition.
    pub fn condition(mut self, condition: HookCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Runs on every render.
    pub fn unconditional(mut self) -> Self {
        self.condition = None;
        self
    }

    /// Builds the post-hook.
    pub fn build(mut self) -> PostHook {
        let condition = self.condition.take();
        let hook = PostHook::named("timestamp", move |ctx| {
            let mut stamp = String::new();
            let written = match self.fixed_time {
                Some(time) => write!(stamp, "{}", time.format(&self.format)),
                None if self.utc => write!(stamp, "{}", Utc::now().format(&self.format)),
                None => write!(stamp, "{}", Local::now().format(&self.format)),
            };
            written.map_err(|_| {
                AppError::validation(format!("invalid timestamp format '{}'", self.format))
            })?;

            let message = self.message.replace(TIMESTAMP_PLACEHOLDER, &stamp);
            let header = line_comment(&self.comment_prefix, &message);
            Ok(format!("{header}\n{}", ctx.output))
        });
        guarded(hook, condition)
    }
}

/// Prepends a copyright line. Runs on code output by default.
#[derive(Debug, Clone)]
pub struct CopyrightHook {
    copyright: String,
    comment_prefix: String,
    condition: Option<HookCondition>,
}

impl CopyrightHook {
    /// Creates the hook for `copyright`. Empty text produces a no-op hook.
    pub fn new(copyright: impl Into<String>) -> Self {
        Self {
            copyright: copyright.into(),
            comment_prefix: DEFAULT_LINE_PREFIX.to_string(),
            condition: Some(code_file()),
        }
    }

    /// Overrides the line comment prefix.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Replaces the run condition.
    pub fn condition(mut self, condition: HookCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Runs on every render.
    pub fn unconditional(mut self) -> Self {
        self.condition = None;
        self
    }

    /// Builds the post-hook.
    pub fn build(self) -> PostHook {
        if self.copyright.is_empty() {
            return passthrough("copyright");
        }
        let header = line_comment(&self.comment_prefix, &self.copyright);
        let hook = PostHook::named("copyright", move |ctx| Ok(format!("{header}\n{}", ctx.output)));
        guarded(hook, self.condition)
    }
}

/// Prepends a license comment block. Runs on code output by default.
#[derive(Debug, Clone)]
pub struct LicenseHook {
    license: String,
    style: CommentBlockStyle,
    condition: Option<HookCondition>,
}

impl LicenseHook {
    /// Creates the hook for `license`. Empty text produces a no-op hook.
    pub fn new(license: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            style: CommentBlockStyle::default(),
            condition: Some(code_file()),
        }
    }

    /// Overrides the block comment style.
    pub fn style(mut self, style: CommentBlockStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces the run condition.
    pub fn condition(mut self, condition: HookCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Runs on every render.
    pub fn unconditional(mut self) -> Self {
        self.condition = None;
        self
    }

    /// Builds the post-hook.
    pub fn build(self) -> PostHook {
        if self.license.is_empty() {
            return passthrough("license");
        }
        let lines: Vec<&str> = self.license.split('\n').collect();
        let header = comment_block(&self.style, &lines);
        let hook = PostHook::named("license", move |ctx| Ok(format!("{header}\n{}", ctx.output)));
        guarded(hook, self.condition)
    }
}

/// Prepends a "do not edit" warning. Runs on Go output by default.
#[derive(Debug, Clone)]
pub struct GeneratedWarningHook {
    comment_prefix: String,
    message: String,
    condition: Option<HookCondition>,
}

impl Default for GeneratedWarningHook {
    fn default() -> Self {
        Self {
            comment_prefix: DEFAULT_LINE_PREFIX.to_string(),
            message: "Code generated by renderhub. DO NOT EDIT.".to_string(),
            condition: Some(go_file()),
        }
    }
}

impl GeneratedWarningHook {
    /// Creates the hook with its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the line comment prefix.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Overrides the warning text.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replaces the run condition.
    pub fn condition(mut self, condition: HookCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Runs on every render.
    pub fn unconditional(mut self) -> Self {
        self.condition = None;
        self
    }

    /// Builds the post-hook.
    pub fn build(self) -> PostHook {
        let header = line_comment(&self.comment_prefix, &self.message);
        let hook = PostHook::named("generated_warning", move |ctx| {
            Ok(format!("{header}\n{}", ctx.output))
        });
        guarded(hook, self.condition)
    }
}

/// Strips trailing spaces and tabs from every line of the output.
pub fn trailing_whitespace_hook() -> PostHook {
    PostHook::named("trailing_whitespace", |ctx| {
        let lines: Vec<&str> = ctx
            .output
            .split('\n')
            .map(|line| line.trim_end_matches([' ', '\t']))
            .collect();
        Ok(lines.join("\n"))
    })
}
