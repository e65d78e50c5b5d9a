//! Hook chain assembled from the `[hooks]` configuration section.

use renderhub_core::config::hooks::HooksConfig;

use super::data::{defaults_hook, validate_data_hook};
use super::headers::{
    CopyrightHook, GeneratedWarningHook, LicenseHook, TimestampHook, trailing_whitespace_hook,
};
use crate::chain::HookChain;

/// Builds the chain of common hooks enabled in `config`.
///
/// Defaults are applied before required fields are checked. Header hooks
/// each prepend to the output, so the generated warning ends up on the
/// first line.
pub fn hooks_from_config(config: &HooksConfig) -> HookChain {
    let mut chain = HookChain::new();

    if !config.defaults.is_empty() {
        chain.add_pre_hook(defaults_hook(config.defaults.clone()));
    }
    if !config.required_fields.is_empty() {
        chain.add_pre_hook(validate_data_hook(config.required_fields.iter().cloned()));
    }

    if config.trim_trailing_whitespace {
        chain.add_post_hook(trailing_whitespace_hook());
    }
    if let Some(license) = &config.license {
        chain.add_post_hook(LicenseHook::new(license.as_str()).build());
    }
    if let Some(copyright) = &config.copyright {
        chain.add_post_hook(CopyrightHook::new(copyright.as_str()).build());
    }
    if config.timestamp {
        chain.add_post_hook(TimestampHook::new().build());
    }
    if config.generated_warning {
        chain.add_post_hook(GeneratedWarningHook::new().build());
    }

    chain
}
