//! Pre-hooks that stamp, validate, or fill render input.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use renderhub_core::error::AppError;

use crate::context::DataMap;
use crate::definitions::PreHook;

/// Records `processed_at`, `template_name` and `template_content` in the
/// context metadata. `template_content` is null for named templates.
pub fn metadata_hook() -> PreHook {
    PreHook::named("metadata", |ctx| {
        let processed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let content = ctx
            .template_source
            .clone()
            .map_or(Value::Null, Value::String);

        ctx.set_metadata("processed_at", processed_at);
        ctx.set_metadata("template_name", ctx.template_name.clone());
        ctx.set_metadata("template_content", content);
        Ok(())
    })
}

/// Fails the render when any of `fields` is absent from the data.
pub fn validate_data_hook<I, S>(fields: I) -> PreHook
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    PreHook::named("validate_data", move |ctx| {
        match fields.iter().find(|field| !ctx.data.contains_key(field.as_str())) {
            Some(missing) => Err(AppError::validation(format!(
                "required field '{missing}' is missing"
            ))),
            None => Ok(()),
        }
    })
}

/// Inserts every entry of `defaults` whose key the data does not already hold.
pub fn defaults_hook(defaults: DataMap) -> PreHook {
    PreHook::named("defaults", move |ctx| {
        for (key, value) in &defaults {
            if !ctx.data.contains_key(key) {
                ctx.data.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    })
}
