//! Conversion of caller data into the engine's data map.

use serde::Serialize;
use serde_json::Value;

use renderhub_core::error::AppError;
use renderhub_core::result::AppResult;
use renderhub_hooks::DataMap;

/// Converts any serializable value into a [`DataMap`].
///
/// `null` becomes an empty map and objects are taken as-is. Every other
/// shape is rejected with a validation error.
pub fn to_data_map<T: Serialize + ?Sized>(data: &T) -> AppResult<DataMap> {
    match serde_json::to_value(data)? {
        Value::Null => Ok(DataMap::new()),
        Value::Object(map) => Ok(map),
        other => Err(AppError::validation(format!(
            "render data must be a map or struct, got {}",
            kind_of(&other)
        ))),
    }
}

/// Returns `globals` overlaid with `data`; caller keys win.
pub fn overlay(globals: &DataMap, data: DataMap) -> DataMap {
    let mut merged = globals.clone();
    merged.extend(data);
    merged
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}
