//! Filters registered on every renderer.

use std::collections::HashMap;

use tera::{Result, Value};

/// Names of the filters this module registers.
pub const BUILTIN_FILTERS: &[&str] = &["trim", "lowerfirst"];

/// Filters that ship with Tera itself.
pub(crate) const TERA_FILTERS: &[&str] = &[
    "abs",
    "addslashes",
    "as_str",
    "capitalize",
    "concat",
    "date",
    "default",
    "escape",
    "escape_xml",
    "filesizeformat",
    "filter",
    "first",
    "float",
    "get",
    "group_by",
    "indent",
    "int",
    "join",
    "json_encode",
    "last",
    "length",
    "linebreaksbr",
    "lower",
    "map",
    "nth",
    "pluralize",
    "replace",
    "reverse",
    "round",
    "safe",
    "slice",
    "slugify",
    "sort",
    "spaceless",
    "split",
    "striptags",
    "title",
    "trim_end",
    "trim_end_matches",
    "trim_start",
    "trim_start_matches",
    "truncate",
    "unique",
    "upper",
    "urlencode",
    "urlencode_strict",
    "wordcount",
];

/// Functions that ship with Tera itself.
pub(crate) const TERA_FUNCTIONS: &[&str] = &["get_env", "get_random", "now", "range", "throw"];

/// Trims surrounding whitespace. Null renders as an empty string.
pub fn trim(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_text(value).trim().to_string()))
}

/// Lower-cases the first character.
pub fn lowerfirst(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let text = as_text(value);
    let mut chars = text.chars();
    let lowered: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::String(lowered))
}

/// Text form of a value: strings as-is, null as empty, anything else as JSON.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(filter: fn(&Value, &HashMap<String, Value>) -> Result<Value>, input: &str) -> String {
        let val = Value::String(input.to_string());
        let args = HashMap::new();
        filter(&val, &args).unwrap().as_str().unwrap().to_string()
    }

    #[test]
    fn test_trim() {
        assert_eq!(apply(trim, "  padded \n"), "padded");
        assert_eq!(apply(trim, ""), "");
        assert_eq!(trim(&Value::Null, &HashMap::new()).unwrap(), Value::String(String::new()));
    }

    #[test]
    fn test_lowerfirst() {
        assert_eq!(apply(lowerfirst, "UserName"), "userName");
        assert_eq!(apply(lowerfirst, "already"), "already");
        assert_eq!(apply(lowerfirst, ""), "");
        assert_eq!(apply(lowerfirst, "Éclair"), "éclair");
    }

    #[test]
    fn test_filters_convert_non_strings() {
        let args = HashMap::new();
        assert_eq!(trim(&Value::Number(42.into()), &args).unwrap(), Value::String("42".into()));
        assert_eq!(lowerfirst(&Value::Bool(true), &args).unwrap(), Value::String("true".into()));
        assert_eq!(lowerfirst(&Value::Null, &args).unwrap(), Value::String(String::new()));
        assert_eq!(
            trim(&serde_json::json!(["a", 1]), &args).unwrap(),
            Value::String(r#"["a",1]"#.into())
        );
    }
}
