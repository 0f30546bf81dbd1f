//! Request payloads and their validation.
//!
//! Every form is decoded into typed values before a service touches the
//! repository.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

pub mod auth;
pub mod cart;
pub mod contacts;
pub mod images;
pub mod orders;
pub mod partner;

/// Errors shared by forms that accept loosely encoded lists and flags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListFormError {
    #[error("`items` is required")]
    Missing,
    #[error("`items` must be a list or a JSON encoded list")]
    NotAList,
    #[error("`items` must not be empty")]
    Empty,
    #[error("items[{index}] is not a valid id")]
    InvalidId { index: usize },
}

/// Collapse runs of whitespace and trim the ends.
pub fn sanitize_inline_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed value, or `None` when nothing is left.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| sanitize_inline_text(&value))
        .filter(|value| !value.is_empty())
}

/// Interpret the loose boolean spellings accepted by the API.
///
/// `y yes t true on 1` are true and `n no f false off 0` are false, compared
/// after trimming and ignoring case.
pub fn parse_truthy(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// [`parse_truthy`] for JSON input, which may also carry a real boolean or number.
pub fn parse_truthy_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => parse_truthy(text),
        Value::Number(number) => parse_truthy(&number.to_string()),
        _ => None,
    }
}

/// Accept a JSON list or a string holding a JSON encoded list.
pub fn json_list(items: Option<Value>) -> Result<Vec<Value>, ListFormError> {
    match items {
        None | Some(Value::Null) => Err(ListFormError::Missing),
        Some(Value::Array(values)) => Ok(values),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(values)) => Ok(values),
            _ => Err(ListFormError::NotAList),
        },
        Some(_) => Err(ListFormError::NotAList),
    }
}

/// Parse ids given as `"1,2,3"`, `[1, 2, 3]` or `["1", "2"]`.
///
/// A single malformed entry rejects the whole list.
pub fn id_list(items: Option<Value>) -> Result<Vec<i32>, ListFormError> {
    let ids = match items {
        None | Some(Value::Null) => return Err(ListFormError::Missing),
        Some(Value::String(text)) => text
            .split(',')
            .enumerate()
            .map(|(index, part)| {
                part.trim()
                    .parse::<i32>()
                    .map_err(|_| ListFormError::InvalidId { index })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Array(values)) => values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let parsed = match value {
                    Value::Number(number) => number.as_i64().and_then(|id| i32::try_from(id).ok()),
                    Value::String(text) => text.trim().parse::<i32>().ok(),
                    _ => None,
                };
                parsed.ok_or(ListFormError::InvalidId { index })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Number(number)) => vec![
            number
                .as_i64()
                .and_then(|id| i32::try_from(id).ok())
                .ok_or(ListFormError::InvalidId { index: 0 })?,
        ],
        Some(_) => return Err(ListFormError::NotAList),
    };

    if ids.is_empty() {
        return Err(ListFormError::Empty);
    }
    Ok(ids)
}

/// Deserialize an integer that clients may send either as a number or a numeric string.
pub fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<i32>()
            .map_err(|_| serde::de::Error::custom(format!("`{text}` is not a number"))),
    }
}

/// Optional variant of [`int_or_string`]; `null`, an empty string or an absent field yield `None`.
pub fn opt_int_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("`{text}` is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthy_spellings() {
        for value in ["yes", "1", "true", " On ", "Y", "t"] {
            assert_eq!(parse_truthy(value), Some(true), "{value}");
        }
        for value in ["no", "0", "false", "OFF", "n", "f"] {
            assert_eq!(parse_truthy(value), Some(false), "{value}");
        }
        assert_eq!(parse_truthy("maybe"), None);
        assert_eq!(parse_truthy(""), None);
    }

    #[test]
    fn truthy_json_values() {
        assert_eq!(parse_truthy_value(&json!(true)), Some(true));
        assert_eq!(parse_truthy_value(&json!(0)), Some(false));
        assert_eq!(parse_truthy_value(&json!("yes")), Some(true));
        assert_eq!(parse_truthy_value(&json!(2)), None);
        assert_eq!(parse_truthy_value(&json!(null)), None);
    }

    #[test]
    fn json_list_accepts_encoded_string() {
        let values = json_list(Some(json!("[{\"id\": 1}]"))).unwrap();
        assert_eq!(values, vec![json!({"id": 1})]);

        assert_eq!(json_list(Some(json!("oops"))), Err(ListFormError::NotAList));
        assert_eq!(json_list(None), Err(ListFormError::Missing));
    }

    #[test]
    fn id_list_parses_both_encodings() {
        assert_eq!(id_list(Some(json!("1, 2,3"))).unwrap(), vec![1, 2, 3]);
        assert_eq!(id_list(Some(json!([4, "5"]))).unwrap(), vec![4, 5]);
    }

    #[test]
    fn id_list_rejects_non_numeric_entries() {
        assert_eq!(
            id_list(Some(json!("1,abc"))),
            Err(ListFormError::InvalidId { index: 1 })
        );
        assert_eq!(
            id_list(Some(json!([1, {"id": 2}]))),
            Err(ListFormError::InvalidId { index: 1 })
        );
        assert_eq!(id_list(Some(json!([]))), Err(ListFormError::Empty));
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_inline_text("  Hello \n  world "), "Hello world");
        assert_eq!(non_empty(Some("   ".to_string())), None);
    }
}
