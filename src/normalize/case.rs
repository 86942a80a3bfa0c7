//! Key casing: `respondentName` / `type-name` -> `respondent_name` / `type_name`.

use serde_json::{Map, Value};

use crate::error::CoreError;

const SEPARATOR: char = '_';

/// Convert a camelCase / kebab-case key to lowercase snake_case.
///
/// A separator is inserted before every ASCII uppercase letter that is not the
/// first character. Hyphens and spaces become separators and the result is
/// lowercased.
/// Separators are never doubled by the conversion, so applying it twice is the
/// same as applying it once.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch == '-' || ch == ' ' {
            if !out.is_empty() && !out.ends_with(SEPARATOR) {
                out.push(SEPARATOR);
            }
        } else if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with(SEPARATOR) {
                out.push(SEPARATOR);
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Rebuild `value` with every mapping key converted by [`to_snake_case`].
///
/// Recurses through nested mappings and through mappings held in lists. The
/// input is left untouched; the returned tree is a fresh copy. Two keys of one
/// mapping that convert to the same name are a `MalformedPayload`.
pub fn normalize_keys(value: &Value) -> Result<Value, CoreError> {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                let snake = to_snake_case(key);
                if out.contains_key(&snake) {
                    let other = map
                        .keys()
                        .find(|k| *k != key && to_snake_case(k) == snake)
                        .map_or(snake.as_str(), String::as_str);
                    return Err(CoreError::malformed(format!(
                        "keys '{other}' and '{key}' both normalize to '{snake}'"
                    )));
                }
                out.insert(snake, normalize_keys(child)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(normalize_keys)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}
