//! Fail-soft accessors over untyped upstream payloads

use serde_json::Value;

/// Walk an object path; `None` as soon as a segment is missing
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(key))
}

/// Array at `path`, or an empty slice when the path is missing or not an array
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    at(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The payload itself when it is an array, otherwise the array under `key`
pub fn root_or_array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        _ => array_at(value, &[key]),
    }
}

/// Non-empty text at `key`; numeric values are rendered as text
pub fn text(value: &Value, key: &str) -> Option<String> {
    text_at(value, &[key])
}

pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    match at(value, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Unsigned integer at `key`, accepting numeric strings
pub fn number(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Sort key for quality ladders; missing or non-numeric sorts last
pub fn quality(value: &Value) -> f64 {
    match value.get("quality") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_at_missing_or_wrong_type() {
        let v = json!({"data": {"list": "nope"}});
        assert!(array_at(&v, &["data", "list"]).is_empty());
        assert!(array_at(&v, &["data", "missing"]).is_empty());
        assert!(array_at(&Value::Null, &["data"]).is_empty());
    }

    #[test]
    fn test_root_or_array() {
        assert_eq!(root_or_array(&json!([1, 2]), "data").len(), 2);
        assert_eq!(root_or_array(&json!({"data": [1]}), "data").len(), 1);
        assert!(root_or_array(&json!({"other": [1]}), "data").is_empty());
    }

    #[test]
    fn test_text_accepts_numbers_and_skips_empty() {
        let v = json!({"a": "x", "b": 42, "c": "", "d": null, "e": true});
        assert_eq!(text(&v, "a").as_deref(), Some("x"));
        assert_eq!(text(&v, "b").as_deref(), Some("42"));
        assert_eq!(text(&v, "c"), None);
        assert_eq!(text(&v, "d"), None);
        assert_eq!(text(&v, "e"), None);
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let v = json!({"a": 3, "b": "7", "c": "x", "d": -1});
        assert_eq!(number(&v, "a"), Some(3));
        assert_eq!(number(&v, "b"), Some(7));
        assert_eq!(number(&v, "c"), None);
        assert_eq!(number(&v, "d"), None);
    }
}
