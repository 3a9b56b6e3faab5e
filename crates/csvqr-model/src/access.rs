//! Read-time field access that tolerates any JSON shape.

use serde_json::Value;

/// Finite number at `key`, or `None` when absent, not a number, or non-finite.
#[inline]
pub fn num(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(Value::as_f64).filter(|x| x.is_finite())
}

/// Non-empty string at `key`.
#[inline]
pub fn text(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// JSON truthiness of `key`: `false`, `0`, `""` and `null` are false, like the page script.
pub fn truthy(v: &Value, key: &str) -> bool {
    match v.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Array at `key`, or an empty slice when absent or of another type.
#[inline]
pub fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Any scalar at `key` rendered as display text (`from`/`to` ids may be numbers).
pub fn label(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_read_as_absent() {
        let v = json!({"a": "12", "b": [1], "c": 3.5, "d": null});
        assert_eq!(num(&v, "a"), None);
        assert_eq!(num(&v, "b"), None);
        assert_eq!(num(&v, "c"), Some(3.5));
        assert_eq!(num(&v, "d"), None);
        assert_eq!(num(&v, "missing"), None);
        assert!(array(&v, "a").is_empty());
        assert_eq!(array(&v, "b").len(), 1);
    }

    #[test]
    fn accessors_tolerate_non_objects() {
        let v = json!(42);
        assert_eq!(num(&v, "rows"), None);
        assert_eq!(text(&v, "name"), None);
        assert!(!truthy(&v, "header_present"));
        assert!(array(&v, "stages").is_empty());
    }

    #[test]
    fn truthiness_follows_json_values() {
        let v = json!({"t": true, "f": false, "z": 0, "one": 1, "s": "", "x": "y"});
        assert!(truthy(&v, "t"));
        assert!(!truthy(&v, "f"));
        assert!(!truthy(&v, "z"));
        assert!(truthy(&v, "one"));
        assert!(!truthy(&v, "s"));
        assert!(truthy(&v, "x"));
    }
}
