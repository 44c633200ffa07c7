//! Safe navigation over loosely-typed HEMIS payloads.
//!
//! Endpoint responses are deeply nested JSON whose shape varies between
//! deployments. [`Doc`] wraps a borrowed `Value` and makes every lookup
//! total: missing keys, wrong types, and nulls degrade to a neutral
//! default instead of panicking or erroring.

use chrono::{DateTime, Utc};
use serde_json::Value;

static EMPTY_ARRAY: Vec<Value> = Vec::new();

/// Borrowed view over a JSON payload with total accessors.
#[derive(Debug, Clone, Copy)]
pub struct Doc<'a>(pub &'a Value);

impl<'a> Doc<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Child lookup. Missing keys and non-objects yield a null document.
    pub fn get(&self, key: &str) -> Doc<'a> {
        Doc(self.0.get(key).unwrap_or(&Value::Null))
    }

    /// Nested lookup along a key path.
    pub fn path(&self, keys: &[&str]) -> Doc<'a> {
        keys.iter().fold(*self, |doc, key| doc.get(key))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.0.as_str()
    }

    /// String value, or `default` when absent or not a string.
    pub fn str_or(&self, default: &'a str) -> &'a str {
        self.0.as_str().unwrap_or(default)
    }

    pub fn i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Array items, or an empty slice for anything that is not an array.
    pub fn array(&self) -> &'a [Value] {
        self.0.as_array().unwrap_or(&EMPTY_ARRAY)
    }

    /// Truthiness in the loose sense the payloads rely on: null and absent
    /// are false, numbers are false at zero, strings and containers are
    /// false when empty.
    pub fn is_truthy(&self) -> bool {
        match self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    /// Render a scalar for display: strings unquoted, numbers and bools in
    /// their canonical form, everything else empty.
    pub fn display(&self) -> String {
        match self.0 {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Unix-seconds timestamp rendered as a UTC calendar date, `N/A` when
    /// the field is absent or not a plausible timestamp.
    pub fn date(&self) -> String {
        self.timestamp()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Unix-seconds timestamp rendered with time of day.
    pub fn datetime(&self) -> String {
        self.timestamp()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.as_i64()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }
}

/// Whether a HEMIS envelope reports success. Anything other than a literal
/// `"success": true` counts as failure.
pub fn success(value: &Value) -> bool {
    value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// The `data` member of a HEMIS envelope.
pub fn data(value: &Value) -> Doc<'_> {
    Doc(value).get("data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lookup_degrades_to_null() {
        let value = json!({ "a": { "b": 1 } });
        let doc = Doc(&value);
        assert_eq!(doc.path(&["a", "b"]).i64(), Some(1));
        assert_eq!(doc.path(&["a", "missing", "deeper"]).i64(), None);
        assert_eq!(doc.get("a").get("b").get("c").str_or("N/A"), "N/A");
    }

    #[test]
    fn test_truthiness_matches_loose_semantics() {
        assert!(!Doc(&json!(null)).is_truthy());
        assert!(!Doc(&json!(0)).is_truthy());
        assert!(!Doc(&json!("")).is_truthy());
        assert!(!Doc(&json!([])).is_truthy());
        assert!(!Doc(&json!({})).is_truthy());
        assert!(Doc(&json!(0.5)).is_truthy());
        assert!(Doc(&json!("x")).is_truthy());
        assert!(Doc(&json!([1])).is_truthy());
    }

    #[test]
    fn test_display_renders_scalars_only() {
        assert_eq!(Doc(&json!("hello")).display(), "hello");
        assert_eq!(Doc(&json!(42)).display(), "42");
        assert_eq!(Doc(&json!(true)).display(), "true");
        assert_eq!(Doc(&json!({ "k": 1 })).display(), "");
        assert_eq!(Doc(&json!(null)).display(), "");
    }

    #[test]
    fn test_date_rendering() {
        // 2024-03-01 00:00:00 UTC
        assert_eq!(Doc(&json!(1_709_251_200)).date(), "2024-03-01");
        assert_eq!(Doc(&json!("not a number")).date(), "N/A");
        assert_eq!(Doc(&json!(null)).datetime(), "N/A");
    }

    #[test]
    fn test_envelope_helpers() {
        assert!(success(&json!({ "success": true })));
        assert!(!success(&json!({ "success": "true" })));
        assert!(!success(&json!({})));
        let value = json!({ "success": true, "data": [1, 2] });
        assert_eq!(data(&value).array().len(), 2);
    }
}
