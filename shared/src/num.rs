use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A numeric field tolerant of the API's loose encodings: a JSON number,
/// a string with `.` or `,` as the decimal separator, or null/absent.
/// Non-finite values are treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexNum(pub Option<f64>);

impl FlexNum {
    pub const fn none() -> Self {
        FlexNum(None)
    }

    pub fn some(v: f64) -> Self {
        if v.is_finite() {
            FlexNum(Some(v))
        } else {
            FlexNum(None)
        }
    }

    pub const fn get(self) -> Option<f64> {
        self.0
    }

    pub fn or(self, fallback: f64) -> f64 {
        self.0.unwrap_or(fallback)
    }
}

impl From<f64> for FlexNum {
    fn from(v: f64) -> Self {
        FlexNum::some(v)
    }
}

/// Parse a decimal string, accepting `,` as the decimal separator.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let normalized = s.replace(',', ".");
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a loose JSON value to a finite f64.
pub fn coerce(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FlexNum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(FlexNum(raw.as_ref().and_then(coerce)))
    }
}

impl Serialize for FlexNum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlexNum, parse_decimal};

    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(default)]
        v: FlexNum,
    }

    fn parse(json: &str) -> Option<f64> {
        serde_json::from_str::<Holder>(json).unwrap().v.get()
    }

    #[test]
    fn accepts_plain_number() {
        assert_eq!(parse(r#"{"v": 46.1}"#), Some(46.1));
    }

    #[test]
    fn accepts_dot_decimal_string() {
        assert_eq!(parse(r#"{"v": "14.95"}"#), Some(14.95));
    }

    #[test]
    fn accepts_comma_decimal_string() {
        assert_eq!(parse(r#"{"v": "14,95"}"#), Some(14.95));
    }

    #[test]
    fn null_and_missing_are_absent() {
        assert_eq!(parse(r#"{"v": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn garbage_string_is_absent() {
        assert_eq!(parse(r#"{"v": "abc"}"#), None);
        assert_eq!(parse(r#"{"v": ""}"#), None);
    }

    #[test]
    fn non_finite_is_absent() {
        assert_eq!(FlexNum::some(f64::NAN).get(), None);
        assert_eq!(FlexNum::some(f64::INFINITY).get(), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(parse_decimal("  46.1  "), Some(46.1));
    }
}
