use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit floating-point number; every numeric literal evaluates to one
    Number(f64),
    /// String value, quotes already stripped
    Text(String),
    /// Result of a comparison
    Boolean(bool),
}

impl Value {
    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Numeric payload, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }
}

impl Default for Value {
    /// What an undefined identifier evaluates to
    fn default() -> Self {
        Value::Number(0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{:?}", n),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_keeps_fraction() {
        assert_eq!(Value::Number(0.0).to_string(), "0.0");
        assert_eq!(Value::Number(11.0).to_string(), "11.0");
        assert_eq!(Value::Number(0.0125).to_string(), "0.0125");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
    }

    #[test]
    fn test_text_and_boolean_display() {
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Number(3.0).as_number(), Some(3.0));
        assert_eq!(Value::from("x").as_number(), None);
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::Boolean(false).as_bool(), Some(false));
        assert_eq!(Value::default(), Value::Number(0.0));
        assert_eq!(Value::from(true).type_name(), "boolean");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Value::Number(1.5)).unwrap();
        assert_eq!(json, r#"{"Number":1.5}"#);
        let back: Value = serde_json::from_str(r#"{"Text":"a"}"#).unwrap();
        assert_eq!(back, Value::from("a"));
    }
}
