//! Logical property values.
//!
//! Widget properties travel between the host framework and the engine as
//! loosely typed values: strings for most attributes, booleans for flags,
//! integers for sizes, and valrep lists for option-bearing controls. This
//! module defines that value space plus the RESET-aware delta wrapper.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a valrep list: an internal value and its display
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValRepItem {
    /// The internal (field) value.
    pub value: String,
    /// The human-readable representation shown for the value.
    pub representation: String,
}

impl ValRepItem {
    /// Create a valrep item from a value/representation pair.
    pub fn new(value: impl Into<String>, representation: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            representation: representation.into(),
        }
    }
}

/// A logical property value.
///
/// `Null` doubles as "absent": assigning it to an HTML attribute removes
/// the attribute (see the attribute workers in `wren-engine`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value / attribute absent.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// An integer (tab indexes, lengths, bounds).
    Int(i64),
    /// Free text.
    Text(String),
    /// An ordered value/representation list.
    ValRep(Vec<ValRepItem>),
}

impl Value {
    /// True if this is the `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the valrep list, if this value is one.
    pub fn as_valrep(&self) -> Option<&[ValRepItem]> {
        match self {
            Value::ValRep(items) => Some(items),
            _ => None,
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Text is parsed as a whole decimal integer (surrounding whitespace
    /// allowed); booleans and valrep lists have no integer reading.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            Value::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Render the value the way it reads in warning and error messages.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Int(number) => number.to_string(),
            Value::Text(text) => text.clone(),
            Value::ValRep(items) => format!("<valrep[{}]>", items.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Int(i64::from(number))
    }
}

impl From<Vec<ValRepItem>> for Value {
    fn from(items: Vec<ValRepItem>) -> Self {
        Value::ValRep(items)
    }
}

/// One entry of an incoming property delta.
///
/// The host framework may send the distinguished RESET sentinel in place of
/// a value; it means "revert this path to its class default". Defaults and
/// the authoritative property store never hold `Reset`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaValue {
    /// Revert the path to its registered class default.
    Reset,
    /// Set the path to the given value.
    Set(Value),
}

impl From<Value> for DeltaValue {
    fn from(value: Value) -> Self {
        DeltaValue::Set(value)
    }
}

impl From<&str> for DeltaValue {
    fn from(text: &str) -> Self {
        DeltaValue::Set(Value::from(text))
    }
}

impl From<String> for DeltaValue {
    fn from(text: String) -> Self {
        DeltaValue::Set(Value::from(text))
    }
}

impl From<bool> for DeltaValue {
    fn from(flag: bool) -> Self {
        DeltaValue::Set(Value::from(flag))
    }
}

impl From<i64> for DeltaValue {
    fn from(number: i64) -> Self {
        DeltaValue::Set(Value::from(number))
    }
}

impl From<i32> for DeltaValue {
    fn from(number: i32) -> Self {
        DeltaValue::Set(Value::from(number))
    }
}

impl From<Vec<ValRepItem>> for DeltaValue {
    fn from(items: Vec<ValRepItem>) -> Self {
        DeltaValue::Set(Value::from(items))
    }
}

/// A field value could not be coerced into the shape its control requires.
///
/// Format errors are never propagated across a refresh boundary; the
/// value worker that hits one converts it into the widget's
/// `uniface:format-error` property pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    /// The user-facing message, rendered as the error icon tooltip.
    pub message: String,
}

impl FormatError {
    /// The canonical conversion-failure message.
    pub fn cannot_represent() -> Self {
        Self {
            message: "Internal value cannot be represented by control. \
                      Either correct the value or contact your system administrator."
                .to_string(),
        }
    }

    /// A format error with a custom message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_reading_of_text() {
        assert_eq!(Value::Text(" 42 ".into()).as_int(), Some(42));
        assert_eq!(Value::Text("4x".into()).as_int(), None);
        assert_eq!(Value::Int(-1).as_int(), Some(-1));
        assert_eq!(Value::Bool(true).as_int(), None);
    }

    #[test]
    fn null_is_default_and_absent() {
        assert!(Value::default().is_null());
        assert_eq!(Value::Null.display_string(), "null");
    }

    #[test]
    fn delta_wraps_values() {
        assert_eq!(DeltaValue::from("on"), DeltaValue::Set(Value::Text("on".into())));
        assert_eq!(DeltaValue::from(true), DeltaValue::Set(Value::Bool(true)));
    }

    #[test]
    fn valrep_serializes_as_object_list() {
        let value = Value::ValRep(vec![ValRepItem::new("1", "one")]);
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, r#"[{"value":"1","representation":"one"}]"#);
    }
}
