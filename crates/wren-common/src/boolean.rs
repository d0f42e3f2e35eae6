//! Boolean coercion policies.
//!
//! Two deliberately different policies coexist:
//!
//! - [`to_boolean`] is lenient and never fails. It is used for
//!   presentation-only flags (visibility toggles, css class switches)
//!   where a sloppy host value should degrade gracefully.
//! - [`field_value_to_boolean`] / [`field_value_to_tristate`] are strict
//!   and fail with a [`FormatError`] for anything that is not a canonical
//!   boolean token. They guard the value-bearing attribute of a control,
//!   where a bad field value must surface as an inline format error
//!   rather than be silently absorbed.

use crate::value::{FormatError, Value};

/// Lenient conversion of a host property value into a boolean.
///
/// Strings are judged by their first character (`1`, `T`, `Y`, `J`,
/// case-insensitive, mean true), numbers by truthiness, booleans pass
/// through, everything else is `false`.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Int(number) => *number != 0,
        Value::Text(text) => matches!(
            text.chars().next().map(|c| c.to_ascii_uppercase()),
            Some('1' | 'T' | 'Y' | 'J')
        ),
        Value::Null | Value::ValRep(_) => false,
    }
}

const TRUE_TOKENS: [&str; 5] = ["1", "t", "true", "on", "yes"];
const FALSE_TOKENS: [&str; 5] = ["0", "f", "false", "off", "no"];

/// Strict conversion of a field value into a boolean.
///
/// Recognizes only the canonical tokens (`1`/`t`/`true`/`on`/`yes` and
/// `0`/`f`/`false`/`off`/`no`, case-insensitive) plus native booleans and
/// the numbers 0 and 1.
///
/// # Errors
///
/// Returns a [`FormatError`] with the canonical message for any other
/// value.
pub fn field_value_to_boolean(value: &Value) -> Result<bool, FormatError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Int(1) => Ok(true),
        Value::Int(0) => Ok(false),
        Value::Text(text) => {
            let token = text.to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Ok(true)
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok(false)
            } else {
                Err(FormatError::cannot_represent())
            }
        }
        _ => Err(FormatError::cannot_represent()),
    }
}

/// Strict conversion of a field value into a tri-state boolean.
///
/// Same token set as [`field_value_to_boolean`], with the empty string and
/// `Null` additionally mapping to `None` (the indeterminate state).
///
/// # Errors
///
/// Returns a [`FormatError`] with the canonical message for any other
/// value.
pub fn field_value_to_tristate(value: &Value) -> Result<Option<bool>, FormatError> {
    match value {
        Value::Null => Ok(None),
        Value::Text(text) if text.is_empty() => Ok(None),
        other => field_value_to_boolean(other).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_first_character_heuristics() {
        assert!(to_boolean(&Value::Text("true".into())));
        assert!(to_boolean(&Value::Text("Taco".into())));
        assert!(to_boolean(&Value::Text("yes".into())));
        assert!(to_boolean(&Value::Text("ja".into())));
        assert!(to_boolean(&Value::Text("1".into())));
        assert!(!to_boolean(&Value::Text("nope".into())));
        assert!(!to_boolean(&Value::Text("".into())));
        assert!(to_boolean(&Value::Int(-3)));
        assert!(!to_boolean(&Value::Int(0)));
        assert!(!to_boolean(&Value::Null));
    }

    #[test]
    fn strict_accepts_only_canonical_tokens() {
        assert_eq!(field_value_to_boolean(&Value::Text("ON".into())), Ok(true));
        assert_eq!(field_value_to_boolean(&Value::Text("off".into())), Ok(false));
        assert_eq!(field_value_to_boolean(&Value::Int(1)), Ok(true));
        assert_eq!(field_value_to_boolean(&Value::Bool(false)), Ok(false));
        assert!(field_value_to_boolean(&Value::Text("tacos".into())).is_err());
        assert!(field_value_to_boolean(&Value::Int(2)).is_err());
        assert!(field_value_to_boolean(&Value::Null).is_err());
    }

    #[test]
    fn tristate_maps_empty_to_indeterminate() {
        assert_eq!(field_value_to_tristate(&Value::Text("".into())), Ok(None));
        assert_eq!(field_value_to_tristate(&Value::Null), Ok(None));
        assert_eq!(field_value_to_tristate(&Value::Text("no".into())), Ok(Some(false)));
        assert!(field_value_to_tristate(&Value::Int(123)).is_err());
    }

    #[test]
    fn strict_error_carries_canonical_message() {
        let error = field_value_to_boolean(&Value::Int(123)).unwrap_err();
        assert!(error.message.contains("cannot be represented"));
    }
}
