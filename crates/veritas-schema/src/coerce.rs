//! Builtin coercers.
//!
//! Each coercer turns a non-null raw value into a typed [`Value`] or returns
//! the reason it could not. `null` never reaches a coercer.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value as Raw;
use veritas_core::Value;

/// A shared coercion function.
pub type Coercer = Arc<dyn Fn(&Raw) -> Result<Value, String> + Send + Sync>;

/// Accepts strings only.
pub fn string(raw: &Raw) -> Result<Value, String> {
    match raw {
        Raw::String(s) => Ok(Value::String(s.clone())),
        _ => Err("not a string".to_string()),
    }
}

/// Accepts integral numbers and strings that are entirely an integer.
pub fn integer(raw: &Raw) -> Result<Value, String> {
    const REASON: &str = "not an integer";
    match raw {
        Raw::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Integer(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(Value::Integer(f as i64))
                }
                _ => Err(REASON.to_string()),
            }
        }
        Raw::String(s) => s
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| REASON.to_string()),
        _ => Err(REASON.to_string()),
    }
}

/// Accepts numbers and strings that are entirely a finite float.
pub fn float(raw: &Raw) -> Result<Value, String> {
    const REASON: &str = "not a float";
    match raw {
        Raw::Number(n) => n.as_f64().map(Value::Float).ok_or_else(|| REASON.to_string()),
        Raw::String(s) => match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(REASON.to_string()),
        },
        _ => Err(REASON.to_string()),
    }
}

/// Accepts numbers and exact decimal strings.
pub fn decimal(raw: &Raw) -> Result<Value, String> {
    const REASON: &str = "not a decimal";
    match raw {
        Raw::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Decimal(Decimal::from(i)));
            }
            let text = n.to_string();
            Decimal::from_str_exact(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Value::Decimal)
                .map_err(|_| REASON.to_string())
        }
        Raw::String(s) => Decimal::from_str_exact(s)
            .map(Value::Decimal)
            .map_err(|_| REASON.to_string()),
        _ => Err(REASON.to_string()),
    }
}

/// Accepts booleans and exactly `"true"` / `"false"`.
pub fn boolean(raw: &Raw) -> Result<Value, String> {
    match raw {
        Raw::Bool(b) => Ok(Value::Bool(*b)),
        Raw::String(s) if s == "true" => Ok(Value::Bool(true)),
        Raw::String(s) if s == "false" => Ok(Value::Bool(false)),
        _ => Err("not a boolean".to_string()),
    }
}

/// Accepts ISO-8601 calendar dates (`YYYY-MM-DD`).
pub fn date(raw: &Raw) -> Result<Value, String> {
    const REASON: &str = "invalid date";
    let s = raw.as_str().ok_or_else(|| REASON.to_string())?;
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(REASON.to_string());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|_| REASON.to_string())
}

/// Accepts ISO-8601 timestamps with an offset (RFC 3339).
pub fn datetime(raw: &Raw) -> Result<Value, String> {
    const REASON: &str = "invalid datetime";
    let s = raw.as_str().ok_or_else(|| REASON.to_string())?;
    DateTime::parse_from_rfc3339(s)
        .map(Value::DateTime)
        .map_err(|_| REASON.to_string())
}

/// Derives the list coercer of an element coercer.
///
/// Elements are coerced in order and the first failure stops the list.
/// `null` elements pass through untouched.
pub fn list_of(element: Coercer) -> Coercer {
    Arc::new(move |raw: &Raw| match raw {
        Raw::Null => Ok(Value::Null),
        Raw::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if item.is_null() {
                    return Ok(Value::Null);
                }
                element(item).map_err(|reason| format!("element at index {index}: {reason}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        _ => Err("not an array".to_string()),
    })
}

/// Wraps a plain function into a [`Coercer`].
pub fn shared<F>(f: F) -> Coercer
where
    F: Fn(&Raw) -> Result<Value, String> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_string() {
        assert_eq!(string(&json!("a")), Ok(Value::from("a")));
        assert_eq!(string(&json!(1)), Err("not a string".to_string()));
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer(&json!(42)), Ok(Value::Integer(42)));
        assert_eq!(integer(&json!("42")), Ok(Value::Integer(42)));
        assert_eq!(integer(&json!(42.0)), Ok(Value::Integer(42)));
        assert_eq!(integer(&json!("-7")), Ok(Value::Integer(-7)));
        assert_eq!(integer(&json!("12a")), Err("not an integer".to_string()));
        assert_eq!(integer(&json!(" 12")), Err("not an integer".to_string()));
        assert_eq!(integer(&json!(1.5)), Err("not an integer".to_string()));
        assert_eq!(integer(&json!(true)), Err("not an integer".to_string()));
    }

    #[test]
    fn test_float() {
        assert_eq!(float(&json!(1.5)), Ok(Value::Float(1.5)));
        assert_eq!(float(&json!(2)), Ok(Value::Float(2.0)));
        assert_eq!(float(&json!("2.25")), Ok(Value::Float(2.25)));
        assert_eq!(float(&json!("2.25x")), Err("not a float".to_string()));
        assert_eq!(float(&json!("NaN")), Err("not a float".to_string()));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(
            decimal(&json!("12.50")),
            Ok(Value::Decimal(Decimal::new(1250, 2)))
        );
        assert_eq!(decimal(&json!(3)), Ok(Value::Decimal(Decimal::from(3))));
        assert_eq!(
            decimal(&json!(0.25)),
            Ok(Value::Decimal(Decimal::new(25, 2)))
        );
        assert_eq!(decimal(&json!("12,50")), Err("not a decimal".to_string()));
        assert_eq!(decimal(&json!([])), Err("not a decimal".to_string()));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean(&json!(true)), Ok(Value::Bool(true)));
        assert_eq!(boolean(&json!("false")), Ok(Value::Bool(false)));
        assert_eq!(boolean(&json!("TRUE")), Err("not a boolean".to_string()));
        assert_eq!(boolean(&json!(1)), Err("not a boolean".to_string()));
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date(&json!("2024-02-29")),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert_eq!(date(&json!("2023-02-29")), Err("invalid date".to_string()));
        assert_eq!(date(&json!("2024-2-9")), Err("invalid date".to_string()));
        assert_eq!(date(&json!(20240229)), Err("invalid date".to_string()));
    }

    #[test]
    fn test_datetime() {
        let value = datetime(&json!("2024-05-01T12:30:00+02:00")).unwrap();
        assert_eq!(
            value.as_datetime().unwrap().to_rfc3339(),
            "2024-05-01T12:30:00+02:00"
        );
        assert_eq!(
            datetime(&json!("2024-05-01 12:30")),
            Err("invalid datetime".to_string())
        );
    }

    #[test]
    fn test_list_of_reports_first_bad_element() {
        let ints = list_of(shared(integer));

        assert_eq!(
            ints(&json!(["1", 2, null])),
            Ok(Value::List(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Null
            ]))
        );
        assert_eq!(
            ints(&json!(["1", "x", "y"])),
            Err("element at index 1: not an integer".to_string())
        );
        assert_eq!(ints(&json!(null)), Ok(Value::Null));
        assert_eq!(ints(&json!("1")), Err("not an array".to_string()));
    }

    proptest! {
        #[test]
        fn prop_integer_strings_round_trip(n in any::<i64>()) {
            prop_assert_eq!(integer(&json!(n.to_string())), Ok(Value::Integer(n)));
        }

        #[test]
        fn prop_integer_rejects_trailing_garbage(n in any::<i64>(), suffix in "[a-z.]{1,3}") {
            let raw = json!(format!("{n}{suffix}"));
            prop_assert_eq!(integer(&raw), Err("not an integer".to_string()));
        }
    }
}
