//! Lenient field decoders for loosely-typed JSON payloads.
//!
//! Storefront admin forms post numbers as strings and sometimes send
//! `images` as something other than an array. These helpers normalise such
//! input instead of rejecting the whole request; required-field checks
//! happen afterwards in `NewProduct::validate`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Finite number from a JSON number or a numeric string.
pub fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Non-negative integer stock level; anything unusable becomes 0.
/// Values above `u32::MAX` are capped at `u32::MAX`.
pub fn as_stock(v: &Value) -> u32 {
    as_number(v).map(|n| n.trunc().clamp(0.0, f64::from(u32::MAX)) as u32).unwrap_or(0)
}

pub fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn as_images(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(|i| i.as_str().map(str::to_owned)).collect(),
        _ => Vec::new(),
    }
}

pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(as_number(&Value::deserialize(d)?))
}

/// `null` clears the value (`Some(None)`); garbage is ignored (`None`).
pub fn nullable_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<f64>>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Null => Some(None),
        other => as_number(&other).map(Some),
    })
}

pub fn stock<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(as_stock(&Value::deserialize(d)?))
}

pub fn some_stock<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Some(as_stock(&Value::deserialize(d)?)))
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(as_text(&Value::deserialize(d)?))
}

/// Any non-string description becomes empty.
pub fn as_description(v: Value) -> String {
    match v {
        Value::String(s) => s,
        _ => String::new(),
    }
}

pub fn description<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(as_description(Value::deserialize(d)?))
}

pub fn some_description<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Some(as_description(Value::deserialize(d)?)))
}

pub fn images<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(as_images(&Value::deserialize(d)?))
}

pub fn some_images<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Some(as_images(&Value::deserialize(d)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(as_number(&json!(12.5)), Some(12.5));
        assert_eq!(as_number(&json!(" 7 ")), Some(7.0));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("inf")), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!([1])), None);
    }

    #[test]
    fn stock_is_clamped_and_truncated() {
        assert_eq!(as_stock(&json!(4.9)), 4);
        assert_eq!(as_stock(&json!(-3)), 0);
        assert_eq!(as_stock(&json!("12")), 12);
        assert_eq!(as_stock(&json!("lots")), 0);
        assert_eq!(as_stock(&json!(null)), 0);
    }

    #[test]
    fn stock_is_capped_at_u32_max() {
        assert_eq!(as_stock(&json!(4_294_967_295u64)), u32::MAX);
        assert_eq!(as_stock(&json!(1e12)), u32::MAX);
        assert_eq!(as_stock(&json!("99999999999")), u32::MAX);
    }

    #[test]
    fn images_keep_only_strings() {
        assert_eq!(as_images(&json!(["a.png", 3, "b.png"])), vec!["a.png", "b.png"]);
        assert!(as_images(&json!("a.png")).is_empty());
    }

    #[test]
    fn text_renders_numbers() {
        assert_eq!(as_text(&json!("Tea")).as_deref(), Some("Tea"));
        assert_eq!(as_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(as_text(&json!(false)), None);
    }
}
