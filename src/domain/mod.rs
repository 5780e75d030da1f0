//! Business records exactly as they are stored. Pure data, no service concerns.
//!
//! Stored collections are written by older clients too, so reading is
//! lenient: ids may be numbers, money may be a numeric string, and fields this
//! crate does not know are carried along in `extra` and written back.

pub mod dashboard;
pub mod order;
pub mod product;
pub mod promo;

pub use dashboard::*;
pub use order::*;
pub use product::*;
pub use promo::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Rounds a money amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Reads a JSON number, or a string holding one.
pub(crate) fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Ids written by older clients are sometimes numbers (timestamps).
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Money that is not a number reads as zero.
pub(crate) fn lenient_money<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?).unwrap_or(0.0))
}

pub(crate) fn lenient_optional_money<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?))
}

/// Line item counts: whole non-negative numbers, otherwise zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
        .unwrap_or(0))
}

/// Keeps a present value, `null` included, so it is written back as read.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
