//! Normalisation of user-entered numbers
//!
//! Anything a user can type ends up here before it reaches the calculator,
//! so the calculator never sees NaN, infinities or negative quantities.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::quote::models::RecordingChoice;

/// Largest margin a user may enter; anything above counts as no markup
pub const MAX_MARGIN_PERCENT: f64 = 10_000.0;

/// Largest exchange rate a user may enter; anything above means no conversion
pub const MAX_EXCHANGE_RATE: f64 = 1_000_000.0;

/// Floor a raw quantity into a camera count. Negative or NaN → 0.
pub fn quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.trunc().min(u32::MAX as f64) as u32
}

/// Margin percentage. Absent, negative, non-finite or above
/// [`MAX_MARGIN_PERCENT`] → 0 (no markup).
pub fn margin_percent(raw: Option<f64>) -> f64 {
    match raw {
        Some(m) if m.is_finite() && m > 0.0 && m <= MAX_MARGIN_PERCENT => m,
        _ => 0.0,
    }
}

/// Exchange rate. Absent, non-positive, non-finite or above
/// [`MAX_EXCHANGE_RATE`] → 1 (no conversion).
pub fn exchange_rate(raw: Option<f64>) -> f64 {
    match raw {
        Some(r) if r.is_finite() && r > 0.0 && r <= MAX_EXCHANGE_RATE => r,
        _ => 1.0,
    }
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Accepts a number or numeric string; anything else counts as 0
pub fn de_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value).map(quantity).unwrap_or(0))
}

/// Accepts a number, numeric string, or null
pub fn de_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value))
}

/// `"local"`, a catalog id (number or numeric string), or anything else as
/// "no selection"
pub fn de_recording<'de, D>(deserializer: D) -> Result<Option<RecordingChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(recording_choice(&value))
}

pub fn recording_choice(value: &Value) -> Option<RecordingChoice> {
    match value {
        Value::String(s) if s.trim().eq_ignore_ascii_case("local") => Some(RecordingChoice::Local),
        Value::Number(n) => n
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .map(RecordingChoice::Catalog),
        Value::String(s) => s.trim().parse::<u32>().ok().map(RecordingChoice::Catalog),
        _ => None,
    }
}
