use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON number or a numeric string; anything else is treated as absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .and_then(whole_quantity))
}

/// Reads the leading number of a cell, so `30cm` is 30 and `2.5 kg` is 2.5.
pub(crate) fn parse_f64(raw: &str) -> Option<f64> {
    let prefix = numeric_prefix(raw.trim());
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    &raw[..end]
}

pub(crate) fn parse_quantity(raw: &str) -> Option<u32> {
    parse_f64(raw).and_then(whole_quantity)
}

fn whole_quantity(value: f64) -> Option<u32> {
    let truncated = value.trunc();
    if truncated >= 1.0 && truncated <= f64::from(u32::MAX) {
        Some(truncated as u32)
    } else {
        None
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(raw) => parse_f64(raw),
        _ => None,
    }
}
