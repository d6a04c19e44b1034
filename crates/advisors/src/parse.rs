//! Score extraction from model output.
//!
//! Models answer in one of a few shapes: a JSON object carrying
//! `sentiment_score`, a bare JSON number, or free text that starts with a
//! number ("0.6", "-0.25. The trend is..."). Anything else is unparsable.

use serde_json::Value;

/// Key the prompts ask models to put their score under.
pub const SCORE_KEY: &str = "sentiment_score";

/// Extract a score from a JSON value (number, numeric string, or object).
pub fn score_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => score_from_text(s),
        Value::Object(map) => map.get(SCORE_KEY).and_then(score_from_value),
        _ => None,
    }
}

/// Extract a score from raw model text.
pub fn score_from_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ (Value::Object(_) | Value::Number(_))) => score_from_value(&value),
        Ok(_) => None,
        Err(_) => leading_number(trimmed),
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    // Exponent only counts when digits follow it ("5e-1", not "5 ebb").
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    text[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
