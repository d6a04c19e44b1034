use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use common::{Candle, CandleSource, Error, Result};

/// Public klines client for Binance. Unsigned; no API key needed.
pub struct BinanceCandles {
    base_url: String,
    http: Client,
}

impl BinanceCandles {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl CandleSource for BinanceCandles {
    async fn candles(&self, pair: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let symbol = pair.to_uppercase();

        debug!(pair = %symbol, interval, limit, "Fetching klines from Binance");
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol.as_str()),
                ("interval", interval),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::CandleSource(format!("{symbol}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::CandleSource(format!("{symbol}: {e}")))?;

        if !status.is_success() {
            return Err(Error::CandleSource(format!("{symbol}: HTTP {status}: {body}")));
        }
        parse_klines(&body).map_err(|e| match e {
            Error::CandleSource(msg) => Error::CandleSource(format!("{symbol}: {msg}")),
            other => Error::CandleSource(format!("{symbol}: {other}")),
        })
    }
}

/// Parse a `/api/v3/klines` body: an array of rows
/// `[openTime, open, high, low, close, volume, closeTime, ...]`.
///
/// Binance sends prices as strings; plain numbers are accepted too.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| Error::CandleSource(format!("malformed klines: {e}")))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|e| Error::CandleSource(format!("row {i}: {e}"))))
        .collect()
}

fn parse_row(row: &[Value]) -> std::result::Result<Candle, String> {
    if row.len() < 7 {
        return Err(format!("expected at least 7 fields, got {}", row.len()));
    }
    Ok(Candle {
        open_time: timestamp(&row[0])?,
        open: number(&row[1])?,
        high: number(&row[2])?,
        low: number(&row[3])?,
        close: number(&row[4])?,
        volume: number(&row[5])?,
        close_time: timestamp(&row[6])?,
    })
}

fn number(value: &Value) -> std::result::Result<f64, String> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("not a number: {value}"))
}

fn timestamp(value: &Value) -> std::result::Result<DateTime<Utc>, String> {
    value
        .as_i64()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| format!("not a millisecond timestamp: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815",
         1499644799999, "2434.19055334", 308, "1756.87402397", "28.46694368", "0"],
        [1499644800000, 0.0158, 0.0170, 0.0150, 0.0165, 1200.5, 1500249599999]
    ]"#;

    #[test]
    fn parses_string_and_numeric_fields() {
        let candles = parse_klines(BODY).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, 0.015771);
        assert_eq!(candles[0].volume, 148976.11427815);
        assert_eq!(candles[0].open_time.timestamp_millis(), 1_499_040_000_000);
        assert_eq!(candles[1].close, 0.0165);
        assert!(candles[1].open_time > candles[0].open_time);
    }

    #[test]
    fn empty_array_is_empty_series() {
        assert!(parse_klines("[]").unwrap().is_empty());
    }

    #[test]
    fn short_row_is_rejected() {
        let err = parse_klines(r#"[[1499040000000, "1", "2"]]"#).unwrap_err();
        assert!(matches!(err, Error::CandleSource(_)));
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn garbage_price_is_rejected() {
        let err = parse_klines(r#"[[1, "x", "1", "1", "1", "1", 2]]"#).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn error_object_is_rejected() {
        let err = parse_klines(r#"{"code": -1121, "msg": "Invalid symbol."}"#).unwrap_err();
        assert!(matches!(err, Error::CandleSource(_)));
    }
}
