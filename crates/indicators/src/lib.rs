//! Pure technical indicators over candle series.
//!
//! Every value is deterministic for a given input and rounded to 2 decimal
//! places. Insufficient data never errors; each indicator documents its
//! fallback.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod snapshot;
pub mod volume;

pub use ema::EmaIndicator;
pub use macd::MacdIndicator;
pub use rsi::RsiIndicator;
pub use snapshot::snapshot;
pub use volume::AverageVolume;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
