use async_trait::async_trait;

use crate::{Candle, Result};

/// Abstraction over wherever candles come from.
///
/// `BinanceCandles` in `crates/engine` implements this against the public
/// klines endpoint. Errors here are hard failures for the caller.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch up to `limit` candles for `pair`, oldest first.
    async fn candles(&self, pair: &str, interval: &str, limit: usize) -> Result<Vec<Candle>>;
}
