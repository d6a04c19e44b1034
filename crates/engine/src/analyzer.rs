use std::sync::Arc;

use tracing::{info, warn};

use common::{Analysis, Candle, CandleSource, Error, Result};

use crate::aggregator::SignalAggregator;
use crate::registry::AdvisorRegistry;

/// Candles in, decision out.
///
/// Fetches the series, computes the snapshot and runs both aggregation paths
/// concurrently. Only the candle source can make `analyze` fail; advisor
/// trouble always degrades to a neutral result instead.
pub struct Analyzer {
    source: Arc<dyn CandleSource>,
    market: SignalAggregator,
    sentiment: SignalAggregator,
    interval: String,
    limit: usize,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn CandleSource>,
        registry: AdvisorRegistry,
        interval: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            source,
            market: registry.market,
            sentiment: registry.sentiment,
            interval: interval.into(),
            limit,
        }
    }

    pub async fn analyze(&self, pair: &str) -> Result<Analysis> {
        let candles = self
            .source
            .candles(pair, &self.interval, self.limit)
            .await
            .map_err(|e| {
                warn!(pair, error = %e, "Candle fetch failed");
                match e {
                    Error::CandleSource(_) => e,
                    other => Error::CandleSource(other.to_string()),
                }
            })?;
        ensure_ordered(pair, &candles)?;

        let snapshot = indicators::snapshot(&candles)
            .ok_or_else(|| Error::CandleSource(format!("{pair}: no candles returned")))?;

        let (market, sentiment) = tokio::join!(
            self.market.aggregate_market(snapshot),
            self.sentiment.aggregate_sentiment(pair),
        );

        info!(
            pair,
            candles = candles.len(),
            price = snapshot.price,
            score = market.final_score,
            signal = %market.signal,
            sentiment = %sentiment.signal,
            "Analysis complete"
        );

        Ok(Analysis {
            pair: pair.to_string(),
            snapshot,
            market,
            sentiment,
        })
    }
}

/// Candles must be strictly increasing by open time.
fn ensure_ordered(pair: &str, candles: &[Candle]) -> Result<()> {
    if candles.is_empty() {
        return Err(Error::CandleSource(format!("{pair}: no candles returned")));
    }
    match candles
        .windows(2)
        .position(|w| w[1].open_time <= w[0].open_time)
    {
        Some(i) => Err(Error::CandleSource(format!(
            "{pair}: candles out of order at index {}",
            i + 1
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use advisors::RuleAdvisor;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use common::{SentimentSignal, Signal};

    use super::*;

    enum Feed {
        Fail,
        Series(Vec<Candle>),
    }

    struct FakeSource(Feed);

    #[async_trait]
    impl CandleSource for FakeSource {
        async fn candles(
            &self,
            _pair: &str,
            _interval: &str,
            _limit: usize,
        ) -> Result<Vec<Candle>> {
            match &self.0 {
                Feed::Fail => Err(Error::Http("connection refused".into())),
                Feed::Series(candles) => Ok(candles.clone()),
            }
        }
    }

    fn series(closes: impl IntoIterator<Item = f64>) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| {
                let open_time = start + chrono::Duration::minutes(15 * i as i64);
                Candle {
                    open_time,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1000.0,
                    close_time: open_time + chrono::Duration::minutes(15),
                }
            })
            .collect()
    }

    fn registry(with_rules: bool) -> AdvisorRegistry {
        let mut market = SignalAggregator::new();
        if with_rules {
            market.add(
                Arc::new(RuleAdvisor::new("rules", 30.0, 70.0)),
                Duration::from_secs(1),
            );
        }
        AdvisorRegistry {
            market,
            sentiment: SignalAggregator::new(),
        }
    }

    fn analyzer(feed: Feed, with_rules: bool) -> Analyzer {
        Analyzer::new(Arc::new(FakeSource(feed)), registry(with_rules), "15m", 50)
    }

    #[tokio::test]
    async fn source_failure_is_a_hard_error() {
        let err = analyzer(Feed::Fail, true).analyze("BTCUSDT").await.unwrap_err();
        assert!(matches!(err, Error::CandleSource(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_series_is_a_hard_error() {
        let err = analyzer(Feed::Series(vec![]), true)
            .analyze("BTCUSDT")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CandleSource(_)));
    }

    #[tokio::test]
    async fn unordered_series_is_a_hard_error() {
        let mut candles = series([1.0, 2.0, 3.0]);
        candles.swap(1, 2);
        let err = analyzer(Feed::Series(candles), true)
            .analyze("BTCUSDT")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("out of order at index 1"));
    }

    #[tokio::test]
    async fn rising_series_through_rule_advisor() {
        // EMA20 > EMA50 (+1), RSI 100 is overbought (-1), MACD > 0 (+1): raw 1/3.
        let analysis = analyzer(Feed::Series(series((0..60).map(|i| 100.0 + i as f64))), true)
            .analyze("BTCUSDT")
            .await
            .unwrap();

        assert_eq!(analysis.pair, "BTCUSDT");
        assert_eq!(analysis.snapshot.price, 159.0);
        assert_eq!(analysis.snapshot.rsi14, 100.0);
        assert!((analysis.market.final_score - 67.0).abs() < 1e-9);
        assert_eq!(analysis.market.signal, Signal::Buy);
        assert_eq!(analysis.market.contributing_advisors, 1);
    }

    #[tokio::test]
    async fn no_advisors_means_neutral_hold() {
        let analysis = analyzer(Feed::Series(series([10.0, 11.0, 9.0])), false)
            .analyze("ETHUSDT")
            .await
            .unwrap();

        assert_eq!(analysis.market.final_score, 50.0);
        assert_eq!(analysis.market.signal, Signal::Hold);
        assert_eq!(analysis.sentiment.average, 0.0);
        assert_eq!(analysis.sentiment.signal, SentimentSignal::Hold);
        assert_eq!(analysis.sentiment.contributing_advisors, 0);
    }
}
