use common::{Candle, IndicatorSnapshot};

use crate::{AverageVolume, EmaIndicator, MacdIndicator, RsiIndicator};

/// Compute the full indicator snapshot for a candle series (oldest first).
///
/// Returns `None` only when `candles` is empty. Short series never fail:
/// EMAs degrade to the seed close, RSI to 50 and the average volume keeps its
/// nominal 20-candle denominator.
pub fn snapshot(candles: &[Candle]) -> Option<IndicatorSnapshot> {
    let last = candles.last()?;
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let ema12 = EmaIndicator::new(12).compute(&closes)?;
    let ema26 = EmaIndicator::new(26).compute(&closes)?;

    Some(IndicatorSnapshot {
        price: last.close,
        ema20: EmaIndicator::new(20).compute(&closes)?,
        ema50: EmaIndicator::new(50).compute(&closes)?,
        ema12,
        ema26,
        macd: MacdIndicator::default().compute(&closes)?,
        rsi14: RsiIndicator::new(14).compute(&closes),
        volume: last.volume,
        avg_volume20: AverageVolume::new(20).compute(&volumes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candles(closes: &[f64], volume: f64) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open_time = start + Duration::minutes(15 * i as i64);
                Candle {
                    open_time,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume,
                    close_time: open_time + Duration::minutes(15) - Duration::milliseconds(1),
                }
            })
            .collect()
    }

    #[test]
    fn empty_series_has_no_snapshot() {
        assert!(snapshot(&[]).is_none());
    }

    #[test]
    fn single_candle_uses_documented_fallbacks() {
        let snap = snapshot(&candles(&[100.0], 40.0)).unwrap();
        assert_eq!(snap.price, 100.0);
        assert_eq!(snap.ema20, 100.0);
        assert_eq!(snap.ema50, 100.0);
        assert_eq!(snap.macd, 0.0);
        assert_eq!(snap.rsi14, 50.0);
        assert_eq!(snap.volume, 40.0);
        assert_eq!(snap.avg_volume20, 2.0);
    }

    #[test]
    fn rising_series_produces_bullish_snapshot() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let snap = snapshot(&candles(&closes, 10.0)).unwrap();
        assert_eq!(snap.price, 159.0);
        assert_eq!(snap.rsi14, 100.0);
        assert!(snap.ema20 > snap.ema50);
        assert!(snap.macd > 0.0);
        assert_eq!(snap.avg_volume20, 10.0);
    }
}
