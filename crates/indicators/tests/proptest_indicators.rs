use chrono::{Duration, TimeZone, Utc};
use common::Candle;
use indicators::{snapshot, AverageVolume, EmaIndicator, RsiIndicator};
use proptest::prelude::*;

fn series(points: &[(f64, f64)]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    points
        .iter()
        .enumerate()
        .map(|(i, &(close, volume))| {
            let open_time = start + Duration::minutes(i as i64);
            Candle {
                open_time,
                open: close,
                high: close,
                low: close,
                close,
                volume,
                close_time: open_time + Duration::seconds(59),
            }
        })
        .collect()
}

proptest! {
    /// Every snapshot field is finite and RSI stays inside [0, 100] for any
    /// non-empty series of positive prices.
    #[test]
    fn snapshot_is_always_defined(
        points in prop::collection::vec((0.0001f64..1_000_000.0, 0.0f64..1_000_000.0), 1..120),
    ) {
        let snap = snapshot(&series(&points)).unwrap();
        for value in [
            snap.price, snap.ema20, snap.ema50, snap.ema12, snap.ema26,
            snap.macd, snap.rsi14, snap.volume, snap.avg_volume20,
        ] {
            prop_assert!(value.is_finite());
        }
        prop_assert!((0.0..=100.0).contains(&snap.rsi14));
    }

    /// EMA is a running convex combination, so it never leaves the range of
    /// the closes it was built from (up to the 2 dp rounding).
    #[test]
    fn ema_stays_within_close_range(
        closes in prop::collection::vec(0.01f64..100_000.0, 1..200),
        period in 1usize..100,
    ) {
        let ema = EmaIndicator::new(period).compute(&closes).unwrap();
        let min = closes.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(ema >= min - 0.005 && ema <= max + 0.005);
    }

    #[test]
    fn strictly_rising_series_has_rsi_100(
        start in 1.0f64..10_000.0,
        steps in prop::collection::vec(0.01f64..50.0, 14..60),
    ) {
        let mut closes = vec![start];
        for step in steps {
            let next = closes.last().unwrap() + step;
            closes.push(next);
        }
        prop_assert_eq!(RsiIndicator::new(14).compute(&closes), 100.0);
    }

    /// Short series always divide by the nominal period.
    #[test]
    fn short_volume_series_uses_nominal_denominator(
        volumes in prop::collection::vec(0.0f64..1_000.0, 0..20),
    ) {
        let expected = volumes.iter().sum::<f64>() / 20.0;
        let actual = AverageVolume::new(20).compute(&volumes);
        prop_assert!((actual - expected).abs() <= 0.005 + 1e-9);
    }
}
