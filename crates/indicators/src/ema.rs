use crate::round2;

/// Exponential Moving Average over close prices.
///
/// Seeded with the first close rather than an SMA, then smoothed across the
/// whole series with multiplier `2 / (period + 1)`. A single close is returned
/// unchanged.
#[derive(Debug, Clone, Copy)]
pub struct EmaIndicator {
    pub period: usize,
}

impl EmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self { period }
    }

    /// Compute the EMA of `closes` (oldest first), rounded to 2 dp.
    /// Returns `None` only for an empty slice.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        let (&seed, rest) = closes.split_first()?;
        let k = 2.0 / (self.period as f64 + 1.0);

        let ema = rest
            .iter()
            .fold(seed, |ema, &close| (close - ema) * k + ema);

        Some(round2(ema))
    }
}
