use crate::ema::EmaIndicator;
use crate::round2;

/// MACD line only: EMA(fast) − EMA(slow). No signal line or histogram.
#[derive(Debug, Clone, Copy)]
pub struct MacdIndicator {
    pub fast: EmaIndicator,
    pub slow: EmaIndicator,
}

impl Default for MacdIndicator {
    fn default() -> Self {
        Self::new(12, 26)
    }
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self {
            fast: EmaIndicator::new(fast),
            slow: EmaIndicator::new(slow),
        }
    }

    /// Difference of the two rounded EMAs, itself rounded to 2 dp.
    /// `None` only for an empty slice.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        let fast = self.fast.compute(closes)?;
        let slow = self.slow.compute(closes)?;
        Some(round2(fast - slow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn macd_is_zero_on_flat_series() {
        assert_eq!(MacdIndicator::default().compute(&[250.0; 40]), Some(0.0));
    }

    #[test]
    fn macd_is_positive_on_up_trend() {
        let macd = MacdIndicator::default().compute(&trending_up(50)).unwrap();
        assert!(macd > 0.0, "expected positive MACD, got {macd}");
    }

    #[test]
    fn macd_matches_difference_of_emas() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + (i % 7) as f64).collect();
        let fast = EmaIndicator::new(12).compute(&closes).unwrap();
        let slow = EmaIndicator::new(26).compute(&closes).unwrap();
        assert_eq!(
            MacdIndicator::default().compute(&closes),
            Some(round2(fast - slow))
        );
    }

    #[test]
    fn macd_of_empty_series_is_none() {
        assert!(MacdIndicator::default().compute(&[]).is_none());
    }
}
