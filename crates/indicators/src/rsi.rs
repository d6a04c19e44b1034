use tracing::debug;

use crate::round2;

/// RSI (Relative Strength Index) indicator.
///
/// Simple-mean variant: gains and losses are averaged over the first
/// `period` price changes of the series, with no Wilder smoothing afterwards.
/// Falls back to [`RsiIndicator::NEUTRAL`] until `period + 1` closes exist.
#[derive(Debug, Clone, Copy)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    /// Returned when there are not enough closes to compute a value.
    pub const NEUTRAL: f64 = 50.0;

    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// Compute RSI from close prices (oldest first), rounded to 2 dp.
    pub fn compute(&self, closes: &[f64]) -> f64 {
        if closes.len() < self.period + 1 {
            debug!(
                period = self.period,
                available = closes.len(),
                "Not enough closes for RSI, using neutral default"
            );
            return Self::NEUTRAL;
        }

        let (gain_sum, loss_sum) = closes[..=self.period]
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change > 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses - change)
                }
            });

        let avg_gain = gain_sum / self.period as f64;
        let avg_loss = loss_sum / self.period as f64;

        // No losses in the window: pinned at the top of the range.
        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        round2(100.0 - 100.0 / (1.0 + rs))
    }
}
