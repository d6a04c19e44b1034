use crate::round2;

/// Mean volume of the last `period` candles.
///
/// The denominator is always `period`, even when fewer candles exist, so a
/// short series is averaged down towards zero.
#[derive(Debug, Clone, Copy)]
pub struct AverageVolume {
    pub period: usize,
}

impl AverageVolume {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "average volume period must be >= 1");
        Self { period }
    }

    pub fn compute(&self, volumes: &[f64]) -> f64 {
        let start = volumes.len().saturating_sub(self.period);
        let total: f64 = volumes[start..].iter().sum();
        round2(total / self.period as f64)
    }
}
