use async_trait::async_trait;

use common::{AdvisorClient, AdvisorScore, IndicatorSnapshot, Subject};

/// Local rule-based advisor. No I/O.
///
/// Three equally weighted votes in {-1, 0, +1}, averaged:
/// - trend: EMA 20 above EMA 50 is bullish (golden cross), below is bearish
/// - momentum: RSI under `oversold` is bullish, over `overbought` is bearish
/// - MACD: positive is bullish, negative is bearish
#[derive(Debug, Clone)]
pub struct RuleAdvisor {
    id: String,
    pub oversold: f64,
    pub overbought: f64,
}

impl RuleAdvisor {
    pub fn new(id: impl Into<String>, oversold: f64, overbought: f64) -> Self {
        Self {
            id: id.into(),
            oversold,
            overbought,
        }
    }

    pub fn evaluate(&self, snapshot: &IndicatorSnapshot) -> f64 {
        let trend = sign(snapshot.ema20 - snapshot.ema50);
        let momentum = if snapshot.rsi14 < self.oversold {
            1.0
        } else if snapshot.rsi14 > self.overbought {
            -1.0
        } else {
            0.0
        };
        let macd = sign(snapshot.macd);

        (trend + momentum + macd) / 3.0
    }
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[async_trait]
impl AdvisorClient for RuleAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, subject: &Subject) -> AdvisorScore {
        match subject {
            Subject::Market { snapshot } => AdvisorScore::scored(&self.id, self.evaluate(snapshot)),
            Subject::Pair { .. } => {
                AdvisorScore::failed(&self.id, "rule advisor needs an indicator snapshot")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ema20: f64, ema50: f64, rsi14: f64, macd: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            price: 100.0,
            ema20,
            ema50,
            ema12: 0.0,
            ema26: 0.0,
            macd,
            rsi14,
            volume: 0.0,
            avg_volume20: 0.0,
        }
    }

    #[test]
    fn favourable_conditions_score_full_buy() {
        let rules = RuleAdvisor::new("rules", 30.0, 70.0);
        assert_eq!(rules.evaluate(&snapshot(105.0, 100.0, 25.0, 1.2)), 1.0);
    }

    #[test]
    fn bearish_conditions_score_full_sell() {
        let rules = RuleAdvisor::new("rules", 30.0, 70.0);
        assert_eq!(rules.evaluate(&snapshot(95.0, 100.0, 80.0, -0.4)), -1.0);
    }

    #[test]
    fn mixed_votes_average() {
        let rules = RuleAdvisor::new("rules", 30.0, 70.0);
        let score = rules.evaluate(&snapshot(105.0, 100.0, 50.0, -0.4));
        assert_eq!(score, 0.0);
        let score = rules.evaluate(&snapshot(105.0, 100.0, 50.0, 0.4));
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn pair_subject_is_rejected() {
        let rules = RuleAdvisor::new("rules", 30.0, 70.0);
        let score = rules.score(&Subject::pair("BTCUSDT")).await;
        assert!(!score.ok);
        assert_eq!(score.advisor_id, "rules");
    }
}
