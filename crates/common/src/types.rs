use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV candle as produced by the candle source.
/// Series are ordered oldest first with strictly increasing `open_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
}

/// Indicator values derived from one candle series.
/// Recomputed on every request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Close of the most recent candle.
    pub price: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub macd: f64,
    pub rsi14: f64,
    /// Volume of the most recent candle.
    pub volume: f64,
    pub avg_volume20: f64,
}

/// What an advisor is asked to judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Subject {
    /// Sentiment mode: a currency pair such as "BTCUSDT".
    Pair { pair: String },
    /// Market-analysis mode.
    Market { snapshot: IndicatorSnapshot },
}

impl Subject {
    pub fn pair(pair: impl Into<String>) -> Self {
        Subject::Pair { pair: pair.into() }
    }

    pub fn market(snapshot: IndicatorSnapshot) -> Self {
        Subject::Market { snapshot }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Subject::Pair { .. } => "sentiment",
            Subject::Market { .. } => "market",
        }
    }
}

/// Outcome of a single advisor call. Created during one aggregation and
/// discarded once the aggregate is reduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorScore {
    pub advisor_id: String,
    /// Always within [-1, 1]. Zero when `ok` is false.
    pub raw_score: f64,
    pub ok: bool,
    pub error: Option<String>,
}

impl AdvisorScore {
    /// A successful score, clamped into [-1, 1]. Non-finite input is
    /// recorded as a failure instead.
    pub fn scored(advisor_id: impl Into<String>, raw_score: f64) -> Self {
        let advisor_id = advisor_id.into();
        if !raw_score.is_finite() {
            return Self::failed(advisor_id, format!("non-finite score {raw_score}"));
        }
        Self {
            advisor_id,
            raw_score: raw_score.clamp(-1.0, 1.0),
            ok: true,
            error: None,
        }
    }

    pub fn failed(advisor_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            advisor_id: advisor_id.into(),
            raw_score: 0.0,
            ok: false,
            error: Some(reason.into()),
        }
    }

    /// True when this score takes part in the average: it succeeded and
    /// carries an opinion (exact zero counts as "no opinion").
    pub fn contributes(&self) -> bool {
        self.ok && self.raw_score != 0.0
    }
}

/// Discrete decision on the 1–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Five-level decision on the [-1, 1] sentiment scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl std::fmt::Display for SentimentSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentSignal::StrongBuy => write!(f, "STRONG_BUY"),
            SentimentSignal::Buy => write!(f, "BUY"),
            SentimentSignal::Hold => write!(f, "HOLD"),
            SentimentSignal::Sell => write!(f, "SELL"),
            SentimentSignal::StrongSell => write!(f, "STRONG_SELL"),
        }
    }
}

/// The engine's externally visible output for a market aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Within [1, 100].
    pub final_score: f64,
    pub signal: Signal,
    pub contributing_advisors: usize,
    pub reason: String,
}

/// Result of a sentiment-only aggregation on the [-1, 1] scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Within [-1, 1].
    pub average: f64,
    pub signal: SentimentSignal,
    pub contributing_advisors: usize,
    pub reason: String,
}

/// Full output of one analysis run for a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub pair: String,
    pub snapshot: IndicatorSnapshot,
    pub market: AggregateResult,
    pub sentiment: SentimentResult,
}
