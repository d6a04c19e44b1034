//! Maps reduced scores to discrete decisions.
//!
//! This is the only place thresholds live. Callers must go through these
//! functions rather than comparing against literals.

use common::{SentimentSignal, Signal};

// ─── 1–100 market scale ───────────────────────────────────────────────────────

pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 100.0;
/// Used when no advisor contributed.
pub const NEUTRAL_SCORE: f64 = 50.0;
/// Strictly above is BUY.
pub const BUY_ABOVE: f64 = 60.0;
/// Strictly below is SELL.
pub const SELL_BELOW: f64 = 40.0;

// ─── [-1, 1] sentiment scale ──────────────────────────────────────────────────

pub const SENTIMENT_MIN: f64 = -1.0;
pub const SENTIMENT_MAX: f64 = 1.0;
pub const NEUTRAL_SENTIMENT: f64 = 0.0;
pub const STRONG_SENTIMENT: f64 = 0.7;
pub const MILD_SENTIMENT: f64 = 0.4;

/// Map a raw advisor score in [-1, 1] onto the 1–100 scale.
pub fn to_percent(raw: f64) -> f64 {
    ((raw + 1.0) / 2.0) * 99.0 + 1.0
}

pub fn market_signal(score: f64) -> Signal {
    if score > BUY_ABOVE {
        Signal::Buy
    } else if score < SELL_BELOW {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

pub fn sentiment_signal(average: f64) -> SentimentSignal {
    if average > STRONG_SENTIMENT {
        SentimentSignal::StrongBuy
    } else if average > MILD_SENTIMENT {
        SentimentSignal::Buy
    } else if average < -STRONG_SENTIMENT {
        SentimentSignal::StrongSell
    } else if average < -MILD_SENTIMENT {
        SentimentSignal::Sell
    } else {
        SentimentSignal::Hold
    }
}

pub fn market_reason(signal: Signal, contributing: usize, total: usize) -> String {
    if contributing == 0 {
        return no_opinion_reason(total);
    }
    match signal {
        Signal::Buy => format!(
            "Buy signal detected by {contributing} of {total} advisors based on market indicators."
        ),
        Signal::Sell => format!(
            "Sell signal detected by {contributing} of {total} advisors based on market indicators."
        ),
        Signal::Hold => format!(
            "No strong signal from {contributing} of {total} advisors; holding."
        ),
    }
}

pub fn sentiment_reason(signal: SentimentSignal, contributing: usize, total: usize) -> String {
    if contributing == 0 {
        return no_opinion_reason(total);
    }
    match signal {
        SentimentSignal::StrongBuy | SentimentSignal::StrongSell => format!(
            "Strong {} sentiment from {contributing} of {total} advisors.",
            direction(signal)
        ),
        SentimentSignal::Buy | SentimentSignal::Sell => format!(
            "Moderate {} sentiment from {contributing} of {total} advisors.",
            direction(signal)
        ),
        SentimentSignal::Hold => {
            format!("Mixed or weak sentiment from {contributing} of {total} advisors; holding.")
        }
    }
}

fn direction(signal: SentimentSignal) -> &'static str {
    match signal {
        SentimentSignal::StrongBuy | SentimentSignal::Buy => "bullish",
        SentimentSignal::StrongSell | SentimentSignal::Sell => "bearish",
        SentimentSignal::Hold => "neutral",
    }
}

fn no_opinion_reason(total: usize) -> String {
    if total == 0 {
        "No advisors configured; defaulting to neutral.".to_string()
    } else {
        format!("None of {total} advisors produced a usable score; defaulting to neutral.")
    }
}
