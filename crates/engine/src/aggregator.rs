use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use common::{
    AdvisorClient, AdvisorScore, AggregateResult, IndicatorSnapshot, SentimentResult, Subject,
};

use crate::decision::{self, NEUTRAL_SCORE, NEUTRAL_SENTIMENT};

/// One configured advisor and the time it is allowed per call.
struct AdvisorSlot {
    client: Arc<dyn AdvisorClient>,
    timeout: Duration,
}

/// Fans a subject out to every configured advisor and reduces the answers.
///
/// Each call runs as its own task and hands back its own `AdvisorScore`; the
/// results land in a vector indexed by advisor position and are reduced only
/// after every slot has settled. Nothing mutable is shared between tasks.
pub struct SignalAggregator {
    advisors: Vec<AdvisorSlot>,
    /// Upper bound on one whole aggregation, if any.
    deadline: Option<Duration>,
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalAggregator {
    pub fn new() -> Self {
        Self {
            advisors: Vec::new(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_advisor(mut self, client: Arc<dyn AdvisorClient>, timeout: Duration) -> Self {
        self.add(client, timeout);
        self
    }

    pub fn add(&mut self, client: Arc<dyn AdvisorClient>, timeout: Duration) {
        self.advisors.push(AdvisorSlot { client, timeout });
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    pub fn advisor_ids(&self) -> Vec<&str> {
        self.advisors.iter().map(|slot| slot.client.id()).collect()
    }

    /// Dispatch `subject` to every advisor and wait for all of them to settle.
    ///
    /// The returned vector has one entry per advisor, in configuration order.
    /// Timeouts, panics and calls abandoned at the aggregation deadline all
    /// come back as failed scores.
    pub async fn collect(&self, subject: Subject) -> Vec<AdvisorScore> {
        let subject = Arc::new(subject);
        debug!(
            advisors = self.advisors.len(),
            mode = subject.mode(),
            "Dispatching advisor calls"
        );

        let handles: Vec<JoinHandle<AdvisorScore>> = self
            .advisors
            .iter()
            .map(|slot| {
                let client = slot.client.clone();
                let timeout = slot.timeout;
                let subject = subject.clone();
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, client.score(&subject)).await {
                        Ok(score) => score,
                        Err(_) => {
                            warn!(
                                advisor = %client.id(),
                                timeout_ms = timeout.as_millis() as u64,
                                "Advisor call timed out"
                            );
                            AdvisorScore::failed(
                                client.id(),
                                format!("timed out after {} ms", timeout.as_millis()),
                            )
                        }
                    }
                })
            })
            .collect();

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let mut scores = Vec::with_capacity(handles.len());

        for (slot, mut handle) in self.advisors.iter().zip(handles) {
            let id = slot.client.id();
            let joined = match deadline {
                Some(at) => match tokio::time::timeout_at(at, &mut handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        handle.abort();
                        warn!(advisor = %id, "Advisor call abandoned at aggregation deadline");
                        scores.push(AdvisorScore::failed(id, "abandoned at aggregation deadline"));
                        continue;
                    }
                },
                None => handle.await,
            };

            let score = joined.unwrap_or_else(|e| {
                warn!(advisor = %id, error = %e, "Advisor task did not complete");
                AdvisorScore::failed(id, format!("advisor task failed: {e}"))
            });
            scores.push(score);
        }

        scores
    }

    /// Market-analysis aggregation on the 1–100 scale.
    pub async fn aggregate_market(&self, snapshot: IndicatorSnapshot) -> AggregateResult {
        let scores = self.collect(Subject::market(snapshot)).await;
        let result = reduce_market(&scores);
        info!(
            score = result.final_score,
            signal = %result.signal,
            contributing = result.contributing_advisors,
            advisors = scores.len(),
            "Market aggregation finished"
        );
        result
    }

    /// Sentiment-only aggregation on the [-1, 1] scale.
    pub async fn aggregate_sentiment(&self, pair: &str) -> SentimentResult {
        let scores = self.collect(Subject::pair(pair)).await;
        let result = reduce_sentiment(&scores);
        info!(
            pair,
            average = result.average,
            signal = %result.signal,
            contributing = result.contributing_advisors,
            advisors = scores.len(),
            "Sentiment aggregation finished"
        );
        result
    }
}

// ─── Reduction ────────────────────────────────────────────────────────────────

/// Sum and count of the contributing scores after scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tally {
    sum: f64,
    count: usize,
}

impl Tally {
    /// Failed scores and exact zeros are skipped. Values are summed in sorted
    /// order so the result is bit-identical under any permutation of `scores`.
    fn of(scores: &[AdvisorScore], scale: fn(f64) -> f64) -> Self {
        let mut values: Vec<f64> = scores
            .iter()
            .filter(|s| s.contributes() && s.raw_score.is_finite())
            .map(|s| scale(s.raw_score.clamp(-1.0, 1.0)))
            .collect();
        values.sort_by(f64::total_cmp);

        Tally {
            sum: values.iter().sum(),
            count: values.len(),
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn identity(raw: f64) -> f64 {
    raw
}

/// Reduce settled scores to the bounded 1–100 market result.
pub fn reduce_market(scores: &[AdvisorScore]) -> AggregateResult {
    let tally = Tally::of(scores, decision::to_percent);
    let final_score = tally
        .mean()
        .unwrap_or(NEUTRAL_SCORE)
        .clamp(decision::SCORE_MIN, decision::SCORE_MAX);
    let signal = decision::market_signal(final_score);

    AggregateResult {
        final_score,
        signal,
        contributing_advisors: tally.count,
        reason: decision::market_reason(signal, tally.count, scores.len()),
    }
}

/// Reduce settled scores to the bounded [-1, 1] sentiment result.
pub fn reduce_sentiment(scores: &[AdvisorScore]) -> SentimentResult {
    let tally = Tally::of(scores, identity);
    let average = tally
        .mean()
        .unwrap_or(NEUTRAL_SENTIMENT)
        .clamp(decision::SENTIMENT_MIN, decision::SENTIMENT_MAX);
    let signal = decision::sentiment_signal(average);

    SentimentResult {
        average,
        signal,
        contributing_advisors: tally.count,
        reason: decision::sentiment_reason(signal, tally.count, scores.len()),
    }
}
