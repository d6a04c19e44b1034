use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use common::{AdvisorClient, AdvisorScore, Error, Result, Subject};

use crate::{settle, OllamaAdvisor};

/// Categorical verdict of the news advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsSentiment {
    Positive,
    Negative,
    /// No articles found. Maps to 0, which the aggregator treats as "no opinion".
    Neutral,
}

impl NewsSentiment {
    pub fn score(self) -> f64 {
        match self {
            NewsSentiment::Positive => 1.0,
            NewsSentiment::Negative => -1.0,
            NewsSentiment::Neutral => 0.0,
        }
    }

    /// Mean article score above zero is positive; zero or below is negative.
    pub fn from_mean(mean: f64) -> Self {
        if mean > 0.0 {
            NewsSentiment::Positive
        } else {
            NewsSentiment::Negative
        }
    }
}

/// News-sentiment advisor: pulls recent articles for the pair from a
/// NewsAPI-compatible endpoint and scores each headline with an Ollama model.
///
/// Only judges `Subject::Pair`.
pub struct NewsAdvisor {
    id: String,
    http: Client,
    search_url: String,
    api_key: Option<String>,
    scorer: OllamaAdvisor,
    max_articles: usize,
}

impl NewsAdvisor {
    pub const DEFAULT_MAX_ARTICLES: usize = 10;

    pub fn new(
        id: impl Into<String>,
        http: Client,
        endpoint: &str,
        api_key: Option<String>,
        scorer: OllamaAdvisor,
    ) -> Self {
        Self {
            id: id.into(),
            http,
            search_url: format!("{}/v2/everything", endpoint.trim_end_matches('/')),
            api_key,
            scorer,
            max_articles: Self::DEFAULT_MAX_ARTICLES,
        }
    }

    pub fn max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles.max(1);
        self
    }

    pub async fn sentiment(&self, pair: &str) -> Result<NewsSentiment> {
        let mut params = vec![("q", pair)];
        if let Some(key) = &self.api_key {
            params.push(("apiKey", key.as_str()));
        }
        let url = Url::parse_with_params(&self.search_url, &params).map_err(|e| {
            Error::Config(format!("invalid news endpoint '{}': {e}", self.search_url))
        })?;

        let resp: NewsResponse = crate::http::send_json(self.http.get(url)).await?;
        if resp.articles.is_empty() {
            debug!(advisor = %self.id, pair, "No news articles found");
            return Ok(NewsSentiment::Neutral);
        }

        let texts: Vec<String> = resp
            .articles
            .iter()
            .take(self.max_articles)
            .map(Article::text)
            .collect();

        let outcomes = join_all(texts.iter().map(|text| self.scorer.score_text(text))).await;

        let scores: Vec<f64> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(score) if score.is_finite() => Some(score.clamp(-1.0, 1.0)),
                Ok(score) => {
                    warn!(advisor = %self.id, score, "Discarding non-finite article score");
                    None
                }
                Err(e) => {
                    warn!(advisor = %self.id, error = %e, "Article scoring failed");
                    None
                }
            })
            .collect();

        if scores.is_empty() {
            return Err(Error::Advisor(format!(
                "none of {} articles could be scored",
                texts.len()
            )));
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        debug!(advisor = %self.id, pair, articles = scores.len(), mean, "News sentiment computed");
        Ok(NewsSentiment::from_mean(mean))
    }
}

#[async_trait]
impl AdvisorClient for NewsAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, subject: &Subject) -> AdvisorScore {
        match subject {
            Subject::Pair { pair } => {
                let outcome = self.sentiment(pair).await.map(NewsSentiment::score);
                settle(&self.id, outcome)
            }
            Subject::Market { .. } => {
                AdvisorScore::failed(&self.id, "news advisor only judges currency pairs")
            }
        }
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl Article {
    fn text(&self) -> String {
        format!(
            "{} {}",
            self.title.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mean_counts_as_negative() {
        assert_eq!(NewsSentiment::from_mean(0.0), NewsSentiment::Negative);
        assert_eq!(NewsSentiment::from_mean(0.01), NewsSentiment::Positive);
    }

    #[test]
    fn categories_map_to_unit_scores() {
        assert_eq!(NewsSentiment::Positive.score(), 1.0);
        assert_eq!(NewsSentiment::Negative.score(), -1.0);
        assert_eq!(NewsSentiment::Neutral.score(), 0.0);
    }

    #[test]
    fn article_text_joins_title_and_description() {
        let article = Article {
            title: Some("BTC rallies".into()),
            description: None,
        };
        assert_eq!(article.text(), "BTC rallies");
    }
}
