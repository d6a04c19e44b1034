use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use common::{AdvisorClient, AdvisorScore, Error, Result, Subject};

use crate::{parse, prompt, settle, Backend};

/// Local-model advisor backed by an Ollama server (`/api/generate`).
pub struct OllamaAdvisor {
    id: String,
    http: Client,
    backend: Backend,
}

impl OllamaAdvisor {
    pub fn new(id: impl Into<String>, http: Client, backend: Backend) -> Self {
        Self {
            id: id.into(),
            http,
            backend,
        }
    }

    /// Score arbitrary text. Used directly by the news advisor.
    pub async fn score_text(&self, text: &str) -> Result<f64> {
        self.generate(&prompt::text_prompt(text)).await
    }

    async fn generate(&self, prompt: &str) -> Result<f64> {
        let body = GenerateRequest {
            model: &self.backend.model,
            prompt,
            stream: false,
            format: "json",
        };

        let mut request = self.http.post(self.backend.url("/api/generate")).json(&body);
        if let Some(key) = &self.backend.credential {
            request = request.bearer_auth(key);
        }

        debug!(advisor = %self.id, model = %self.backend.model, "Querying Ollama");
        let resp: GenerateResponse = crate::http::send_json(request).await?;
        resp.score()
            .ok_or_else(|| Error::Advisor("Ollama response carried no parsable score".into()))
    }
}

#[async_trait]
impl AdvisorClient for OllamaAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, subject: &Subject) -> AdvisorScore {
        let outcome = self.generate(&prompt::for_subject(subject)).await;
        settle(&self.id, outcome)
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    /// Some deployments put the score at the top level.
    #[serde(default)]
    sentiment_score: Option<Value>,
    /// Stock Ollama returns the model's text here.
    #[serde(default)]
    response: Option<String>,
}

impl GenerateResponse {
    fn score(&self) -> Option<f64> {
        self.sentiment_score
            .as_ref()
            .and_then(parse::score_from_value)
            .or_else(|| self.response.as_deref().and_then(parse::score_from_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Option<f64> {
        serde_json::from_str::<GenerateResponse>(body).unwrap().score()
    }

    #[test]
    fn top_level_score_wins() {
        assert_eq!(decode(r#"{"sentiment_score": 0.4, "response": "-0.9"}"#), Some(0.4));
    }

    #[test]
    fn falls_back_to_response_text() {
        assert_eq!(
            decode(r#"{"response": "{\"sentiment_score\": -0.35}", "done": true}"#),
            Some(-0.35)
        );
    }

    #[test]
    fn empty_payload_has_no_score() {
        assert_eq!(decode("{}"), None);
    }
}
