use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{AdvisorClient, AdvisorScore, Error, Result, Subject};

use crate::{parse, prompt, settle, Backend};

const API_VERSION: &str = "2023-06-01";

/// Hosted-LLM advisor backed by the Anthropic Messages API.
pub struct AnthropicAdvisor {
    id: String,
    http: Client,
    backend: Backend,
    max_tokens: u32,
}

impl AnthropicAdvisor {
    pub fn new(id: impl Into<String>, http: Client, backend: Backend) -> Self {
        Self {
            id: id.into(),
            http,
            backend,
            max_tokens: 50,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn message(&self, prompt: &str) -> Result<f64> {
        let body = MessagesRequest {
            model: &self.backend.model,
            max_tokens: self.max_tokens,
            temperature: 0.7,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self
            .http
            .post(self.backend.url("/v1/messages"))
            .header("anthropic-version", API_VERSION)
            .json(&body);
        if let Some(key) = &self.backend.credential {
            request = request.header("x-api-key", key);
        }

        debug!(advisor = %self.id, model = %self.backend.model, "Requesting Anthropic message");
        let resp: MessagesResponse = crate::http::send_json(request).await?;

        let text = resp
            .content
            .into_iter()
            .find_map(|block| (block.kind == "text").then_some(block.text).flatten())
            .ok_or_else(|| Error::Advisor("Anthropic reply carried no text block".into()))?;

        parse::score_from_text(&text)
            .ok_or_else(|| Error::Advisor(format!("unparsable score in reply: '{}'", text.trim())))
    }
}

#[async_trait]
impl AdvisorClient for AnthropicAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, subject: &Subject) -> AdvisorScore {
        let outcome = self.message(&prompt::for_subject(subject)).await;
        settle(&self.id, outcome)
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
