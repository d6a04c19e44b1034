use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{AdvisorClient, AdvisorScore, Error, Result, Subject};

use crate::{parse, prompt, settle, Backend};

/// Hosted-LLM advisor speaking the OpenAI chat-completions protocol
/// (`/v1/chat/completions`). Serves both OpenAI and DeepSeek; DeepSeek is run
/// with `json_mode` so the reply is a JSON object.
pub struct ChatCompletionAdvisor {
    id: String,
    http: Client,
    backend: Backend,
    json_mode: bool,
    max_tokens: u32,
}

impl ChatCompletionAdvisor {
    pub const DEFAULT_MAX_TOKENS: u32 = 50;

    pub fn new(id: impl Into<String>, http: Client, backend: Backend) -> Self {
        Self {
            id: id.into(),
            http,
            backend,
            json_mode: false,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    /// Ask for `response_format: {"type": "json_object"}`.
    pub fn json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn complete(&self, prompt: &str) -> Result<f64> {
        let body = ChatRequest {
            model: &self.backend.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: 0.7,
            response_format: self.json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        let mut request = self
            .http
            .post(self.backend.url("/v1/chat/completions"))
            .json(&body);
        if let Some(key) = &self.backend.credential {
            request = request.bearer_auth(key);
        }

        debug!(advisor = %self.id, model = %self.backend.model, "Requesting chat completion");
        let resp: ChatResponse = crate::http::send_json(request).await?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Advisor("chat completion returned no content".into()))?;

        parse::score_from_text(&content).ok_or_else(|| {
            Error::Advisor(format!("unparsable score in reply: '{}'", content.trim()))
        })
    }
}

#[async_trait]
impl AdvisorClient for ChatCompletionAdvisor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, subject: &Subject) -> AdvisorScore {
        let outcome = self.complete(&prompt::for_subject(subject)).await;
        settle(&self.id, outcome)
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
