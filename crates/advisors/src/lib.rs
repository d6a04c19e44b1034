//! Concrete `AdvisorClient` adapters.
//!
//! Each adapter owns its backend configuration and converts every failure
//! (transport, HTTP status, malformed payload, unsupported subject) into
//! `AdvisorScore::failed` at the trait boundary.

pub mod anthropic;
pub mod chat;
pub mod http;
pub mod news;
pub mod ollama;
pub mod parse;
pub mod prompt;
pub mod rules;

pub use anthropic::AnthropicAdvisor;
pub use chat::ChatCompletionAdvisor;
pub use http::build_client;
pub use news::{NewsAdvisor, NewsSentiment};
pub use ollama::OllamaAdvisor;
pub use rules::RuleAdvisor;

use tracing::{debug, warn};

use common::{AdvisorScore, Result};

/// Where a remote advisor lives and how it authenticates.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Base URL without a trailing path, e.g. `http://localhost:11434`.
    pub endpoint: String,
    pub credential: Option<String>,
    pub model: String,
}

impl Backend {
    pub fn new(
        endpoint: impl Into<String>,
        credential: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credential,
            model: model.into(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }
}

/// Turn an adapter's internal outcome into the score handed to the aggregator.
pub(crate) fn settle(advisor_id: &str, outcome: Result<f64>) -> AdvisorScore {
    match outcome {
        Ok(raw) => {
            debug!(advisor = %advisor_id, raw, "Advisor scored");
            AdvisorScore::scored(advisor_id, raw)
        }
        Err(e) => {
            warn!(advisor = %advisor_id, error = %e, "Advisor call failed");
            AdvisorScore::failed(advisor_id, e.to_string())
        }
    }
}
