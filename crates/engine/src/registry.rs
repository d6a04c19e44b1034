use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use advisors::{
    AnthropicAdvisor, Backend, ChatCompletionAdvisor, NewsAdvisor, OllamaAdvisor, RuleAdvisor,
};
use common::{AdvisorClient, Error, Result};

use crate::aggregator::SignalAggregator;
use crate::config::{AdvisorConfig, AdvisorFileConfig};

const OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com";
const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
const NEWS_ENDPOINT: &str = "https://newsapi.org";

/// The two aggregators built from the advisor config file.
pub struct AdvisorRegistry {
    pub market: SignalAggregator,
    pub sentiment: SignalAggregator,
}

impl AdvisorRegistry {
    /// Build every configured advisor. Fails on unknown types or missing
    /// required fields; nothing is contacted at build time.
    pub fn from_config(
        file_cfg: &AdvisorFileConfig,
        default_timeout: Duration,
        deadline: Duration,
    ) -> Result<Self> {
        let http = advisors::build_client()?;

        let market =
            build_aggregator("market", &file_cfg.market, &http, default_timeout, deadline)?;
        let sentiment =
            build_aggregator("sentiment", &file_cfg.sentiment, &http, default_timeout, deadline)?;

        Ok(Self { market, sentiment })
    }
}

fn build_aggregator(
    section: &str,
    configs: &[AdvisorConfig],
    http: &Client,
    default_timeout: Duration,
    deadline: Duration,
) -> Result<SignalAggregator> {
    let mut aggregator = SignalAggregator::new().with_deadline(deadline);
    for cfg in configs {
        let advisor = build_advisor(cfg, http)?;
        let timeout = cfg.timeout_or(default_timeout);
        info!(
            section,
            advisor = %advisor.id(),
            kind = %cfg.kind,
            timeout_ms = timeout.as_millis() as u64,
            "Registered advisor"
        );
        aggregator.add(advisor, timeout);
    }
    Ok(aggregator)
}

// ─── Advisor builders ─────────────────────────────────────────────────────────

fn build_advisor(cfg: &AdvisorConfig, http: &Client) -> Result<Arc<dyn AdvisorClient>> {
    let backend = |default_endpoint: &str| -> Result<Backend> {
        Ok(Backend::new(
            cfg.endpoint_or(default_endpoint),
            cfg.resolve_credential(),
            cfg.require_model()?,
        ))
    };

    let advisor: Arc<dyn AdvisorClient> = match cfg.kind.as_str() {
        "ollama" => Arc::new(OllamaAdvisor::new(&cfg.id, http.clone(), backend(OLLAMA_ENDPOINT)?)),
        "deepseek" => Arc::new(
            ChatCompletionAdvisor::new(&cfg.id, http.clone(), backend(DEEPSEEK_ENDPOINT)?)
                .json_mode(cfg.param_bool("json_mode", true))
                .max_tokens(max_tokens(cfg)),
        ),
        "openai" => Arc::new(
            ChatCompletionAdvisor::new(&cfg.id, http.clone(), backend(OPENAI_ENDPOINT)?)
                .json_mode(cfg.param_bool("json_mode", false))
                .max_tokens(max_tokens(cfg)),
        ),
        "anthropic" => Arc::new(
            AnthropicAdvisor::new(&cfg.id, http.clone(), backend(ANTHROPIC_ENDPOINT)?)
                .max_tokens(max_tokens(cfg)),
        ),
        "news" => {
            // Headlines are scored by an Ollama model; the entry's model names it.
            let scorer = OllamaAdvisor::new(
                format!("{}-scorer", cfg.id),
                http.clone(),
                Backend::new(
                    cfg.param_str("scorer_endpoint").unwrap_or(OLLAMA_ENDPOINT),
                    None,
                    cfg.require_model()?,
                ),
            );
            Arc::new(
                NewsAdvisor::new(
                    &cfg.id,
                    http.clone(),
                    &cfg.endpoint_or(NEWS_ENDPOINT),
                    cfg.resolve_credential(),
                    scorer,
                )
                .max_articles(cfg.param_usize("max_articles", NewsAdvisor::DEFAULT_MAX_ARTICLES)),
            )
        }
        "rules" => Arc::new(RuleAdvisor::new(
            &cfg.id,
            cfg.param_f64("oversold", 30.0),
            cfg.param_f64("overbought", 70.0),
        )),
        other => {
            return Err(Error::Config(format!(
                "advisor '{}' has unknown type '{other}'",
                cfg.id
            )))
        }
    };

    Ok(advisor)
}

fn max_tokens(cfg: &AdvisorConfig) -> u32 {
    u32::try_from(cfg.param_usize("max_tokens", ChatCompletionAdvisor::DEFAULT_MAX_TOKENS as usize))
        .unwrap_or(ChatCompletionAdvisor::DEFAULT_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);
    const DEADLINE: Duration = Duration::from_secs(30);

    #[test]
    fn builds_every_known_type() {
        let cfg = AdvisorFileConfig::from_toml_str(
            r#"
            [[market]]
            id = "ollama"
            type = "ollama"
            model = "llama3"

            [[market]]
            id = "deepseek"
            type = "deepseek"
            model = "deepseek-chat"
            credential = "sk-1"

            [[market]]
            id = "openai"
            type = "openai"
            model = "gpt-4o-mini"

            [[market]]
            id = "anthropic"
            type = "anthropic"
            model = "claude-3-haiku"

            [[market]]
            id = "rules"
            type = "rules"

            [[sentiment]]
            id = "news"
            type = "news"
            model = "llama3"
            "#,
        )
        .unwrap();

        let registry = AdvisorRegistry::from_config(&cfg, TIMEOUT, DEADLINE).unwrap();
        assert_eq!(
            registry.market.advisor_ids(),
            vec!["ollama", "deepseek", "openai", "anthropic", "rules"]
        );
        assert_eq!(registry.sentiment.advisor_ids(), vec!["news"]);
    }

    #[test]
    fn shipped_config_asks_ollama_and_news_for_sentiment() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/advisors.toml");
        let cfg = AdvisorFileConfig::load(path).unwrap();

        let registry = AdvisorRegistry::from_config(&cfg, TIMEOUT, DEADLINE).unwrap();
        assert_eq!(registry.sentiment.advisor_ids(), vec!["ollama", "news"]);
        assert_eq!(
            registry.market.advisor_ids(),
            vec!["ollama", "deepseek", "anthropic", "rules"]
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let cfg = AdvisorFileConfig::from_toml_str(
            r#"
            [[market]]
            id = "oracle"
            type = "crystal-ball"
            "#,
        )
        .unwrap();
        let err = AdvisorRegistry::from_config(&cfg, TIMEOUT, DEADLINE).err().unwrap();
        assert!(err.to_string().contains("unknown type 'crystal-ball'"));
    }

    #[test]
    fn model_backed_advisor_without_model_is_rejected() {
        let cfg = AdvisorFileConfig::from_toml_str(
            r#"
            [[market]]
            id = "openai"
            type = "openai"
            "#,
        )
        .unwrap();
        assert!(AdvisorRegistry::from_config(&cfg, TIMEOUT, DEADLINE).is_err());
    }
}
