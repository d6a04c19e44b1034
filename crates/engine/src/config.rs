use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Top-level advisor config file (TOML).
///
/// Example `config/advisors.toml`:
/// ```toml
/// [[market]]
/// id = "ollama"
/// type = "ollama"
/// endpoint = "http://localhost:11434"
/// model = "llama3"
/// timeout_ms = 15000
///
/// [[market]]
/// id = "deepseek"
/// type = "deepseek"
/// model = "deepseek-chat"
/// credential_env = "API_KEY_DEEPSEEK"
///
/// [[sentiment]]
/// id = "news"
/// type = "news"
/// credential_env = "NEWS_API_KEY"
/// model = "llama3"
///
/// [sentiment.params]
/// scorer_endpoint = "http://localhost:11434"
/// max_articles = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdvisorFileConfig {
    /// Advisors consulted with the indicator snapshot.
    #[serde(default)]
    pub market: Vec<AdvisorConfig>,
    /// Advisors consulted with the bare currency pair.
    #[serde(default)]
    pub sentiment: Vec<AdvisorConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisorConfig {
    /// Unique within its section; shows up in logs and scores.
    pub id: String,
    /// Adapter type: "ollama", "deepseek", "openai", "anthropic", "news" or "rules".
    #[serde(rename = "type")]
    pub kind: String,
    /// Base URL. Each type has a sensible default.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Inline credential. Prefer `credential_env` for anything real.
    #[serde(default)]
    pub credential: Option<String>,
    /// Name of an environment variable holding the credential.
    #[serde(default)]
    pub credential_env: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Adapter-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl AdvisorFileConfig {
    /// Load and validate from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("advisor config at '{path}': {e}"))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Invalid advisor config at '{path}': {e}")))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        for (section, advisors) in [("market", &self.market), ("sentiment", &self.sentiment)] {
            let mut seen = HashSet::new();
            for advisor in advisors {
                if advisor.id.trim().is_empty() {
                    return Err(Error::Config(format!("{section} advisor with empty id")));
                }
                if !seen.insert(advisor.id.as_str()) {
                    return Err(Error::Config(format!(
                        "duplicate {section} advisor id '{}'",
                        advisor.id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl AdvisorConfig {
    /// Inline credential first, then the named environment variable.
    pub fn resolve_credential(&self) -> Option<String> {
        self.credential.clone().or_else(|| {
            self.credential_env
                .as_deref()
                .and_then(|key| std::env::var(key).ok())
        })
    }

    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_ms.map(Duration::from_millis).unwrap_or(default)
    }

    pub fn endpoint_or(&self, default: &str) -> String {
        self.endpoint.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn require_model(&self) -> Result<&str> {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("advisor '{}' needs a model", self.id)))
    }

    pub fn param_f64(&self, key: &str, default: f64) -> f64 {
        self.params
            .get(key)
            .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
            .unwrap_or(default)
    }

    pub fn param_usize(&self, key: &str, default: usize) -> usize {
        self.params
            .get(key)
            .and_then(|v| v.as_integer())
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn param_bool(&self, key: &str, default: bool) -> bool {
        self.params
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}
