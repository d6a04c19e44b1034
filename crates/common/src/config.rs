use std::time::Duration;

use crate::{Error, Result};

/// Runtime configuration loaded from environment variables at startup.
///
/// Advisor definitions live in a separate TOML file (see
/// `engine::AdvisorFileConfig`); this struct only says where that file is and
/// what the defaults are.
#[derive(Debug, Clone)]
pub struct Config {
    // Pairs analysed on each run, e.g. ["BTCUSDT", "ETHUSDT"]
    pub pairs: Vec<String>,

    // Candle source
    pub binance_base_url: String,
    pub candle_interval: String,
    pub candle_limit: usize,

    // Advisors
    pub advisor_config_path: String,
    /// Used for advisors whose entry carries no `timeout_ms`.
    pub advisor_timeout: Duration,
    /// Upper bound on one whole aggregation. Outstanding calls are abandoned.
    pub aggregation_deadline: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pairs: Vec<String> = required(&lookup, "PAIRS")?
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if pairs.is_empty() {
            return Err(Error::Config("PAIRS must name at least one pair".into()));
        }

        Ok(Config {
            pairs,
            binance_base_url: lookup("BINANCE_BASE_URL")
                .unwrap_or_else(|| "https://api.binance.com".to_string()),
            candle_interval: lookup("CANDLE_INTERVAL").unwrap_or_else(|| "15m".to_string()),
            candle_limit: parsed(&lookup, "CANDLE_LIMIT")?.unwrap_or(50),
            advisor_config_path: lookup("ADVISOR_CONFIG_PATH")
                .unwrap_or_else(|| "config/advisors.toml".to_string()),
            advisor_timeout: Duration::from_millis(
                parsed(&lookup, "ADVISOR_TIMEOUT_MS")?.unwrap_or(10_000),
            ),
            aggregation_deadline: Duration::from_millis(
                parsed(&lookup, "AGGREGATION_DEADLINE_MS")?.unwrap_or(30_000),
            ),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| {
        Error::Config(format!(
            "Required environment variable '{key}' is not set. Check your .env file."
        ))
    })
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has an invalid value: '{raw}'"))),
    }
}
