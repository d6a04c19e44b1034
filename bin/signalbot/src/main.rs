use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::Config;
use engine::{AdvisorFileConfig, AdvisorRegistry, Analyzer, BinanceCandles};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("Failed to load configuration")?;
    info!(pairs = ?cfg.pairs, interval = %cfg.candle_interval, "SignalBot starting");

    let advisor_file = AdvisorFileConfig::load(&cfg.advisor_config_path)?;

    // ── Advisors ──────────────────────────────────────────────────────────────
    let registry = AdvisorRegistry::from_config(
        &advisor_file,
        cfg.advisor_timeout,
        cfg.aggregation_deadline,
    )?;
    info!(
        market = registry.market.len(),
        sentiment = registry.sentiment.len(),
        "Advisor registry ready"
    );

    // ── Candle source ─────────────────────────────────────────────────────────
    let http = advisors::build_client()?;
    let source = Arc::new(BinanceCandles::new(&cfg.binance_base_url, http));

    let analyzer = Analyzer::new(source, registry, &cfg.candle_interval, cfg.candle_limit);

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut failed = Vec::new();
    for pair in &cfg.pairs {
        match analyzer.analyze(pair).await {
            Ok(analysis) => println!("{}", serde_json::to_string_pretty(&analysis)?),
            Err(e) => {
                error!(pair = %pair, error = %e, "Analysis failed");
                failed.push(pair.as_str());
            }
        }
    }

    if !failed.is_empty() {
        bail!("analysis failed for {}", failed.join(", "));
    }
    Ok(())
}
