pub mod aggregator;
pub mod analyzer;
pub mod binance;
pub mod config;
pub mod decision;
pub mod registry;

pub use aggregator::{reduce_market, reduce_sentiment, SignalAggregator};
pub use analyzer::Analyzer;
pub use binance::BinanceCandles;
pub use config::{AdvisorConfig, AdvisorFileConfig};
pub use registry::AdvisorRegistry;
