use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The candle source failed or returned unusable data. Not recoverable:
    /// no indicator can be computed without candles.
    #[error("Candle source error: {0}")]
    CandleSource(String),

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a local file (the advisor config) failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
