pub mod advisor;
pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use advisor::AdvisorClient;
pub use config::Config;
pub use error::{Error, Result};
pub use source::CandleSource;
pub use types::*;
