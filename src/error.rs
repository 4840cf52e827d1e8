use thiserror::Error;

/// Market data unavailable or unusable
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("market data source failed: {0:#}")]
    Connector(#[source] anyhow::Error),

    #[error("market data source returned no candles")]
    Empty,

    #[error("malformed candle data: {0}")]
    Malformed(String),

    #[error("candle timestamps not strictly increasing at index {index}")]
    NonMonotonic { index: usize },
}

/// Order rejected, or venue unreachable
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("order venue failed: {0:#}")]
    Venue(#[source] anyhow::Error),

    #[error("order quantity {quantity} rounds to zero at {precision} decimals")]
    QuantityTooSmall { quantity: f64, precision: u32 },
}

/// Fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("venue credentials missing (set api_key and secret_key, or enable dry_run)")]
    MissingCredentials,

    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything that can abandon a single cycle
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] DataFetchError),

    #[error("not enough candles for the indicator: have {have}, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

pub type Result<T, E = CycleError> = std::result::Result<T, E>;
