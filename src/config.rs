use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::api::binance::BINANCE_API_BASE;
use crate::error::ConfigError;
use crate::execution::Sizing;
use crate::models::Position;
use crate::strategy::SignalThresholds;

const ENV_PREFIX: &str = "RSIBOT";
/// Looked up (any supported extension) when no file is given on the command line
const DEFAULT_CONFIG_NAME: &str = "config";
/// Binance accepts at most 8 decimals
const MAX_QUANTITY_PRECISION: u32 = 8;

/// Venue API credentials
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Bot settings, layered: defaults < config file < `RSIBOT_*` environment
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    pub symbol: String,
    pub timeframe: String,
    /// Candles requested per cycle
    pub candle_limit: u32,
    pub rsi_window: usize,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub buy_fraction: f64,
    pub sell_fraction: f64,
    pub initial_cash: f64,
    pub initial_asset: f64,
    pub poll_interval_secs: u64,
    pub error_backoff_secs: u64,
    /// Decimals kept when rounding order quantities down
    pub quantity_precision: u32,
    pub base_url: String,
    pub dry_run: bool,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    secret_key: Option<String>,
}

impl BotConfig {
    /// Load from defaults, an optional file and the environment
    ///
    /// An explicit `path` must exist; otherwise `config.{toml,json,...}` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = Self::defaults()?
            .add_source(file)
            .add_source(Self::environment());

        Self::build(builder)
    }

    /// `RSIBOT_POLL_INTERVAL_SECS` -> `poll_interval_secs`; no field is nested
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .try_parsing(true)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("symbol", "BTC/USDT")?
            .set_default("timeframe", "1m")?
            .set_default("candle_limit", 100_i64)?
            .set_default("rsi_window", 14_i64)?
            .set_default("buy_threshold", 30.0)?
            .set_default("sell_threshold", 70.0)?
            .set_default("buy_fraction", 1.0)?
            .set_default("sell_fraction", 1.0)?
            .set_default("initial_cash", 48.0)?
            .set_default("initial_asset", 0.0)?
            .set_default("poll_interval_secs", 60_i64)?
            .set_default("error_backoff_secs", 10_i64)?
            .set_default("quantity_precision", 6_i64)?
            .set_default("base_url", BINANCE_API_BASE)?
            .set_default("dry_run", false)?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Reject settings the control loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(invalid("symbol", "must not be empty"));
        }
        if self.timeframe.trim().is_empty() {
            return Err(invalid("timeframe", "must not be empty"));
        }
        if self.rsi_window == 0 {
            return Err(invalid("rsi_window", "must be at least 1"));
        }
        if (self.candle_limit as usize) <= self.rsi_window {
            return Err(invalid(
                "candle_limit",
                format!("must exceed rsi_window ({})", self.rsi_window),
            ));
        }
        if !(0.0..=100.0).contains(&self.buy_threshold) {
            return Err(invalid("buy_threshold", "must be within [0, 100]"));
        }
        if !(0.0..=100.0).contains(&self.sell_threshold) {
            return Err(invalid("sell_threshold", "must be within [0, 100]"));
        }
        if self.buy_threshold > self.sell_threshold {
            return Err(invalid("buy_threshold", "must not exceed sell_threshold"));
        }
        for (field, fraction) in [
            ("buy_fraction", self.buy_fraction),
            ("sell_fraction", self.sell_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(invalid(field, "must be within (0, 1]"));
            }
        }
        for (field, balance) in [
            ("initial_cash", self.initial_cash),
            ("initial_asset", self.initial_asset),
        ] {
            if !(balance.is_finite() && balance >= 0.0) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "must be at least 1"));
        }
        if self.error_backoff_secs == 0 {
            return Err(invalid("error_backoff_secs", "must be at least 1"));
        }
        if self.quantity_precision > MAX_QUANTITY_PRECISION {
            return Err(invalid(
                "quantity_precision",
                format!("must be at most {MAX_QUANTITY_PRECISION}"),
            ));
        }

        Ok(())
    }

    /// Credentials, required unless running dry
    pub fn credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        let api_key = self.api_key.as_deref().map(str::trim).unwrap_or_default();
        let secret_key = self.secret_key.as_deref().map(str::trim).unwrap_or_default();

        if !api_key.is_empty() && !secret_key.is_empty() {
            return Ok(Some(Credentials {
                api_key: api_key.to_string(),
                secret_key: secret_key.to_string(),
            }));
        }

        if self.dry_run {
            Ok(None)
        } else {
            Err(ConfigError::MissingCredentials)
        }
    }

    pub fn thresholds(&self) -> SignalThresholds {
        SignalThresholds {
            rsi_oversold: self.buy_threshold,
            rsi_overbought: self.sell_threshold,
        }
    }

    pub fn sizing(&self) -> Sizing {
        Sizing {
            buy_fraction: self.buy_fraction,
            sell_fraction: self.sell_fraction,
        }
    }

    pub fn initial_position(&self) -> Position {
        Position::new(self.initial_cash, self.initial_asset)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    pub fn log_summary(&self) {
        tracing::info!("📊 Configuration:");
        tracing::info!("  Symbol: {} ({} candles x {})", self.symbol, self.candle_limit, self.timeframe);
        tracing::info!(
            "  RSI({}): buy < {} | sell > {}",
            self.rsi_window,
            self.buy_threshold,
            self.sell_threshold
        );
        tracing::info!(
            "  Sizing: buy {}% of cash | sell {}% of position",
            self.buy_fraction * 100.0,
            self.sell_fraction * 100.0
        );
        tracing::info!(
            "  Starting balance: ${:.2} cash | {:.6} asset",
            self.initial_cash,
            self.initial_asset
        );
        tracing::info!(
            "  Poll every {}s, back off {}s after errors",
            self.poll_interval_secs,
            self.error_backoff_secs
        );
        tracing::info!(
            "  Mode: {}",
            if self.dry_run { "DRY RUN (paper orders)" } else { "LIVE" }
        );
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
