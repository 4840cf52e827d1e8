use std::time::Duration;

use crate::api::{MarketDataSource, OrderVenue};
use crate::config::BotConfig;
use crate::error::CycleError;
use crate::execution::{CandleStore, Executor, PositionLedger};
use crate::models::{OrderConfirmation, Position, Signal};
use crate::strategy::{RsiStrategy, Strategy};

/// What to trade and how often
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub symbol: String,
    pub timeframe: String,
    pub candle_limit: u32,
    /// Sleep after a completed cycle
    pub poll_interval: Duration,
    /// Sleep after a failed cycle
    pub error_backoff: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            timeframe: config.timeframe.clone(),
            candle_limit: config.candle_limit,
            poll_interval: config.poll_interval(),
            error_backoff: config.error_backoff(),
        }
    }
}

/// Result of one successful cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub price: f64,
    pub rsi: f64,
    pub signal: Signal,
    pub order: Option<OrderConfirmation>,
    pub position: Position,
    pub portfolio_value: f64,
}

pub type CycleOutcome = Result<CycleReport, CycleError>;

/// Fetch → indicate → signal → ledger → execute, forever
///
/// Cycles run one at a time. A failed cycle is logged and retried after
/// the error backoff; it never ends the loop.
pub struct ControlLoop<S, V> {
    settings: LoopSettings,
    store: CandleStore<S>,
    strategy: Box<dyn Strategy>,
    ledger: PositionLedger,
    executor: Executor<V>,
    cycle_count: u64,
}

impl<S: MarketDataSource, V: OrderVenue> ControlLoop<S, V> {
    pub fn new(
        settings: LoopSettings,
        store: CandleStore<S>,
        strategy: Box<dyn Strategy>,
        ledger: PositionLedger,
        executor: Executor<V>,
    ) -> Self {
        Self {
            settings,
            store,
            strategy,
            ledger,
            executor,
            cycle_count: 0,
        }
    }

    /// Wire up the RSI strategy, ledger and executor from configuration
    pub fn from_config(config: &BotConfig, source: S, venue: V) -> Self {
        let settings = LoopSettings::from_config(config);
        let executor = Executor::new(venue, settings.symbol.clone(), config.quantity_precision);

        Self::new(
            settings,
            CandleStore::new(source),
            Box::new(RsiStrategy::new(config.rsi_window, config.thresholds())),
            PositionLedger::new(config.initial_position(), config.sizing()),
            executor,
        )
    }

    /// Run a single cycle without logging or sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let candles = self
            .store
            .fetch(
                &self.settings.symbol,
                &self.settings.timeframe,
                self.settings.candle_limit,
            )
            .await?;

        let evaluation =
            self.strategy
                .evaluate(candles)
                .ok_or_else(|| CycleError::InsufficientData {
                    have: candles.len(),
                    need: self.strategy.min_candles_required(),
                })?;

        tracing::debug!(
            strategy = self.strategy.name(),
            rsi = evaluation.rsi,
            price = evaluation.price,
            signal = ?evaluation.signal,
            "Signal generated"
        );

        let order = match self.ledger.apply(evaluation.signal, evaluation.price) {
            Some(intent) => match self.executor.execute(&intent).await {
                Ok(confirmation) => Some(confirmation),
                Err(e) => {
                    tracing::warn!(
                        "⚠️  Ledger already recorded {} {:.6}; local position now differs from the venue",
                        intent.side.as_str(),
                        intent.quantity
                    );
                    return Err(e.into());
                }
            },
            None => None,
        };

        let position = self.ledger.position();
        Ok(CycleReport {
            price: evaluation.price,
            rsi: evaluation.rsi,
            signal: evaluation.signal,
            order,
            position,
            portfolio_value: position.portfolio_value(evaluation.price),
        })
    }

    /// Run one cycle and emit its status line
    pub async fn step(&mut self) -> CycleOutcome {
        self.cycle_count += 1;
        let outcome = self.run_cycle().await;

        match &outcome {
            Ok(report) => {
                tracing::info!(
                    "💹 [CYCLE {}] {} @ ${:.2} | RSI {:.2} | {:?}",
                    self.cycle_count,
                    self.settings.symbol,
                    report.price,
                    report.rsi,
                    report.signal
                );
                tracing::info!(
                    "Portfolio Value: ${:.2} | Cash Balance: ${:.2} | Asset Position: {:.6}",
                    report.portfolio_value,
                    report.position.cash_balance,
                    report.position.asset_quantity
                );
            }
            Err(e) => {
                tracing::error!(
                    "❌ Error in trading cycle {}: {} (retrying in {:?})",
                    self.cycle_count,
                    e,
                    self.settings.error_backoff
                );
            }
        }

        outcome
    }

    /// Poll interval after success, error backoff after failure
    pub fn delay_after(&self, outcome: &CycleOutcome) -> Duration {
        match outcome {
            Ok(_) => self.settings.poll_interval,
            Err(_) => self.settings.error_backoff,
        }
    }

    /// Loop until the process is killed
    pub async fn run(&mut self) {
        tracing::info!("🚀 Trading loop started for {}", self.settings.symbol);

        loop {
            let outcome = self.step().await;
            tokio::time::sleep(self.delay_after(&outcome)).await;
        }
    }

    /// Run `cycles` steps, sleeping between them but not after the last
    pub async fn run_cycles(&mut self, cycles: usize) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::with_capacity(cycles);

        for i in 0..cycles {
            let outcome = self.step().await;
            if i + 1 < cycles {
                tokio::time::sleep(self.delay_after(&outcome)).await;
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn executor(&self) -> &Executor<V> {
        &self.executor
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}
