// Order execution and market data module
pub mod candle_store;
pub mod executor;
pub mod ledger;

pub use candle_store::{validate_candles, CandleStore};
pub use executor::Executor;
pub use ledger::{PositionLedger, Sizing};
