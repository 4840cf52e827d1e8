pub mod binance;
pub mod paper;

pub use binance::BinanceClient;
pub use paper::PaperVenue;

use crate::models::{Candle, OrderConfirmation, OrderRequest};

/// Source of historical candles
#[allow(async_fn_in_trait)]
pub trait MarketDataSource {
    /// Candles ordered oldest to newest, at most `limit` of them
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<Candle>>;
}

/// Where market orders are sent
#[allow(async_fn_in_trait)]
pub trait OrderVenue {
    async fn submit_market_order(&self, request: &OrderRequest)
        -> anyhow::Result<OrderConfirmation>;
}
