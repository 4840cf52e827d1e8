use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// OHLCV candlestick data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trading signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Side as the exchange spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// Only market orders are supported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderKind {
    #[default]
    Market,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Market => "MARKET",
        }
    }
}

/// Cash and asset held by the bot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub cash_balance: f64,
    pub asset_quantity: f64,
}

impl Position {
    pub fn new(cash_balance: f64, asset_quantity: f64) -> Self {
        Self {
            cash_balance,
            asset_quantity,
        }
    }

    /// Mark-to-market value at `price`
    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.cash_balance + self.asset_quantity * price
    }
}

/// A sized trade the ledger wants executed (asset units)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeIntent {
    pub side: TradeSide,
    pub quantity: f64,
}

/// Order as handed to the venue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub kind: OrderKind,
    pub client_order_id: String,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, side: TradeSide, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Market,
            client_order_id: format!("rsibot{}", Uuid::new_v4().simple()),
        }
    }
}

/// Venue acknowledgement of a submitted order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub client_order_id: String,
    pub status: String,
    pub executed_quantity: f64,
    pub raw: serde_json::Value,
}
