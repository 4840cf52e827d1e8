use crate::api::OrderVenue;
use crate::error::ExecutionError;
use crate::models::{OrderConfirmation, OrderRequest, TradeIntent};

/// Submits ledger trade intents as market orders
pub struct Executor<V> {
    venue: V,
    symbol: String,
    quantity_precision: u32,
}

impl<V: OrderVenue> Executor<V> {
    pub fn new(venue: V, symbol: impl Into<String>, quantity_precision: u32) -> Self {
        Self {
            venue,
            symbol: symbol.into(),
            quantity_precision,
        }
    }

    /// Build the market order for `intent`
    ///
    /// Quantity is rounded down to `quantity_precision` decimals.
    pub fn build_order(&self, intent: &TradeIntent) -> Result<OrderRequest, ExecutionError> {
        let quantity = round_down(intent.quantity, self.quantity_precision);
        if quantity <= 0.0 {
            return Err(ExecutionError::QuantityTooSmall {
                quantity: intent.quantity,
                precision: self.quantity_precision,
            });
        }

        Ok(OrderRequest::market(self.symbol.clone(), intent.side, quantity))
    }

    /// Submit one market order and return the venue's confirmation
    ///
    /// Does not wait for fills beyond the single submission call.
    pub async fn execute(&self, intent: &TradeIntent) -> Result<OrderConfirmation, ExecutionError> {
        let request = self.build_order(intent)?;

        let confirmation = self
            .venue
            .submit_market_order(&request)
            .await
            .map_err(ExecutionError::Venue)?;

        tracing::info!(
            "✅ Order placed: {} {} {} (id {}, status {})",
            request.side.as_str(),
            request.quantity,
            request.symbol,
            confirmation.order_id,
            confirmation.status
        );

        Ok(confirmation)
    }

    pub fn venue(&self) -> &V {
        &self.venue
    }
}

/// Truncate to `decimals` places; never returns more than `quantity`
fn round_down(quantity: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    // Absorb float error just below a whole step
    let mut steps = (quantity * factor + 1e-9).floor();
    // ...but never order more than is held
    if steps / factor > quantity {
        steps -= 1.0;
    }
    steps / factor
}
