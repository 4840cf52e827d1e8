use std::sync::atomic::{AtomicU64, Ordering};

use super::OrderVenue;
use crate::models::{OrderConfirmation, OrderRequest};

/// Dry-run venue: logs orders and fills them in full without touching an exchange
#[derive(Debug, Default)]
pub struct PaperVenue {
    next_order_id: AtomicU64,
}

impl PaperVenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders accepted so far
    pub fn orders_submitted(&self) -> u64 {
        self.next_order_id.load(Ordering::Relaxed)
    }
}

impl OrderVenue for PaperVenue {
    async fn submit_market_order(
        &self,
        request: &OrderRequest,
    ) -> anyhow::Result<OrderConfirmation> {
        let order_id = self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::info!(
            "📝 [PAPER] {} {:.6} {} @ market (order #{})",
            request.side.as_str(),
            request.quantity,
            request.symbol,
            order_id
        );

        Ok(OrderConfirmation {
            order_id: format!("paper-{order_id}"),
            client_order_id: request.client_order_id.clone(),
            status: "SIMULATED".to_string(),
            executed_quantity: request.quantity,
            raw: serde_json::to_value(request)?,
        })
    }
}
