use crate::models::{Position, Signal, TradeIntent, TradeSide};

/// Share of the available balance committed per trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    /// Fraction of cash spent on a BUY
    pub buy_fraction: f64,
    /// Fraction of the asset sold on a SELL
    pub sell_fraction: f64,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            buy_fraction: 1.0,
            sell_fraction: 1.0,
        }
    }
}

/// Apply a signal to a position at `price`
///
/// BUY spends `cash * buy_fraction`, SELL sells `asset * sell_fraction`.
/// Nothing happens on HOLD, on an empty balance for the side being traded,
/// or on a price that is not a positive number. Balances never go negative.
pub fn apply(
    signal: Signal,
    price: f64,
    position: Position,
    sizing: &Sizing,
) -> (Position, Option<TradeIntent>) {
    if !(price.is_finite() && price > 0.0) {
        return (position, None);
    }

    match signal {
        Signal::Buy if position.cash_balance > 0.0 => {
            let spend = position.cash_balance * sizing.buy_fraction.clamp(0.0, 1.0);
            let quantity = spend / price;
            if !(quantity.is_finite() && quantity > 0.0) {
                return (position, None);
            }

            let updated = Position {
                cash_balance: (position.cash_balance - spend).max(0.0),
                asset_quantity: position.asset_quantity + quantity,
            };
            (
                updated,
                Some(TradeIntent {
                    side: TradeSide::Buy,
                    quantity,
                }),
            )
        }

        Signal::Sell if position.asset_quantity > 0.0 => {
            let quantity = position.asset_quantity * sizing.sell_fraction.clamp(0.0, 1.0);
            if !(quantity.is_finite() && quantity > 0.0) {
                return (position, None);
            }

            let updated = Position {
                cash_balance: position.cash_balance + quantity * price,
                asset_quantity: (position.asset_quantity - quantity).max(0.0),
            };
            (
                updated,
                Some(TradeIntent {
                    side: TradeSide::Sell,
                    quantity,
                }),
            )
        }

        // HOLD, or nothing to trade with
        _ => (position, None),
    }
}

/// Locally tracked cash/asset position
///
/// Updated optimistically when a trade is decided, before the venue confirms
/// it. A failed order is not rolled back, so the ledger can drift from the
/// account.
#[derive(Debug, Clone)]
pub struct PositionLedger {
    position: Position,
    sizing: Sizing,
}

impl PositionLedger {
    pub fn new(position: Position, sizing: Sizing) -> Self {
        Self { position, sizing }
    }

    /// Apply a signal, returning the trade to execute if any
    pub fn apply(&mut self, signal: Signal, price: f64) -> Option<TradeIntent> {
        let (updated, intent) = apply(signal, price, self.position, &self.sizing);
        self.position = updated;
        intent
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.position.portfolio_value(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_spends_all_cash() {
        let (position, intent) = apply(
            Signal::Buy,
            86.0,
            Position::new(48.0, 0.0),
            &Sizing::default(),
        );

        let intent = intent.unwrap();
        assert_eq!(intent.side, TradeSide::Buy);
        assert_eq!(intent.quantity, 48.0 / 86.0);
        assert_eq!(position.cash_balance, 0.0);
        assert_eq!(position.asset_quantity, 48.0 / 86.0);
    }

    #[test]
    fn test_buy_without_cash_is_ignored() {
        let start = Position::new(0.0, 2.0);
        let (position, intent) = apply(Signal::Buy, 100.0, start, &Sizing::default());

        assert!(intent.is_none());
        assert_eq!(position, start);
    }

    #[test]
    fn test_sell_whole_position() {
        let (position, intent) = apply(
            Signal::Sell,
            110.0,
            Position::new(0.0, 0.5),
            &Sizing::default(),
        );

        let intent = intent.unwrap();
        assert_eq!(intent.side, TradeSide::Sell);
        assert_eq!(intent.quantity, 0.5);
        assert_eq!(position.asset_quantity, 0.0);
        assert_eq!(position.cash_balance, 55.0);
    }

    #[test]
    fn test_sell_without_asset_is_ignored() {
        let start = Position::new(48.0, 0.0);
        let (position, intent) = apply(Signal::Sell, 100.0, start, &Sizing::default());

        assert!(intent.is_none());
        assert_eq!(position, start);
    }

    #[test]
    fn test_hold_never_changes_position() {
        let positions = [
            Position::new(0.0, 0.0),
            Position::new(48.0, 0.0),
            Position::new(0.0, 3.5),
            Position::new(12.5, 0.75),
        ];

        for start in positions {
            for price in [0.01, 86.0, 42_000.0] {
                let (position, intent) = apply(Signal::Hold, price, start, &Sizing::default());
                assert!(intent.is_none());
                assert_eq!(position, start);
            }
        }
    }

    #[test]
    fn test_invalid_price_is_ignored() {
        let start = Position::new(48.0, 1.0);
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            for signal in [Signal::Buy, Signal::Sell] {
                let (position, intent) = apply(signal, price, start, &Sizing::default());
                assert!(intent.is_none());
                assert_eq!(position, start);
            }
        }
    }

    #[test]
    fn test_partial_sizing_leaves_residual_for_next_signal() {
        let mut ledger = PositionLedger::new(
            Position::new(100.0, 0.0),
            Sizing {
                buy_fraction: 0.5,
                sell_fraction: 0.5,
            },
        );

        let first = ledger.apply(Signal::Buy, 10.0).unwrap();
        assert_eq!(first.quantity, 5.0);
        assert_eq!(ledger.position().cash_balance, 50.0);

        // Residual cash is reused on the next BUY
        let second = ledger.apply(Signal::Buy, 10.0).unwrap();
        assert_eq!(second.quantity, 2.5);
        assert_eq!(ledger.position().cash_balance, 25.0);
        assert_eq!(ledger.position().asset_quantity, 7.5);

        let sell = ledger.apply(Signal::Sell, 20.0).unwrap();
        assert_eq!(sell.quantity, 3.75);
        assert_eq!(ledger.position().asset_quantity, 3.75);
        assert_eq!(ledger.position().cash_balance, 100.0);
    }

    #[test]
    fn test_balances_never_negative() {
        let signals = [Signal::Buy, Signal::Sell, Signal::Hold];
        let prices = [86.0, 0.3, 12_345.678, 1.0 / 3.0, 99.99];
        let fractions = [1.0, 0.1, 0.333, 0.999];

        for &buy_fraction in &fractions {
            for &sell_fraction in &fractions {
                let mut ledger = PositionLedger::new(
                    Position::new(48.0, 0.0),
                    Sizing {
                        buy_fraction,
                        sell_fraction,
                    },
                );

                for step in 0..200 {
                    let signal = signals[(step * 7 + step / 3) % signals.len()];
                    let price = prices[(step * 5) % prices.len()];
                    ledger.apply(signal, price);

                    let position = ledger.position();
                    assert!(position.cash_balance >= 0.0, "{position:?}");
                    assert!(position.asset_quantity >= 0.0, "{position:?}");
                }
            }
        }
    }

    #[test]
    fn test_full_trade_cycle() {
        let mut ledger = PositionLedger::new(Position::new(48.0, 0.0), Sizing::default());

        // Buy signal - should trade
        assert!(ledger.apply(Signal::Buy, 96.0).is_some());
        assert_eq!(ledger.position().asset_quantity, 0.5);

        // Buy signal again - no cash left
        assert!(ledger.apply(Signal::Buy, 90.0).is_none());

        // Sell signal - should close position
        let sell = ledger.apply(Signal::Sell, 120.0).unwrap();
        assert_eq!(sell.quantity, 0.5);
        assert_eq!(ledger.position(), Position::new(60.0, 0.0));
        assert_eq!(ledger.portfolio_value(120.0), 60.0);

        // Sell signal again - nothing to sell
        assert!(ledger.apply(Signal::Sell, 120.0).is_none());
    }
}
