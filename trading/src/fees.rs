use std::fmt::Debug;

use crate::types::{OrderType, TradeType};

/// Computes the cost of executing a trade
pub trait TradingFees: Debug + Sync + Send {
    /// Fees charged on top of `amount` for a single trade
    fn fees_on_amount(&self, amount: f64, order_type: OrderType, side: TradeType) -> f64;

    /// Fees contained in `total_order_amount`, when the total already includes them
    fn fees_on_total_order_amount(&self, total_order_amount: f64, order_type: OrderType, side: TradeType) -> f64;

    /// What remains of `amount` once fees are deducted
    fn take_fee(&self, amount: f64, order_type: OrderType, side: TradeType) -> f64 {
        amount - self.fees_on_amount(amount, order_type, side)
    }
}

/// Either a percentage of the traded amount or a flat amount per trade, never both
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleTradingFees {
    amount: f64,
    rate: f64,
}

impl SimpleTradingFees {
    /// `percentage` is expressed in percent, 0.1 means 0.1% of every trade
    pub fn percentage(percentage: f64) -> Self {
        Self {
            amount: 0.0,
            rate: percentage / 100.0,
        }
    }

    pub fn amount(amount: f64) -> Self { Self { amount, rate: 0.0 } }

    pub fn is_percentage(&self) -> bool { self.rate != 0.0 }
}

impl TradingFees for SimpleTradingFees {
    fn fees_on_amount(&self, amount: f64, _order_type: OrderType, _side: TradeType) -> f64 {
        if self.is_percentage() {
            amount * self.rate
        } else {
            self.amount
        }
    }

    fn fees_on_total_order_amount(&self, total_order_amount: f64, _order_type: OrderType, _side: TradeType) -> f64 {
        if self.is_percentage() {
            total_order_amount - (total_order_amount / (1.0 + self.rate))
        } else {
            self.amount
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn percentage_fees() {
        let fees = SimpleTradingFees::percentage(0.1);
        assert!(fees.is_percentage());
        assert!(approx_eq!(
            f64,
            fees.fees_on_amount(1000.0, OrderType::Limit, TradeType::Buy),
            1.0,
            epsilon = 1e-9
        ));
        assert!(approx_eq!(
            f64,
            fees.fees_on_total_order_amount(1001.0, OrderType::Market, TradeType::Sell),
            1.0,
            epsilon = 1e-9
        ));
        assert!(approx_eq!(
            f64,
            fees.take_fee(500.0, OrderType::Limit, TradeType::Sell),
            499.5,
            epsilon = 1e-9
        ));
    }

    #[test]
    fn flat_fees() {
        let fees = SimpleTradingFees::amount(2.5);
        assert!(!fees.is_percentage());
        assert!(approx_eq!(
            f64,
            fees.fees_on_amount(1000.0, OrderType::Limit, TradeType::Buy),
            2.5
        ));
        assert!(approx_eq!(
            f64,
            fees.fees_on_total_order_amount(10.0, OrderType::Limit, TradeType::Buy),
            2.5
        ));
        assert!(approx_eq!(f64, fees.take_fee(10.0, OrderType::Market, TradeType::Buy), 7.5));
    }
}
