//! Executed trade records. The ledger is append-only and ordered by
//! execution timestamp; nothing mutates a record after it is pushed.

use crate::domain::signal::ExitReason;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Trade {
    Buy {
        ts: DateTime<Utc>,
        price: f64,
        quantity: f64,
        balance_after: f64,
    },
    Sell {
        ts: DateTime<Utc>,
        price: f64,
        quantity: f64,
        profit: f64,
        profit_pct: f64,
        reason: ExitReason,
        balance_after: f64,
    },
}

impl Trade {
    pub fn ts(&self) -> DateTime<Utc> {
        match self {
            Trade::Buy { ts, .. } | Trade::Sell { ts, .. } => *ts,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Trade::Sell { .. })
    }

    /// Realized profit for sells; buys have none.
    pub fn profit(&self) -> Option<f64> {
        match self {
            Trade::Sell { profit, .. } => Some(*profit),
            Trade::Buy { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn buy_has_no_profit() {
        let trade = Trade::Buy {
            ts: ts(),
            price: 50_000.0,
            quantity: 0.001,
            balance_after: 9_950.0,
        };
        assert!(!trade.is_sell());
        assert_eq!(trade.profit(), None);
        assert_eq!(trade.ts(), ts());
    }

    #[test]
    fn sell_exposes_profit() {
        let trade = Trade::Sell {
            ts: ts(),
            price: 51_000.0,
            quantity: 0.001,
            profit: 1.0,
            profit_pct: 2.0,
            reason: ExitReason::TakeProfit,
            balance_after: 10_001.0,
        };
        assert!(trade.is_sell());
        assert_eq!(trade.profit(), Some(1.0));
    }
}
