//! Summary statistics over a completed ledger.

use std::collections::BTreeMap;

use super::engine::Outcome;
use super::ledger::Trade;
use super::signal::ExitReason;

/// Per-exit-reason slice of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonBreakdown {
    pub count: usize,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    /// winners / total × 100.
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Sum of realized sell profits.
    pub total_profit: f64,
    /// final − initial balance, as a percentage of the initial balance.
    pub total_return_pct: f64,
    /// Σ wins / |Σ losses|. Infinite when there are wins but no losses;
    /// omitted when both sums are zero.
    pub profit_factor: Option<f64>,
    pub by_reason: BTreeMap<ExitReason, ReasonBreakdown>,
}

impl Stats {
    /// `None` when the ledger holds no sells: "no trades" is a distinct
    /// result, not a zero-profit one.
    pub fn compute(outcome: &Outcome) -> Option<Stats> {
        let sells: Vec<(f64, ExitReason)> = outcome
            .trades
            .iter()
            .filter_map(|t| match t {
                Trade::Sell { profit, reason, .. } => Some((*profit, *reason)),
                Trade::Buy { .. } => None,
            })
            .collect();

        if sells.is_empty() {
            return None;
        }

        let total_trades = sells.len();
        let mut winners = 0usize;
        let mut win_sum = 0.0_f64;
        let mut loss_sum = 0.0_f64;
        let mut total_profit = 0.0_f64;
        let mut by_reason: BTreeMap<ExitReason, ReasonBreakdown> = BTreeMap::new();

        for &(profit, reason) in &sells {
            total_profit += profit;
            if profit > 0.0 {
                winners += 1;
                win_sum += profit;
            } else {
                loss_sum += profit.abs();
            }
            let entry = by_reason.entry(reason).or_insert(ReasonBreakdown {
                count: 0,
                profit: 0.0,
            });
            entry.count += 1;
            entry.profit += profit;
        }

        let losers = total_trades - winners;
        let win_rate = winners as f64 / total_trades as f64 * 100.0;

        let avg_win = if winners > 0 {
            win_sum / winners as f64
        } else {
            0.0
        };
        let avg_loss = if losers > 0 {
            -loss_sum / losers as f64
        } else {
            0.0
        };

        let profit_factor = if loss_sum > 0.0 {
            Some(win_sum / loss_sum)
        } else if win_sum > 0.0 {
            Some(f64::INFINITY)
        } else {
            None
        };

        let total_return_pct = if outcome.initial_balance > 0.0 {
            (outcome.final_balance - outcome.initial_balance) / outcome.initial_balance * 100.0
        } else {
            0.0
        };

        Some(Stats {
            total_trades,
            winners,
            losers,
            win_rate,
            avg_win,
            avg_loss,
            total_profit,
            total_return_pct,
            profit_factor,
            by_reason,
        })
    }
}

/// Everything the presentation layer needs to render one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub symbol: String,
    pub strategy: String,
    pub outcome: Outcome,
    pub stats: Option<Stats>,
}

impl RunReport {
    pub fn new(symbol: &str, strategy: &str, outcome: Outcome) -> Self {
        let stats = Stats::compute(&outcome);
        RunReport {
            symbol: symbol.to_string(),
            strategy: strategy.to_string(),
            outcome,
            stats,
        }
    }
}
