//! Backtest engine: the single authority over position, balance, and ledger.
//!
//! One bar is fully processed before the next begins: exit check, then
//! entry check, then ledger append. Bars before the configured evaluation
//! start exist only to prime indicators.

use chrono::{DateTime, NaiveDate, Utc};

use super::bar::{Bar, BarSeries};
use super::error::BarsimError;
use super::indicator::{crossover_frames, trend_frames};
use super::ledger::Trade;
use super::signal::{crossover_signal, trend_entry, ExitReason, Signal};
use super::strategy::{Strategy, TrendReversalParams};

/// Run-level parameters independent of the strategy variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub symbol: String,
    pub initial_balance: f64,
    /// Bars before this timestamp prime indicators but are never evaluated.
    pub eval_start: DateTime<Utc>,
}

/// Completed simulation: the full ledger plus the realized cash balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub trades: Vec<Trade>,
    pub initial_balance: f64,
    pub final_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenPosition {
    entry_price: f64,
    size: f64,
    entry_index: usize,
}

/// Single-position simulation state. FLAT is `position == None`; while LONG
/// the entry price and size are both positive.
#[derive(Debug)]
struct Engine {
    balance: f64,
    position: Option<OpenPosition>,
    ledger: Vec<Trade>,
    daily_entries: u32,
    current_day: Option<NaiveDate>,
    last_actioned: Option<Signal>,
}

impl Engine {
    fn new(initial_balance: f64) -> Self {
        Engine {
            balance: initial_balance,
            position: None,
            ledger: Vec::new(),
            daily_entries: 0,
            current_day: None,
            last_actioned: None,
        }
    }

    /// Open a long at `price`. Silently refused while already LONG or when
    /// the balance cannot fund any size at all. The configured quantity is
    /// clamped to what the balance affords: the whole balance is spent
    /// rather than the trade rejected.
    fn buy(&mut self, price: f64, ts: DateTime<Utc>, index: usize, target_quantity: f64) -> bool {
        if self.position.is_some() {
            return false;
        }

        let mut size = target_quantity;
        let mut cost = size * price;
        if cost > self.balance {
            size = self.balance / price;
            cost = self.balance;
        }
        if size <= 0.0 {
            return false;
        }

        self.balance -= cost;
        self.position = Some(OpenPosition {
            entry_price: price,
            size,
            entry_index: index,
        });
        self.ledger.push(Trade::Buy {
            ts,
            price,
            quantity: size,
            balance_after: self.balance,
        });
        true
    }

    /// Close the open long at `price`. Silently refused while FLAT.
    fn sell(&mut self, price: f64, ts: DateTime<Utc>, reason: ExitReason) -> bool {
        let Some(pos) = self.position.take() else {
            return false;
        };

        let proceeds = pos.size * price;
        let profit = proceeds - pos.size * pos.entry_price;
        let profit_pct = (price - pos.entry_price) / pos.entry_price * 100.0;
        self.balance += proceeds;

        self.ledger.push(Trade::Sell {
            ts,
            price,
            quantity: pos.size,
            profit,
            profit_pct,
            reason,
            balance_after: self.balance,
        });
        true
    }

    /// Reset the per-day entry counter when the calendar date changes.
    fn roll_day(&mut self, day: NaiveDate) {
        if self.current_day != Some(day) {
            self.current_day = Some(day);
            self.daily_entries = 0;
        }
    }
}

/// Exit trigger for an open trend-reversal position. Stop-loss is checked
/// before take-profit: when both could fill inside one bar's range the
/// intrabar order is unknown, so the worst case is assumed. Stop and target
/// exits fill at the trigger price, the time exit at the close.
fn check_exit(
    pos: &OpenPosition,
    bar: &Bar,
    index: usize,
    params: &TrendReversalParams,
) -> Option<(f64, ExitReason)> {
    let stop_price = pos.entry_price * (1.0 - params.stop_loss_pct / 100.0);
    if bar.low <= stop_price {
        return Some((stop_price, ExitReason::StopLoss));
    }

    let target_price = pos.entry_price * (1.0 + params.take_profit_pct / 100.0);
    if bar.high >= target_price {
        return Some((target_price, ExitReason::TakeProfit));
    }

    if index - pos.entry_index >= params.max_hold_candles {
        return Some((bar.close, ExitReason::TimeExit));
    }

    None
}

/// Run one backtest over a normalized series. The series must already
/// include the warm-up prefix; evaluation starts at `config.eval_start`.
pub fn run(
    series: &BarSeries,
    strategy: &Strategy,
    config: &RunConfig,
) -> Result<Outcome, BarsimError> {
    if series.is_empty() {
        return Err(BarsimError::NoData {
            symbol: config.symbol.clone(),
        });
    }

    let start_index = series
        .first_index_at_or_after(config.eval_start)
        .unwrap_or(series.len());
    let mut engine = Engine::new(config.initial_balance);

    match strategy {
        Strategy::Crossover(params) => {
            let frames = crossover_frames(series, params);
            for i in start_index..series.len() {
                if i == 0 {
                    // No previous frame to compare against.
                    continue;
                }
                let bar = &series.bars()[i];
                let Some(signal) = crossover_signal(&frames[i - 1], &frames[i]) else {
                    continue;
                };
                if engine.last_actioned == Some(signal) {
                    continue;
                }
                let executed = match signal {
                    Signal::EnterLong => {
                        engine.buy(bar.close, bar.ts, i, params.trade_quantity)
                    }
                    Signal::ExitLong => engine.sell(bar.close, bar.ts, ExitReason::Signal),
                };
                if executed {
                    engine.last_actioned = Some(signal);
                }
            }
        }
        Strategy::TrendReversal(params) => {
            let frames = trend_frames(series, params);
            for i in start_index..series.len() {
                let bar = &series.bars()[i];
                engine.roll_day(bar.ts.date_naive());

                // Exits take priority over a new entry on the same bar.
                if let Some(pos) = &engine.position {
                    if let Some((price, reason)) = check_exit(pos, bar, i, params) {
                        engine.sell(price, bar.ts, reason);
                    }
                }

                if engine.position.is_none()
                    && engine.daily_entries < params.max_daily_trades
                    && trend_entry(bar, &frames[i], params)
                    && engine.buy(bar.close, bar.ts, i, params.trade_quantity)
                {
                    engine.daily_entries += 1;
                }
            }
        }
    }

    // Forced liquidation if still LONG when the data runs out.
    if engine.position.is_some() {
        if let Some(last) = series.last() {
            engine.sell(last.close, last.ts, ExitReason::EndOfTest);
        }
    }

    Ok(Outcome {
        trades: engine.ledger,
        initial_balance: config.initial_balance,
        final_balance: engine.balance,
    })
}
