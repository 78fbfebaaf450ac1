//! Per-bar trading signals.

use crate::domain::bar::Bar;
use crate::domain::indicator::{CrossoverFrame, TrendFrame};
use crate::domain::strategy::TrendReversalParams;
use std::fmt;

/// Why a long position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExitReason {
    /// Crossover sell signal.
    Signal,
    StopLoss,
    TakeProfit,
    TimeExit,
    /// Forced liquidation on the final bar.
    EndOfTest,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::Signal => "SIGNAL",
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::TakeProfit => "TAKE_PROFIT",
            ExitReason::TimeExit => "TIME_EXIT",
            ExitReason::EndOfTest => "END_OF_TEST",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    EnterLong,
    ExitLong,
}

/// Crossover signal from two consecutive indicator frames.
///
/// A bar with an unfilled window on either side yields no signal. When the
/// previous short and long averages are exactly equal, both legs are
/// satisfiable; the entry leg is checked first and wins.
pub fn crossover_signal(prev: &CrossoverFrame, current: &CrossoverFrame) -> Option<Signal> {
    let (prev_short, prev_long) = (prev.short_ma?, prev.long_ma?);
    let (cur_short, cur_long) = (current.short_ma?, current.long_ma?);

    if prev_short <= prev_long && cur_short > cur_long {
        return Some(Signal::EnterLong);
    }
    if prev_short >= prev_long && cur_short < cur_long {
        return Some(Signal::ExitLong);
    }
    None
}

/// Trend-reversal entry: a moderately sized red candle during a confirmed
/// uptrend. Memoryless across bars; exits are the engine's business.
pub fn trend_entry(bar: &Bar, frame: &TrendFrame, params: &TrendReversalParams) -> bool {
    frame.in_uptrend
        && bar.is_red()
        && bar.body_pct() >= params.min_red_candle_pct
        && bar.body_pct() <= params.max_red_candle_pct
}
