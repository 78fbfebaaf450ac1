//! Strategy variants and their parameter sets.
//!
//! Every tunable is an explicit value object handed to the engine at run
//! time; nothing is process-wide state.

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverParams {
    pub short_period: usize,
    pub long_period: usize,
    pub trade_quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendReversalParams {
    pub trend_period: usize,
    /// Bars the trend SMA must have risen consecutively to confirm an uptrend.
    pub trend_lookback: u32,
    pub min_red_candle_pct: f64,
    pub max_red_candle_pct: f64,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub max_hold_candles: usize,
    pub trade_quantity: f64,
    pub max_daily_trades: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Crossover(CrossoverParams),
    TrendReversal(TrendReversalParams),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Crossover(_) => "SMA Crossover",
            Strategy::TrendReversal(_) => "Trend Reversal",
        }
    }

    /// Extra bars fetched before the evaluation window so the slowest
    /// rolling indicator is already valid at the first evaluated bar.
    pub fn warmup_bars(&self) -> usize {
        match self {
            Strategy::Crossover(p) => p.long_period + 10,
            Strategy::TrendReversal(p) => {
                p.trend_period + p.trend_lookback as usize + 10
            }
        }
    }
}
