#![allow(dead_code)]

use barsim::domain::bar::{Bar, BarSeries, Timeframe};
use barsim::domain::error::BarsimError;
use barsim::domain::strategy::{CrossoverParams, Strategy, TrendReversalParams};
use barsim::ports::data_port::MarketDataPort;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, BarsimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BarsimError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.ts >= start && b.ts < end)
            .collect())
    }
}

pub fn run_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

pub fn hour(n: i64) -> DateTime<Utc> {
    run_start() + Duration::hours(n)
}

pub fn bar(ts: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        ts,
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

/// Doji bar: all four prices equal. Never red, never triggers a candle
/// entry, so it only feeds the moving averages.
pub fn flat_bar(ts: DateTime<Utc>, price: f64) -> Bar {
    bar(ts, price, price, price, price)
}

/// Hourly series of doji bars from the given closes.
pub fn hourly_series(closes: &[f64]) -> BarSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| flat_bar(hour(i as i64), c))
        .collect();
    BarSeries::from_raw(bars)
}

pub fn crossover_strategy(short: usize, long: usize, quantity: f64) -> Strategy {
    Strategy::Crossover(CrossoverParams {
        short_period: short,
        long_period: long,
        trade_quantity: quantity,
    })
}

pub fn trend_strategy(max_hold: usize, max_daily: u32) -> Strategy {
    Strategy::TrendReversal(TrendReversalParams {
        trend_period: 2,
        trend_lookback: 1,
        min_red_candle_pct: 0.5,
        max_red_candle_pct: 5.0,
        take_profit_pct: 2.0,
        stop_loss_pct: 3.0,
        max_hold_candles: max_hold,
        trade_quantity: 1.0,
        max_daily_trades: max_daily,
    })
}
