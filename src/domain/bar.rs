//! OHLCV bar and the normalized bar series a backtest runs over.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub ts: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    /// Candle body as a percentage of the open, clipped at zero so green
    /// candles report 0 rather than a negative drop.
    pub fn body_pct(&self) -> f64 {
        ((self.open - self.close) / self.open * 100.0).max(0.0)
    }
}

/// Candle interval. Config spells this the way the exchange API does:
/// minutes as a bare number ("60") or "D" for daily candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Minutes(u32),
    Daily,
}

impl Timeframe {
    pub fn interval(&self) -> Duration {
        match self {
            Timeframe::Minutes(m) => Duration::minutes(*m as i64),
            Timeframe::Daily => Duration::days(1),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "D" | "d" => Ok(Timeframe::Daily),
            other => match other.parse::<u32>() {
                Ok(m) if m > 0 => Ok(Timeframe::Minutes(m)),
                _ => Err(format!(
                    "invalid timeframe '{other}', expected minutes or D"
                )),
            },
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Minutes(m) => write!(f, "{}", m),
            Timeframe::Daily => write!(f, "D"),
        }
    }
}

/// Time-ascending, duplicate-free bar sequence. Built once per run from raw
/// provider output and immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Normalize raw provider output: stable sort by timestamp, then drop
    /// duplicate timestamps keeping the first-seen bar.
    pub fn from_raw(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.ts);
        bars.dedup_by_key(|b| b.ts);
        BarSeries { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Index of the first bar at or after `ts`, i.e. where evaluation starts
    /// once the warm-up prefix is skipped.
    pub fn first_index_at_or_after(&self, ts: DateTime<Utc>) -> Option<usize> {
        self.bars.iter().position(|b| b.ts >= ts)
    }
}
