//! Rolling indicator computation over a bar series.
//!
//! All functions are pure: one forward pass each, aligned 1:1 with the
//! input bars. `None` marks a window that has not filled yet; callers must
//! never derive a signal from it.

use crate::domain::bar::BarSeries;
use crate::domain::strategy::{CrossoverParams, TrendReversalParams};

/// Per-bar indicator values for the crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverFrame {
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
}

/// Per-bar indicator values for the trend-reversal strategy. Candle shape
/// is read directly off the bar, so only trend state lives here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFrame {
    pub trend_ma: Option<f64>,
    pub rising_streak: u32,
    pub in_uptrend: bool,
}

/// Simple moving average of closes with an O(n) running window sum.
/// The first `period - 1` entries are `None`.
pub fn sma(series: &BarSeries, period: usize) -> Vec<Option<f64>> {
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());
    if period == 0 {
        out.resize(bars.len(), None);
        return out;
    }

    let mut window_sum = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.close;
        if i >= period {
            window_sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Length of the strictly-rising suffix ending at each point of `values`.
/// Resets to 0 on any non-increase, at the series start, and while either
/// side of the comparison is still undefined.
pub fn rising_streaks(values: &[Option<f64>]) -> Vec<u32> {
    let mut out = Vec::with_capacity(values.len());
    let mut streak = 0u32;
    let mut prev: Option<f64> = None;
    for &value in values {
        streak = match (prev, value) {
            (Some(p), Some(v)) if v > p => streak + 1,
            _ => 0,
        };
        out.push(streak);
        prev = value;
    }
    out
}

pub fn crossover_frames(series: &BarSeries, params: &CrossoverParams) -> Vec<CrossoverFrame> {
    let short = sma(series, params.short_period);
    let long = sma(series, params.long_period);
    short
        .into_iter()
        .zip(long)
        .map(|(short_ma, long_ma)| CrossoverFrame { short_ma, long_ma })
        .collect()
}

pub fn trend_frames(series: &BarSeries, params: &TrendReversalParams) -> Vec<TrendFrame> {
    let ma = sma(series, params.trend_period);
    let streaks = rising_streaks(&ma);

    series
        .bars()
        .iter()
        .zip(ma.iter().zip(&streaks))
        .map(|(bar, (&trend_ma, &rising_streak))| {
            let in_uptrend = match trend_ma {
                Some(m) => bar.close > m && rising_streak >= params.trend_lookback,
                None => false,
            };
            TrendFrame {
                trend_ma,
                rising_streak,
                in_uptrend,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn make_series(closes: &[f64]) -> BarSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        BarSeries::from_raw(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    ts: start + Duration::hours(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0,
                })
                .collect(),
        )
    }

    #[test]
    fn sma_warmup_is_undefined() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0]);
        let ma = sma(&series, 3);
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert!(ma[2].is_some());
        assert!(ma[3].is_some());
    }

    #[test]
    fn sma_values() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0]);
        let ma = sma(&series, 3);
        assert_relative_eq!(ma[2].unwrap(), 20.0);
        assert_relative_eq!(ma[3].unwrap(), 30.0);
    }

    #[test]
    fn sma_period_1_is_the_close() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let ma = sma(&series, 1);
        assert_relative_eq!(ma[0].unwrap(), 10.0);
        assert_relative_eq!(ma[2].unwrap(), 30.0);
    }

    #[test]
    fn sma_period_longer_than_series() {
        let series = make_series(&[10.0, 20.0]);
        let ma = sma(&series, 5);
        assert!(ma.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_period_0_all_undefined() {
        let series = make_series(&[10.0, 20.0]);
        let ma = sma(&series, 0);
        assert_eq!(ma, vec![None, None]);
    }

    #[test]
    fn rising_streak_counts_consecutive_increases() {
        let values = vec![
            Some(1.0),
            Some(2.0),
            Some(3.0),
            Some(3.0),
            Some(4.0),
            Some(5.0),
        ];
        assert_eq!(rising_streaks(&values), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn rising_streak_resets_on_decrease() {
        let values = vec![Some(5.0), Some(6.0), Some(4.0), Some(5.0)];
        assert_eq!(rising_streaks(&values), vec![0, 1, 0, 1]);
    }

    #[test]
    fn rising_streak_zero_while_undefined() {
        let values = vec![None, None, Some(1.0), Some(2.0)];
        // First defined value has an undefined predecessor, so streak starts
        // only at the second defined value.
        assert_eq!(rising_streaks(&values), vec![0, 0, 0, 1]);
    }

    #[test]
    fn crossover_frames_align_with_bars() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let frames = crossover_frames(
            &series,
            &CrossoverParams {
                short_period: 2,
                long_period: 4,
                trade_quantity: 1.0,
            },
        );
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0].short_ma, None);
        assert!(frames[1].short_ma.is_some());
        assert_eq!(frames[2].long_ma, None);
        assert!(frames[3].long_ma.is_some());
    }

    #[test]
    fn trend_frames_uptrend_requires_streak_and_price_above_ma() {
        // Rising closes with period-2 SMA: streak builds quickly and price
        // stays above the average.
        let series = make_series(&[10.0, 12.0, 14.0, 16.0, 18.0, 20.0]);
        let params = TrendReversalParams {
            trend_period: 2,
            trend_lookback: 2,
            min_red_candle_pct: 0.5,
            max_red_candle_pct: 5.0,
            take_profit_pct: 2.0,
            stop_loss_pct: 3.0,
            max_hold_candles: 3,
            trade_quantity: 1.0,
            max_daily_trades: 10,
        };
        let frames = trend_frames(&series, &params);

        assert!(!frames[0].in_uptrend);
        assert!(!frames[1].in_uptrend);
        // SMA defined from index 1; streak reaches 2 at index 3.
        assert_eq!(frames[3].rising_streak, 2);
        assert!(frames[3].in_uptrend);
        assert!(frames[5].in_uptrend);
    }

    #[test]
    fn trend_frames_no_uptrend_below_ma() {
        // Price collapses under the average: streak may exist but the price
        // check fails.
        let series = make_series(&[10.0, 12.0, 14.0, 16.0, 1.0]);
        let params = TrendReversalParams {
            trend_period: 2,
            trend_lookback: 1,
            min_red_candle_pct: 0.5,
            max_red_candle_pct: 5.0,
            take_profit_pct: 2.0,
            stop_loss_pct: 3.0,
            max_hold_candles: 3,
            trade_quantity: 1.0,
            max_daily_trades: 10,
        };
        let frames = trend_frames(&series, &params);
        assert!(!frames[4].in_uptrend);
    }
}
