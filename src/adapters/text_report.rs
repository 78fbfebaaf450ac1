//! Plain-text report adapter.
//!
//! Renders a run summary, an exit-reason breakdown, and the full trade
//! log into a fixed-width text block suitable for a terminal or a file.

use crate::domain::error::BarsimError;
use crate::domain::ledger::Trade;
use crate::domain::stats::RunReport;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;
use std::fs;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn render(report: &RunReport) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "BACKTEST RESULTS");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Symbol:   {}", report.symbol);
        let _ = writeln!(out, "Strategy: {}", report.strategy);
        let _ = writeln!(out);

        let stats = match &report.stats {
            Some(stats) => stats,
            None => {
                let _ = writeln!(out, "No trades executed during backtest period.");
                return out;
            }
        };

        let _ = writeln!(
            out,
            "Initial Balance:  ${}",
            money(report.outcome.initial_balance)
        );
        let _ = writeln!(
            out,
            "Final Balance:    ${}",
            money(report.outcome.final_balance)
        );
        let _ = writeln!(
            out,
            "Total Return:     {} ({:+.2}%)",
            signed_money(stats.total_profit),
            stats.total_return_pct
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Trades:     {}", stats.total_trades);
        let _ = writeln!(out, "Winning Trades:   {}", stats.winners);
        let _ = writeln!(out, "Losing Trades:    {}", stats.losers);
        let _ = writeln!(out, "Win Rate:         {:.1}%", stats.win_rate);
        let _ = writeln!(out);
        let _ = writeln!(out, "Average Win:      {}", signed_money(stats.avg_win));
        let _ = writeln!(out, "Average Loss:     {}", signed_money(stats.avg_loss));
        match stats.profit_factor {
            Some(pf) if pf.is_finite() => {
                let _ = writeln!(out, "Profit Factor:    {:.2}", pf);
            }
            Some(_) => {
                let _ = writeln!(out, "Profit Factor:    inf");
            }
            None => {}
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "EXIT REASONS:");
        for (reason, breakdown) in &stats.by_reason {
            let _ = writeln!(
                out,
                "  {:<12} {:>3} trades | P&L: {}",
                reason.to_string(),
                breakdown.count,
                signed_money(breakdown.profit)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "TRADE LOG:");
        let _ = writeln!(out, "{}", "-".repeat(60));
        for trade in &report.outcome.trades {
            match trade {
                Trade::Buy {
                    ts,
                    price,
                    quantity,
                    ..
                } => {
                    let _ = writeln!(
                        out,
                        "{} | BUY  | {:.6} @ ${}",
                        ts.format("%Y-%m-%d %H:%M"),
                        quantity,
                        money(*price)
                    );
                }
                Trade::Sell {
                    ts,
                    price,
                    quantity,
                    profit,
                    reason,
                    ..
                } => {
                    let _ = writeln!(
                        out,
                        "{} | SELL | {:.6} @ ${} | P&L: {} | {}",
                        ts.format("%Y-%m-%d %H:%M"),
                        quantity,
                        money(*price),
                        signed_money(*profit),
                        reason
                    );
                }
            }
        }

        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &RunReport, output_path: &str) -> Result<(), BarsimError> {
        fs::write(output_path, Self::render(report))?;
        Ok(())
    }
}

/// `12345.678` → `"12,345.68"`. Grouping runs over the integer digits only.
fn money(value: f64) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some(parts) => parts,
        None => (formatted.as_str(), "00"),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn signed_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", money(-value))
    } else {
        format!("+${}", money(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::Outcome;
    use crate::domain::signal::ExitReason;
    use chrono::{TimeZone, Utc};

    fn sample_report() -> RunReport {
        let ts_buy = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let ts_sell = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        let outcome = Outcome {
            trades: vec![
                Trade::Buy {
                    ts: ts_buy,
                    price: 50_000.0,
                    quantity: 0.2,
                    balance_after: 0.0,
                },
                Trade::Sell {
                    ts: ts_sell,
                    price: 51_000.0,
                    quantity: 0.2,
                    profit: 200.0,
                    profit_pct: 2.0,
                    reason: ExitReason::TakeProfit,
                    balance_after: 10_200.0,
                },
            ],
            initial_balance: 10_000.0,
            final_balance: 10_200.0,
        };
        RunReport::new("BTCUSDT", "Trend Reversal", outcome)
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(10_000.0), "10,000.00");
        assert_eq!(money(1_234_567.891), "1,234,567.89");
        assert_eq!(money(999.5), "999.50");
        assert_eq!(money(-1_500.0), "-1,500.00");
    }

    #[test]
    fn renders_summary_and_trade_log() {
        let text = TextReportAdapter::render(&sample_report());
        assert!(text.contains("BACKTEST RESULTS"));
        assert!(text.contains("Symbol:   BTCUSDT"));
        assert!(text.contains("Strategy: Trend Reversal"));
        assert!(text.contains("Initial Balance:  $10,000.00"));
        assert!(text.contains("Final Balance:    $10,200.00"));
        assert!(text.contains("Total Return:     +$200.00 (+2.00%)"));
        assert!(text.contains("Win Rate:         100.0%"));
        assert!(text.contains("Profit Factor:    inf"));
        assert!(text.contains("TAKE_PROFIT"));
        assert!(text.contains("2024-01-15 10:00 | BUY  | 0.200000 @ $50,000.00"));
        assert!(text.contains("2024-01-15 14:00 | SELL | 0.200000 @ $51,000.00"));
    }

    #[test]
    fn renders_no_trades_message() {
        let outcome = Outcome {
            trades: vec![],
            initial_balance: 10_000.0,
            final_balance: 10_000.0,
        };
        let report = RunReport::new("BTCUSDT", "SMA Crossover", outcome);
        let text = TextReportAdapter::render(&report);
        assert!(text.contains("No trades executed during backtest period."));
        assert!(!text.contains("TRADE LOG"));
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let adapter = TextReportAdapter;
        adapter
            .write(&sample_report(), path.to_str().unwrap())
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("BACKTEST RESULTS"));
    }
}
