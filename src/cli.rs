//! CLI definition and dispatch.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::bar::{BarSeries, Timeframe};
use crate::domain::config_validation::{validate_run_config, validate_strategy_config};
use crate::domain::engine::{self, RunConfig};
use crate::domain::stats::RunReport;
use crate::domain::strategy::{CrossoverParams, Strategy, TrendReversalParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "barsim", about = "Deterministic bar-series backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluation start date (YYYY-MM-DD); overrides the config
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Evaluation end date (YYYY-MM-DD); overrides the config
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Initial balance; overrides the config
        #[arg(short, long)]
        balance: Option<f64>,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            start,
            end,
            balance,
            output,
        } => run_backtest(&config, start, end, balance, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn validate(adapter: &dyn ConfigPort) -> Result<(), ExitCode> {
    validate_run_config(adapter)
        .and_then(|_| validate_strategy_config(adapter))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })
}

/// Builds the strategy from its config section. Call only after
/// `validate_strategy_config`; the fallback values below are never
/// reached on a validated config.
pub fn build_strategy(adapter: &dyn ConfigPort) -> Strategy {
    match adapter.get_string("strategy", "variant").as_deref() {
        Some("trend_reversal") => {
            let s = "trend_reversal";
            Strategy::TrendReversal(TrendReversalParams {
                trend_period: adapter.get_int(s, "trend_period", 20) as usize,
                trend_lookback: adapter.get_int(s, "trend_lookback", 3) as u32,
                min_red_candle_pct: adapter.get_double(s, "min_red_candle_pct", 0.5),
                max_red_candle_pct: adapter.get_double(s, "max_red_candle_pct", 5.0),
                take_profit_pct: adapter.get_double(s, "take_profit_pct", 2.0),
                stop_loss_pct: adapter.get_double(s, "stop_loss_pct", 3.0),
                max_hold_candles: adapter.get_int(s, "max_hold_candles", 3) as usize,
                trade_quantity: adapter.get_double(s, "trade_quantity", 0.001),
                max_daily_trades: adapter.get_int(s, "max_daily_trades", 10) as u32,
            })
        }
        _ => Strategy::Crossover(CrossoverParams {
            short_period: adapter.get_int("crossover", "short_period", 20) as usize,
            long_period: adapter.get_int("crossover", "long_period", 50) as usize,
            trade_quantity: adapter.get_double("crossover", "trade_quantity", 0.001),
        }),
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn config_date(adapter: &dyn ConfigPort, key: &str) -> Option<NaiveDate> {
    adapter
        .get_string("backtest", key)
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn run_backtest(
    config_path: &PathBuf,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    balance: Option<f64>,
    output: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(code) = validate(&adapter) {
        return code;
    }

    let symbol = adapter
        .get_string("market", "symbol")
        .unwrap_or_default();
    let timeframe = adapter
        .get_string("market", "timeframe")
        .unwrap_or_default()
        .parse::<Timeframe>()
        .unwrap_or(Timeframe::Minutes(60));
    let data_dir = adapter
        .get_string("backtest", "data_dir")
        .unwrap_or_else(|| "data".to_string());

    let strategy = build_strategy(&adapter);
    let initial_balance = balance.unwrap_or_else(|| {
        adapter.get_double("backtest", "initial_balance", 10_000.0)
    });

    // Stage 2: Resolve the evaluation window. Defaults: end today,
    // start seven days earlier.
    let end_date = end
        .or_else(|| config_date(&adapter, "end_date"))
        .unwrap_or_else(|| Utc::now().date_naive());
    let start_date = start
        .or_else(|| config_date(&adapter, "start_date"))
        .unwrap_or_else(|| end_date - Duration::days(7));
    if start_date >= end_date {
        eprintln!("error: start date must be before end date");
        return ExitCode::from(2);
    }

    let eval_start = midnight_utc(start_date);
    let eval_end = midnight_utc(end_date);
    let warmup_start = eval_start - timeframe.interval() * strategy.warmup_bars() as i32;

    // Stage 3: Fetch bars, warm-up prefix included
    eprintln!(
        "Fetching {} {} bars from {} to {}",
        symbol,
        timeframe,
        warmup_start.format("%Y-%m-%d %H:%M"),
        eval_end.format("%Y-%m-%d %H:%M"),
    );
    let data_port = CsvMarketData::new(PathBuf::from(data_dir));
    let bars = match data_port.fetch_bars(&symbol, timeframe, warmup_start, eval_end) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let series = BarSeries::from_raw(bars);
    eprintln!("  {} bars loaded", series.len());

    // Stage 4: Run the simulation
    eprintln!("Running {} backtest on {}", strategy.name(), symbol);
    let run_config = RunConfig {
        symbol: symbol.clone(),
        initial_balance,
        eval_start,
    };
    let outcome = match engine::run(&series, &strategy, &run_config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    // Stage 5: Report
    let report = RunReport::new(&symbol, strategy.name(), outcome);
    match output {
        Some(path) => {
            let path_str = path.display().to_string();
            if let Err(e) = TextReportAdapter.write(&report, &path_str) {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
            eprintln!("Report written to {}", path_str);
        }
        None => print!("{}", TextReportAdapter::render(&report)),
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(code) = validate(&adapter) {
        return code;
    }

    let strategy = build_strategy(&adapter);
    eprintln!(
        "Config OK: {} on {}, warmup {} bars",
        strategy.name(),
        adapter.get_string("market", "symbol").unwrap_or_default(),
        strategy.warmup_bars(),
    );
    ExitCode::SUCCESS
}
