//! Configuration validation.
//!
//! Validates every field up front so a run fails before any data is
//! fetched, with a structured error naming the offending key.

use crate::domain::bar::Timeframe;
use crate::domain::error::BarsimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    validate_symbol(config)?;
    validate_timeframe(config)?;
    validate_initial_balance(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    match config.get_string("strategy", "variant").as_deref() {
        Some("crossover") => validate_crossover(config),
        Some("trend_reversal") => validate_trend_reversal(config),
        Some(other) => Err(BarsimError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "variant".to_string(),
            reason: format!("unknown variant '{other}', expected crossover or trend_reversal"),
        }),
        None => Err(BarsimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "variant".to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BarsimError {
    BarsimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    match config.get_string("market", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BarsimError::ConfigMissing {
            section: "market".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_timeframe(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    match config.get_string("market", "timeframe") {
        None => Err(BarsimError::ConfigMissing {
            section: "market".to_string(),
            key: "timeframe".to_string(),
        }),
        Some(s) => s
            .parse::<Timeframe>()
            .map(|_| ())
            .map_err(|reason| invalid("market", "timeframe", reason)),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let value = config.get_double("backtest", "initial_balance", 0.0);
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    // Both dates are optional (the CLI supplies defaults), but when present
    // they must parse and be ordered.
    let start = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;
    if let (Some(s), Some(e)) = (start, end) {
        if s >= e {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, BarsimError> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    field,
                    format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

fn validate_crossover(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let short = config.get_int("crossover", "short_period", 0);
    let long = config.get_int("crossover", "long_period", 0);
    if short <= 0 {
        return Err(invalid("crossover", "short_period", "short_period must be positive"));
    }
    if long <= 0 {
        return Err(invalid("crossover", "long_period", "long_period must be positive"));
    }
    if short >= long {
        return Err(invalid(
            "crossover",
            "short_period",
            "short_period must be less than long_period",
        ));
    }
    validate_trade_quantity(config, "crossover")
}

fn validate_trend_reversal(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let section = "trend_reversal";

    if config.get_int(section, "trend_period", 0) <= 0 {
        return Err(invalid(section, "trend_period", "trend_period must be positive"));
    }
    if config.get_int(section, "trend_lookback", 0) <= 0 {
        return Err(invalid(section, "trend_lookback", "trend_lookback must be positive"));
    }

    let min_pct = config.get_double(section, "min_red_candle_pct", -1.0);
    let max_pct = config.get_double(section, "max_red_candle_pct", -1.0);
    if min_pct < 0.0 {
        return Err(invalid(
            section,
            "min_red_candle_pct",
            "min_red_candle_pct must be non-negative",
        ));
    }
    if max_pct < min_pct {
        return Err(invalid(
            section,
            "max_red_candle_pct",
            "max_red_candle_pct must be at least min_red_candle_pct",
        ));
    }

    if config.get_double(section, "take_profit_pct", 0.0) <= 0.0 {
        return Err(invalid(section, "take_profit_pct", "take_profit_pct must be positive"));
    }
    let stop = config.get_double(section, "stop_loss_pct", 0.0);
    if stop <= 0.0 || stop >= 100.0 {
        return Err(invalid(
            section,
            "stop_loss_pct",
            "stop_loss_pct must be between 0 and 100",
        ));
    }
    if config.get_int(section, "max_hold_candles", 0) <= 0 {
        return Err(invalid(section, "max_hold_candles", "max_hold_candles must be positive"));
    }
    if config.get_int(section, "max_daily_trades", 0) <= 0 {
        return Err(invalid(section, "max_daily_trades", "max_daily_trades must be positive"));
    }
    validate_trade_quantity(config, section)
}

fn validate_trade_quantity(config: &dyn ConfigPort, section: &str) -> Result<(), BarsimError> {
    if config.get_double(section, "trade_quantity", 0.0) <= 0.0 {
        return Err(invalid(section, "trade_quantity", "trade_quantity must be positive"));
    }
    Ok(())
}
