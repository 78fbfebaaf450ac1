//! CSV file market data adapter.
//!
//! Reads bars from `{symbol}_{timeframe}.csv` under a base directory.
//! Columns: timestamp_ms, open, high, low, close, volume. Rows outside
//! the requested window are skipped; ordering and duplicates are left
//! to `BarSeries::from_raw`.

use crate::domain::bar::{Bar, Timeframe};
use crate::domain::error::BarsimError;
use crate::ports::data_port::MarketDataPort;
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, timeframe))
    }
}

fn provider_err(reason: impl Into<String>) -> BarsimError {
    BarsimError::Provider {
        reason: reason.into(),
    }
}

fn field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, BarsimError> {
    record
        .get(index)
        .ok_or_else(|| provider_err(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| provider_err(format!("invalid {} value: {}", name, e)))
}

impl MarketDataPort for CsvMarketData {
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, BarsimError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path)
            .map_err(|e| provider_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| provider_err(format!("CSV parse error: {}", e)))?;

            let millis: i64 = record
                .get(0)
                .ok_or_else(|| provider_err("missing timestamp_ms column"))?
                .trim()
                .parse()
                .map_err(|e| provider_err(format!("invalid timestamp_ms value: {}", e)))?;
            let ts = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| provider_err(format!("timestamp out of range: {}", millis)))?;

            // Half-open window: a bar stamped exactly at `end` belongs to
            // the next run.
            if ts < start || ts >= end {
                continue;
            }

            bars.push(Bar {
                ts,
                open: field(&record, 1, "open")?,
                high: field(&record, 2, "high")?,
                low: field(&record, 3, "low")?,
                close: field(&record, 4, "close")?,
                volume: field(&record, 5, "volume")?,
            });
        }

        Ok(bars)
    }
}
