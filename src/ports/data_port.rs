//! Market data access port trait.

use crate::domain::bar::{Bar, Timeframe};
use crate::domain::error::BarsimError;
use chrono::{DateTime, Utc};

/// Source of historical bars. Implementations return bars in whatever
/// order the backing store yields them; callers normalize through
/// `BarSeries::from_raw`.
pub trait MarketDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, BarsimError>;
}
