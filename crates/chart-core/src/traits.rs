use chrono::{DateTime, Utc};

use crate::{BarInterval, ChartError, FinancialSnapshot, PriceBar};

/// Source of historical price bars. Retry and rate-limit policy belong to the implementor.
pub trait PriceHistoryProvider: Send + Sync {
    fn fetch_bars(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: BarInterval,
    ) -> Result<Vec<PriceBar>, ChartError>;
}

/// Source of company fundamentals
pub trait FundamentalsProvider: Send + Sync {
    fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, ChartError>;
}
