//! Price history and fundamentals read from JSON files on disk.

use chart_core::{BarInterval, ChartError, FinancialSnapshot, FundamentalsProvider, PriceBar, PriceHistoryProvider};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn bars_path(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.bars.json", ticker.to_ascii_uppercase()))
    }

    pub fn fundamentals_path(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.fundamentals.json", ticker.to_ascii_uppercase()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ChartError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ChartError::DataSource(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&text)?)
}

impl PriceHistoryProvider for FileStore {
    /// Files hold bars at whatever interval they were exported with; only the
    /// date window is applied.
    fn fetch_bars(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: BarInterval,
    ) -> Result<Vec<PriceBar>, ChartError> {
        let path = self.bars_path(ticker);
        let bars: Vec<PriceBar> = read_json(&path)?;
        let total = bars.len();
        let bars: Vec<PriceBar> = bars
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect();
        tracing::debug!(
            "Loaded {} of {} bars for {} from {} (requested interval {})",
            bars.len(),
            total,
            ticker,
            path.display(),
            interval.as_str()
        );
        Ok(bars)
    }
}

impl FundamentalsProvider for FileStore {
    fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, ChartError> {
        read_json(&self.fundamentals_path(ticker))
    }
}
