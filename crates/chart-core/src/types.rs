use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ChartError;

/// Date format used for chart x-axis labels and wave anchors.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// Closed above its open (drawn green).
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered price history for one ticker.
///
/// Guaranteed non-empty with strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, ChartError> {
        let ticker = ticker.into();
        let total = bars.len();
        let bars: Vec<PriceBar> = bars.into_iter().filter(PriceBar::is_finite).collect();
        if bars.len() < total {
            tracing::debug!("Dropped {} incomplete bars for {}", total - bars.len(), ticker);
        }

        if bars.is_empty() {
            return Err(ChartError::InvalidInput(format!("No data found for ticker: {}", ticker)));
        }

        if let Some(w) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(ChartError::InvalidInput(format!(
                "Price bars for {} are not strictly increasing at {}",
                ticker, w[1].timestamp
            )));
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// X-axis labels, one per bar.
    pub fn dates(&self) -> Vec<String> {
        self.bars
            .iter()
            .map(|b| b.timestamp.format(DATE_FORMAT).to_string())
            .collect()
    }
}

/// Company fundamentals as reported by the data source. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(default, rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(default)]
    pub profit_margins: Option<f64>,
    #[serde(default, rename = "priceToSalesTrailing12Months")]
    pub price_to_sales_trailing_12_months: Option<f64>,
}

/// Chart lookback period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Period {
    pub fn lookback_days(&self) -> i64 {
        match self {
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::FiveYears => 365 * 5,
        }
    }

    pub fn interval(&self) -> BarInterval {
        match self {
            Period::OneMonth => BarInterval::Hour1,
            Period::ThreeMonths => BarInterval::Hour4,
            Period::SixMonths | Period::OneYear => BarInterval::Day1,
            Period::FiveYears => BarInterval::Week1,
        }
    }

    /// Human-readable label used in chart titles
    pub fn display_name(&self) -> &'static str {
        match self {
            Period::OneMonth => "Past Month",
            Period::ThreeMonths => "Past 3 Months",
            Period::SixMonths => "Past 6 Months",
            Period::OneYear => "Past Year",
            Period::FiveYears => "Past 5 Years",
        }
    }

    /// Start and end of the lookback window ending at `end`.
    pub fn window(&self, end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (end - Duration::days(self.lookback_days()), end)
    }
}

impl std::str::FromStr for Period {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1M" => Ok(Period::OneMonth),
            "3M" => Ok(Period::ThreeMonths),
            "6M" => Ok(Period::SixMonths),
            "1Y" => Ok(Period::OneYear),
            "5Y" => Ok(Period::FiveYears),
            other => Err(ChartError::InvalidInput(format!("Unknown period: {}", other))),
        }
    }
}

/// Bar interval requested from the price-history provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarInterval {
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1wk")]
    Week1,
}

impl BarInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarInterval::Hour1 => "1h",
            BarInterval::Hour4 => "4h",
            BarInterval::Day1 => "1d",
            BarInterval::Week1 => "1wk",
        }
    }
}
