use chart_core::PriceSeries;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStatValues {
    pub current_price: f64,
    /// Percent change from the first close to the last
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
}

/// Summary of the charted period, with display strings alongside the numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub current: String,
    pub change: String,
    pub high: String,
    pub low: String,
    pub values: PriceStatValues,
}

impl PriceStats {
    pub fn from_series(series: &PriceSeries) -> Self {
        let current_price = series.last().close;
        let first_price = series.first().close;
        let high = series.bars().iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = series.bars().iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let values = PriceStatValues {
            current_price,
            change_percent: (current_price / first_price - 1.0) * 100.0,
            high,
            low,
        };

        Self {
            current: format!("${:.2}", values.current_price),
            change: format!("{:.2}%", values.change_percent),
            high: format!("${:.2}", values.high),
            low: format!("${:.2}", values.low),
            values,
        }
    }
}
