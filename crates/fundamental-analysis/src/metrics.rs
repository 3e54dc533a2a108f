use chart_core::FinancialSnapshot;
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

/// Fundamentals formatted for display; every missing value reads "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub revenue_growth: String,
    #[serde(rename = "forwardPE")]
    pub forward_pe: String,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: String,
    pub profit_margin: String,
    pub price_to_sales: String,
    pub total_revenue: String,
    pub market_cap: String,
}

impl FinancialMetrics {
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            revenue_growth: format_percent(snapshot.revenue_growth),
            forward_pe: format_ratio(snapshot.forward_pe),
            trailing_pe: format_ratio(snapshot.trailing_pe),
            profit_margin: format_percent(snapshot.profit_margins),
            price_to_sales: format_ratio(snapshot.price_to_sales_trailing_12_months),
            total_revenue: format_billions(snapshot.total_revenue),
            market_cap: format_billions(snapshot.market_cap),
        }
    }

    pub fn unavailable() -> Self {
        Self::from_snapshot(&FinancialSnapshot::default())
    }
}

/// Fraction as a percentage: 0.1234 -> "12.34%"
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v * 100.0))
}

pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}", v))
}

/// Dollar amount in billions: 394.3e9 -> "$394.30B"
pub fn format_billions(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${:.2}B", v / 1e9))
}
