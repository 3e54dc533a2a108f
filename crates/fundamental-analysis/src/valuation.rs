//! Naive five-year valuation from revenue growth, margin and earnings multiple.

use chart_core::numeric::round_to;
use chart_core::FinancialSnapshot;
use serde::Serialize;

/// Years of compounded revenue growth
pub const PROJECTION_YEARS: i32 = 5;

const GROWTH_FLOOR: f64 = 0.05;
const GROWTH_CAP: f64 = 0.25;
const PE_CAP: f64 = 30.0;
/// Profit margin in percent
const MARGIN_FALLBACK: f64 = 5.0;
const MARGIN_MIN: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub future_value_billions: Option<f64>,
    pub multibagger_rate: Option<f64>,
    /// Guardrails that fired, in the order they were applied
    pub adjustment_notes: Vec<String>,
}

impl ValuationResult {
    pub fn adjustments(&self) -> String {
        self.adjustment_notes.join("; ")
    }
}

/// Project company value five years out.
///
/// `profit_margin` is in percent (20.0 means 20%). Unusable inputs are replaced
/// by conservative defaults and each replacement is recorded as a note. Without
/// revenue, growth or a non-zero market cap there is nothing to project and the
/// result is empty.
pub fn calculate_future_value(
    revenue: Option<f64>,
    revenue_growth: Option<f64>,
    market_cap: Option<f64>,
    trailing_pe: Option<f64>,
    profit_margin: Option<f64>,
) -> ValuationResult {
    let (Some(revenue), Some(mut growth), Some(market_cap)) = (revenue, revenue_growth, market_cap) else {
        return ValuationResult::default();
    };
    if market_cap == 0.0 {
        return ValuationResult::default();
    }

    let mut notes = Vec::new();

    if growth <= 0.0 {
        notes.push("Revenue growth adjusted to 5% from non-positive value".to_string());
        growth = GROWTH_FLOOR;
    } else if growth > GROWTH_CAP {
        notes.push(format!("Revenue growth capped at 25% from {:.1}%", growth * 100.0));
        growth = GROWTH_CAP;
    }

    let pe = match trailing_pe {
        Some(pe) if pe != 0.0 && pe <= PE_CAP => pe,
        other => {
            let from = other.map_or("N/A".to_string(), |pe| format!("{:.1}", pe));
            notes.push(format!("P/E adjusted to 30 from {}", from));
            PE_CAP
        }
    };

    let margin = match profit_margin {
        Some(m) if m >= MARGIN_MIN => m,
        other => {
            let from = other.map_or("N/A".to_string(), |m| format!("{:.1}%", m));
            notes.push(format!("Profit margin adjusted to 5% from {}", from));
            MARGIN_FALLBACK
        }
    };

    let future_value = revenue * (1.0 + growth).powi(PROJECTION_YEARS) * (margin / 100.0) * pe;

    if !notes.is_empty() {
        tracing::debug!("Valuation guardrails applied: {}", notes.join("; "));
    }

    ValuationResult {
        future_value_billions: Some(round_to(future_value / 1e9, 2)),
        multibagger_rate: Some(round_to(future_value / market_cap, 2)),
        adjustment_notes: notes,
    }
}

/// Display form of the valuation for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTarget {
    /// e.g. "$191.44B"
    pub future_value: Option<String>,
    /// e.g. "0.38x"
    pub rate_increase: Option<String>,
    pub adjustments: String,
    pub valuation: ValuationResult,
}

impl PriceTarget {
    pub fn unavailable() -> Self {
        Self::from_valuation(ValuationResult::default())
    }

    pub fn from_valuation(valuation: ValuationResult) -> Self {
        Self {
            future_value: valuation
                .future_value_billions
                .map(|v| format!("${}B", display_number(v))),
            rate_increase: valuation
                .multibagger_rate
                .map(|v| format!("{}x", display_number(v))),
            adjustments: valuation.adjustments(),
            valuation,
        }
    }
}

/// Run the valuation on a snapshot. Reported margins are fractions and are
/// converted to percent first.
pub fn price_target(snapshot: &FinancialSnapshot) -> PriceTarget {
    let valuation = calculate_future_value(
        snapshot.total_revenue,
        snapshot.revenue_growth,
        snapshot.market_cap,
        snapshot.trailing_pe,
        snapshot.profit_margins.map(|m| m * 100.0),
    );
    PriceTarget::from_valuation(valuation)
}

/// Shortest representation, keeping one decimal on whole numbers ("20.0").
fn display_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
