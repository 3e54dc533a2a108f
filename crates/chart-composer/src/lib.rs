pub mod config;
pub mod layout;
pub mod overlays;
pub mod panels;
pub mod stats;
pub mod theme;

#[cfg(test)]
mod tests;

pub use config::{validate_ticker, ChartMode, ChartOptions, ChartRequest, FibHigh};
pub use layout::{ChartFigure, PanelKind};
pub use stats::PriceStats;

use chart_core::numeric::min_max;
use chart_core::{ChartError, FinancialSnapshot, FundamentalsProvider, PriceHistoryProvider, PriceSeries};
use chrono::{DateTime, Utc};
use fundamental_analysis::{price_target, FinancialMetrics, PriceTarget};
use serde::Serialize;

/// Everything the chart page shows for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResult {
    pub figure: ChartFigure,
    pub price_stats: PriceStats,
    pub financial_metrics: FinancialMetrics,
    pub price_target: PriceTarget,
}

impl ChartResult {
    pub fn to_json(&self, pretty: bool) -> Result<String, ChartError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Builds a multi-panel chart with overlays, statistics and valuation from an
/// already fetched price series.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartComposer;

impl ChartComposer {
    pub fn new() -> Self {
        Self
    }

    /// `financials` of `None` means fundamentals were not requested; every
    /// metric then reads "N/A" and no valuation is produced.
    pub fn compose(
        &self,
        ticker: &str,
        series: &PriceSeries,
        financials: Option<&FinancialSnapshot>,
        options: &ChartOptions,
    ) -> Result<ChartResult, ChartError> {
        let ticker = validate_ticker(ticker)?;
        options.validate()?;

        let dates = series.dates();
        let closes = series.closes();
        let mut figure = ChartFigure::new(
            format!("{} Stock Price - {}", ticker, options.period.display_name()),
            options.show_volume,
            options.show_rsi,
            options.show_macd,
        );

        overlays::add_price_trace(&mut figure, series, &dates, options.show_candlestick);

        if options.draws_fibonacci() {
            let (low, period_high) = min_max(&closes)
                .ok_or_else(|| ChartError::InvalidInput(format!("No data found for ticker: {}", ticker)))?;
            let high = options.manual_fib_high()?.unwrap_or(period_high);
            overlays::add_fibonacci_lines(&mut figure, &dates, high, low, options.show_extensions);
        }

        if options.has_user_waves() {
            let chart_end = series.last().timestamp.date_naive();
            overlays::add_user_waves(&mut figure, &options.elliott_points, Some(chart_end))?;
        } else if options.show_elliott_auto_waves {
            let drawn = overlays::add_auto_waves(&mut figure, &dates, &closes);
            tracing::debug!("Drew {} auto-detected wave patterns for {}", drawn, ticker);
        }

        if let Some(row) = figure.row_of(PanelKind::Volume) {
            panels::add_volume(&mut figure, row, series, &dates);
        }
        if let Some(row) = figure.row_of(PanelKind::Rsi) {
            panels::add_rsi(&mut figure, row, &closes, &dates);
        }
        if let Some(row) = figure.row_of(PanelKind::Macd) {
            panels::add_macd(&mut figure, row, &closes, &dates);
        }

        overlays::add_moving_averages(&mut figure, &dates, &closes, &options.moving_averages);

        let snapshot = financials.cloned().unwrap_or_default();

        Ok(ChartResult {
            figure,
            price_stats: PriceStats::from_series(series),
            financial_metrics: FinancialMetrics::from_snapshot(&snapshot),
            price_target: price_target(&snapshot),
        })
    }
}

/// Fetch the period's bars (and fundamentals when requested) and compose the chart.
///
/// A failing price source fails the request. A failing fundamentals source is
/// logged and treated as an empty snapshot.
pub fn build_chart(
    prices: &dyn PriceHistoryProvider,
    fundamentals: &dyn FundamentalsProvider,
    request: &ChartRequest,
    now: DateTime<Utc>,
) -> Result<ChartResult, ChartError> {
    let ticker = validate_ticker(&request.ticker)?;
    let options = &request.options;
    options.validate()?;

    let (start, end) = options.period.window(now);
    let interval = options.period.interval();
    tracing::info!(
        "Building chart for {} (period: {}, interval: {})",
        ticker,
        options.period.display_name(),
        interval.as_str()
    );

    let bars = prices.fetch_bars(ticker, start, end, interval)?;
    let series = PriceSeries::new(ticker, bars)?;
    tracing::info!("Bars count for {}: {}", ticker, series.len());

    let snapshot = if options.include_financials {
        match fundamentals.fetch_snapshot(ticker) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Failed to fetch fundamentals for {}: {:?}", ticker, e);
                Some(FinancialSnapshot::default())
            }
        }
    } else {
        None
    };

    ChartComposer::new().compose(ticker, &series, snapshot.as_ref(), options)
}
