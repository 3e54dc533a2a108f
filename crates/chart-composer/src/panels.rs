//! Subordinate indicator panels below the price chart.

use chart_core::PriceSeries;
use technical_analysis::{macd, rsi, MACD_FAST, MACD_SIGNAL, MACD_SLOW, RSI_WINDOW};

use crate::layout::{ChartFigure, LineDash, LineStyle, Trace};
use crate::theme;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

pub fn add_volume(fig: &mut ChartFigure, row: usize, series: &PriceSeries, dates: &[String]) {
    let colors = series
        .bars()
        .iter()
        .map(|b| (if b.is_up() { theme::UP } else { theme::DOWN }).to_string())
        .collect();
    fig.add_trace(Trace::bar("Volume", dates.to_vec(), series.volumes(), colors, 0.8).on_row(row));
}

pub fn add_rsi(fig: &mut ChartFigure, row: usize, closes: &[f64], dates: &[String]) {
    fig.add_trace(
        Trace::line_with_gaps("RSI", dates.to_vec(), rsi(closes, RSI_WINDOW), LineStyle::new(theme::RSI_LINE, 2.0))
            .on_row(row),
    );
    fig.add_hline(row, RSI_OVERBOUGHT, LineStyle::new(theme::RSI_OVERBOUGHT, 1.0).dashed(LineDash::Dash));
    fig.add_hline(row, RSI_OVERSOLD, LineStyle::new(theme::RSI_OVERSOLD, 1.0).dashed(LineDash::Dash));
}

pub fn add_macd(fig: &mut ChartFigure, row: usize, closes: &[f64], dates: &[String]) {
    let result = macd(closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let colors = result
        .histogram
        .iter()
        .map(|v| (if *v >= 0.0 { theme::MACD_HIST_UP } else { theme::MACD_HIST_DOWN }).to_string())
        .collect();

    fig.add_trace(Trace::line("MACD", dates.to_vec(), result.macd_line, LineStyle::new(theme::MACD_LINE, 2.0)).on_row(row));
    fig.add_trace(
        Trace::line("Signal Line", dates.to_vec(), result.signal_line, LineStyle::new(theme::MACD_SIGNAL, 2.0))
            .on_row(row),
    );
    fig.add_trace(Trace::bar("Histogram", dates.to_vec(), result.histogram, colors, 0.7).on_row(row));
    fig.add_hline(row, 0.0, LineStyle::new(theme::ZERO_LINE, 1.0));
}
