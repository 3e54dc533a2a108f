//! Overlays drawn on the price panel.

use chart_core::{ChartError, PriceSeries};
use chrono::NaiveDate;
use technical_analysis::{
    fibonacci_levels, find_wave_patterns, moving_average, project_waves, DetectorParams, FibLevelKind,
    UserWaveAnchor, WavePattern,
};

use crate::layout::{Annotation, ChartFigure, LineDash, LineStyle, Trace, TraceKind};
use crate::theme;

const PRICE_ROW: usize = 1;

/// Moving averages longer than this are drawn dotted
const DOTTED_MA_ABOVE: usize = 50;

pub fn add_price_trace(fig: &mut ChartFigure, series: &PriceSeries, dates: &[String], candlestick: bool) {
    let trace = if candlestick {
        Trace {
            name: "Price".to_string(),
            row: PRICE_ROW,
            kind: TraceKind::Candlestick {
                x: dates.to_vec(),
                open: series.opens(),
                high: series.highs(),
                low: series.lows(),
                close: series.closes(),
                increasing_color: theme::UP.to_string(),
                decreasing_color: theme::DOWN.to_string(),
            },
        }
    } else {
        Trace::line("Close Price", dates.to_vec(), series.closes(), LineStyle::new(theme::CLOSE_LINE, 2.0))
    };
    fig.add_trace(trace);
}

/// Full-width retracement lines between `high` and `low`, plus extensions above the high.
pub fn add_fibonacci_lines(fig: &mut ChartFigure, dates: &[String], high: f64, low: f64, show_extensions: bool) {
    let mut retracement = 0;
    let mut extension = 0;

    for level in fibonacci_levels(high, low, show_extensions) {
        let color = match level.kind {
            FibLevelKind::Retracement => {
                retracement += 1;
                theme::fib_color(retracement - 1, false)
            }
            FibLevelKind::Extension => {
                extension += 1;
                theme::fib_color(extension - 1, true)
            }
        };
        let name = match level.kind {
            FibLevelKind::Retracement => format!("{} - ${:.2}", level.label, level.price),
            FibLevelKind::Extension => format!("{:.1}% - ${:.2}", level.ratio * 100.0, level.price),
        };
        fig.add_trace(Trace::line(
            name,
            dates.to_vec(),
            vec![level.price; dates.len()],
            LineStyle::new(color, 1.0).dashed(LineDash::Dash),
        ));
    }
}

pub fn add_moving_averages(fig: &mut ChartFigure, dates: &[String], closes: &[f64], periods: &[usize]) {
    for (position, &period) in periods.iter().enumerate() {
        let dash = if period > DOTTED_MA_ABOVE { LineDash::Dot } else { LineDash::Solid };
        fig.add_trace(Trace::line(
            format!("MA{}", period),
            dates.to_vec(),
            moving_average(closes, period),
            LineStyle::new(theme::moving_average_color(period, position), 2.0).dashed(dash),
        ));
    }
}

/// Draw the most recent detected impulse and correction. Returns how many were drawn.
pub fn add_auto_waves(fig: &mut ChartFigure, dates: &[String], closes: &[f64]) -> usize {
    let patterns = find_wave_patterns(closes, &DetectorParams::default());
    let mut drawn = 0;

    if let Some(impulse) = patterns.latest_impulse() {
        draw_pattern(fig, dates, closes, impulse, "Impulse", LineStyle::new(theme::IMPULSE, 1.5));
        drawn += 1;
    }
    if let Some(correction) = patterns.latest_correction() {
        draw_pattern(
            fig,
            dates,
            closes,
            correction,
            "Correction",
            LineStyle::new(theme::CORRECTION, 1.5).dashed(LineDash::Dash),
        );
        drawn += 1;
    }
    drawn
}

fn draw_pattern(
    fig: &mut ChartFigure,
    dates: &[String],
    closes: &[f64],
    pattern: &WavePattern,
    name: &str,
    line: LineStyle,
) {
    let x: Vec<String> = pattern.points.iter().map(|p| dates[p.index].clone()).collect();
    let y = pattern.prices(closes);
    let color = line.color.clone();

    for ((x, y), label) in x.iter().zip(&y).zip(pattern.kind.labels()) {
        fig.annotate(Annotation::boxed(x, *y, label, &color, 10));
    }
    fig.add_trace(Trace::line(name, x, y, line));
}

/// Draw user-placed wave anchors and the projected targets for the next wave.
///
/// Fewer than two anchors draws nothing. `chart_end` is the last charted date.
pub fn add_user_waves(
    fig: &mut ChartFigure,
    anchors: &[UserWaveAnchor],
    chart_end: Option<NaiveDate>,
) -> Result<(), ChartError> {
    let Some(projection) = project_waves(anchors, chart_end)? else {
        return Ok(());
    };

    let x: Vec<String> = projection.anchors.iter().map(|a| a.x.clone()).collect();
    let y: Vec<f64> = projection.anchors.iter().map(|a| a.y).collect();
    fig.add_trace(Trace::line("User Elliott Waves", x, y, LineStyle::new(theme::USER_WAVES, 2.0)).with_markers());

    for (anchor, label) in projection.anchors.iter().zip(&projection.labels) {
        fig.annotate(Annotation::boxed(&anchor.x, anchor.y, label, theme::USER_WAVES, 12));
    }

    let start = projection.ray_start();
    for level in &projection.levels {
        let color = theme::projection_color(level.role, projection.direction);
        fig.add_trace(Trace::level(
            level.name.clone(),
            start,
            &projection.horizon,
            level.price,
            LineStyle::new(color, 1.0).dashed(LineDash::Dash),
        ));
        fig.annotate(Annotation::label(
            &projection.horizon,
            level.price,
            &level.label,
            theme::PROJECTION_LABEL,
            10,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::layout::{LineMode, XAnchor};

    fn dates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("2024-01-{:02}", i + 1)).collect()
    }

    fn anchors(points: &[(&str, f64)]) -> Vec<UserWaveAnchor> {
        points.iter().map(|(x, y)| UserWaveAnchor { x: x.to_string(), y: *y }).collect()
    }

    fn line_y(trace: &Trace) -> Vec<Option<f64>> {
        match &trace.kind {
            TraceKind::Line { y, .. } => y.clone(),
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_fibonacci_names_and_colors() {
        let mut fig = ChartFigure::new("T", false, false, false);
        add_fibonacci_lines(&mut fig, &dates(3), 200.0, 100.0, true);

        assert_eq!(fig.traces.len(), 11);
        assert_eq!(fig.traces[0].name, "0% - $200.00");
        assert_eq!(fig.traces[4].name, "61.8% - $138.20");
        assert_eq!(fig.traces[6].name, "100% - $100.00");
        assert_eq!(fig.traces[7].name, "127.2% - $227.20");
        match &fig.traces[4].kind {
            TraceKind::Line { line, y, .. } => {
                assert_eq!(line.color, "rgba(0, 0, 255, 0.7)");
                assert_eq!(line.dash, LineDash::Dash);
                assert_eq!(y.len(), 3);
            }
            _ => panic!("fib level must be a line"),
        }
    }

    #[test]
    fn test_moving_average_styles() {
        let mut fig = ChartFigure::new("T", false, false, false);
        let closes = vec![1.0, 2.0, 3.0, 4.0];
        add_moving_averages(&mut fig, &dates(4), &closes, &[20, 200]);

        let ma20 = fig.trace("MA20").unwrap();
        let ma200 = fig.trace("MA200").unwrap();
        match (&ma20.kind, &ma200.kind) {
            (TraceKind::Line { line: short, .. }, TraceKind::Line { line: long, .. }) => {
                assert_eq!(short.dash, LineDash::Solid);
                assert_eq!(long.dash, LineDash::Dot);
                assert_eq!(long.color, "#DDA0DD");
            }
            _ => panic!("moving averages must be lines"),
        }
        assert_eq!(line_y(ma20)[1], Some(1.5));
    }

    #[test]
    fn test_single_anchor_draws_nothing() {
        let mut fig = ChartFigure::new("T", false, false, false);
        add_user_waves(&mut fig, &anchors(&[("2024-01-02", 100.0)]), None).unwrap();
        assert!(fig.traces.is_empty());
        assert!(fig.annotations.is_empty());
    }

    #[test]
    fn test_two_anchor_projection() {
        let mut fig = ChartFigure::new("T", false, false, false);
        let chart_end = NaiveDate::from_ymd_opt(2024, 3, 1);
        add_user_waves(&mut fig, &anchors(&[("2024-01-02", 100.0), ("2024-02-01", 120.0)]), chart_end).unwrap();

        let path = fig.trace("User Elliott Waves").unwrap();
        assert!(matches!(path.kind, TraceKind::Line { mode: LineMode::LinesMarkers, .. }));

        let level = fig.trace("W2 61.8% Retr.").unwrap();
        match &level.kind {
            TraceKind::Line { x, y, line, .. } => {
                assert_eq!(x, &vec!["2024-02-01".to_string(), "2025-03-01".to_string()]);
                assert_relative_eq!(y[0].unwrap(), 107.64, epsilon = 1e-9);
                assert_eq!(line.color, "red");
            }
            _ => panic!("projection must be a line"),
        }

        // Two anchor labels plus one label per projected level
        assert_eq!(fig.annotations.len(), 2 + 4);
        let target_label = fig.annotations.iter().find(|a| a.text == "W2 61.8%").unwrap();
        assert_eq!(target_label.x_anchor, XAnchor::Left);
        assert!(!target_label.boxed);
    }

    #[test]
    fn test_downtrend_wave3_is_red() {
        let mut fig = ChartFigure::new("T", false, false, false);
        let points = anchors(&[("2024-01-02", 120.0), ("2024-02-01", 100.0), ("2024-03-01", 110.0)]);
        add_user_waves(&mut fig, &points, None).unwrap();

        match &fig.trace("W3 100.0% Ext.").unwrap().kind {
            TraceKind::Line { y, line, .. } => {
                assert_relative_eq!(y[0].unwrap(), 90.0, epsilon = 1e-9);
                assert_eq!(line.color, "red");
            }
            _ => panic!("projection must be a line"),
        }
    }

    #[test]
    fn test_malformed_anchor_is_invalid_input() {
        let mut fig = ChartFigure::new("T", false, false, false);
        let err = add_user_waves(&mut fig, &anchors(&[("yesterday", 1.0), ("today", 2.0)]), None).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_auto_waves_on_flat_series() {
        let mut fig = ChartFigure::new("T", false, false, false);
        let closes = vec![50.0; 40];
        assert_eq!(add_auto_waves(&mut fig, &dates(40), &closes), 0);
        assert!(fig.traces.is_empty());
    }
}
