//! Colors used across the chart.

use technical_analysis::{LevelRole, TrendDirection};

pub const CLOSE_LINE: &str = "#0ac775";
pub const UP: &str = "#22c55e";
pub const DOWN: &str = "#ef4444";

pub const RSI_LINE: &str = "#9C27B0";
pub const RSI_OVERBOUGHT: &str = "red";
pub const RSI_OVERSOLD: &str = "green";

pub const MACD_LINE: &str = "#2196F3";
pub const MACD_SIGNAL: &str = "#FF5722";
pub const MACD_HIST_UP: &str = "#4CAF50";
pub const MACD_HIST_DOWN: &str = "#F44336";
pub const ZERO_LINE: &str = "gray";

pub const IMPULSE: &str = "blue";
pub const CORRECTION: &str = "red";
pub const USER_WAVES: &str = "purple";
pub const PROJECTION_LABEL: &str = "purple";

/// Retracement colors in ratio order 0 .. 1
pub const FIB_RETRACEMENT: [&str; 7] = [
    "rgba(255, 0, 0, 0.7)",
    "rgba(255, 165, 0, 0.7)",
    "rgba(255, 255, 0, 0.7)",
    "rgba(0, 128, 0, 0.7)",
    "rgba(0, 0, 255, 0.7)",
    "rgba(128, 0, 128, 0.7)",
    "rgba(255, 0, 0, 0.7)",
];
pub const FIB_EXTENSION: [&str; 4] = ["#FF6666", "#FF8888", "#FFAAAA", "#FFC0CB"];

const MA_BY_PERIOD: [(usize, &str); 6] = [
    (5, "#FF6B6B"),
    (10, "#4ECDC4"),
    (20, "#45B7D1"),
    (50, "#96CEB4"),
    (100, "#FFEAA7"),
    (200, "#DDA0DD"),
];
const MA_FALLBACK: [&str; 5] = ["#FF8C42", "#6A4C93", "#C44569", "#F8B500", "#38A3A5"];

/// Well-known periods have fixed colors; others cycle by their position in the request.
pub fn moving_average_color(period: usize, position: usize) -> &'static str {
    MA_BY_PERIOD
        .iter()
        .find(|(p, _)| *p == period)
        .map(|(_, color)| *color)
        .unwrap_or(MA_FALLBACK[position % MA_FALLBACK.len()])
}

pub fn fib_color(index: usize, extension: bool) -> &'static str {
    let palette: &[&'static str] = if extension { &FIB_EXTENSION } else { &FIB_RETRACEMENT };
    palette[index % palette.len()]
}

/// Pullbacks against the trend are red in an uptrend; moves with the trend are green.
pub fn projection_color(role: LevelRole, direction: TrendDirection) -> &'static str {
    match (role, direction) {
        (LevelRole::Corrective, TrendDirection::Up) | (LevelRole::Impulsive, TrendDirection::Down) => "red",
        (LevelRole::Corrective, TrendDirection::Down) | (LevelRole::Impulsive, TrendDirection::Up) => "green",
    }
}
