use chart_core::numeric::mean;
use serde::Serialize;

/// Default RSI lookback
pub const RSI_WINDOW: usize = 14;
/// Default MACD spans (fast, slow, signal)
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Fibonacci retracement ratios, measured down from the high
pub const RETRACEMENT_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
/// Fibonacci extension ratios, projected above the high
pub const EXTENSION_RATIOS: [f64; 4] = [1.272, 1.382, 1.618, 2.618];

/// Moving average with an expanding window for the first `period - 1` points.
///
/// Output is aligned with the input and never undefined.
pub fn moving_average(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(period);
        result.push(mean(&data[start..=i]));
    }
    result
}

/// Exponential Moving Average
///
/// Seeded from the first value with no bias correction: `ema[0] = data[0]`,
/// `ema[i] = alpha * data[i] + (1 - alpha) * ema[i - 1]`, `alpha = 2 / (span + 1)`.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let ema_val = alpha * data[i] + (1.0 - alpha) * result[i - 1];
        result.push(ema_val);
    }

    result
}

/// Relative Strength Index using simple rolling means of gains and losses.
///
/// The first `window` entries are `None`. A window with no losses saturates at 100.
pub fn rsi(data: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut rsi_values = vec![None; data.len()];
    if window == 0 || data.len() <= window {
        return rsi_values;
    }

    let mut gains = vec![0.0; data.len()];
    let mut losses = vec![0.0; data.len()];
    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    for i in window..data.len() {
        let avg_gain = mean(&gains[i + 1 - window..=i]);
        let avg_loss = mean(&losses[i + 1 - window..=i]);

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        rsi_values[i] = Some(value);
    }

    rsi_values
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, Serialize)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// All three output series are aligned with `data`.
pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0 || slow_period == 0 || signal_period == 0 || data.is_empty() {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, signal_period);
    let histogram = macd_line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FibLevelKind {
    Retracement,
    Extension,
}

/// One horizontal Fibonacci level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibLevel {
    pub kind: FibLevelKind,
    pub ratio: f64,
    pub price: f64,
    /// Ratio as a percentage, e.g. "61.8%"
    pub label: String,
}

/// Retracement levels between `high` and `low`, optionally followed by extensions.
///
/// A flat range (`high == low`) collapses every level onto that price.
pub fn fibonacci_levels(high: f64, low: f64, with_extensions: bool) -> Vec<FibLevel> {
    let price_range = high - low;

    let mut levels: Vec<FibLevel> = RETRACEMENT_RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            kind: FibLevelKind::Retracement,
            ratio,
            price: high - ratio * price_range,
            label: ratio_label(ratio),
        })
        .collect();

    if with_extensions {
        levels.extend(EXTENSION_RATIOS.iter().map(|&ratio| FibLevel {
            kind: FibLevelKind::Extension,
            ratio,
            price: high + (ratio - 1.0) * price_range,
            label: ratio_label(ratio),
        }));
    }

    levels
}

fn ratio_label(ratio: f64) -> String {
    let pct = ratio * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}
