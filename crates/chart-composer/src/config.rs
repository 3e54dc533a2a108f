use chart_core::{ChartError, Period};
use serde::{Deserialize, Deserializer, Serialize};
use technical_analysis::UserWaveAnchor;

/// What the price panel annotates. Trendlines are drawn by the client, so that
/// mode only suppresses the Fibonacci overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Fib,
    Trendlines,
}

/// Manual Fibonacci high as sent by clients: either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FibHigh {
    Number(f64),
    Text(String),
}

impl FibHigh {
    /// `Ok(None)` for a blank string, which means "use the period high".
    pub fn resolve(&self) -> Result<Option<f64>, ChartError> {
        let value = match self {
            FibHigh::Number(v) => *v,
            FibHigh::Text(s) if s.trim().is_empty() => return Ok(None),
            FibHigh::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ChartError::InvalidInput(format!("Invalid Fibonacci high: {}", s)))?,
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::InvalidInput(format!("Invalid Fibonacci high: {}", value)));
        }
        Ok(Some(value))
    }
}

/// Per-request chart options. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub period: Period,
    pub chart_mode: ChartMode,
    pub manual_fib: bool,
    pub fib_high: Option<FibHigh>,
    pub show_extensions: bool,
    pub show_fib: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub moving_averages: Vec<usize>,
    #[serde(deserialize_with = "null_as_default")]
    pub elliott_points: Vec<UserWaveAnchor>,
    pub show_elliott_auto_waves: bool,
    #[serde(rename = "showRSI")]
    pub show_rsi: bool,
    #[serde(rename = "showMACD")]
    pub show_macd: bool,
    pub show_volume: bool,
    pub show_candlestick: bool,
    pub include_financials: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            period: Period::default(),
            chart_mode: ChartMode::default(),
            manual_fib: false,
            fib_high: None,
            show_extensions: false,
            show_fib: false,
            moving_averages: Vec::new(),
            elliott_points: Vec::new(),
            show_elliott_auto_waves: false,
            show_rsi: false,
            show_macd: false,
            show_volume: false,
            show_candlestick: false,
            include_financials: true,
        }
    }
}

impl ChartOptions {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.moving_averages.contains(&0) {
            return Err(ChartError::invalid("Moving average period must be positive"));
        }
        self.manual_fib_high()?;
        Ok(())
    }

    /// The manual Fibonacci high, when manual mode is on and a value was given.
    pub fn manual_fib_high(&self) -> Result<Option<f64>, ChartError> {
        match (&self.fib_high, self.manual_fib) {
            (Some(high), true) => high.resolve(),
            _ => Ok(None),
        }
    }

    pub fn draws_fibonacci(&self) -> bool {
        self.chart_mode == ChartMode::Fib && self.show_fib
    }

    /// Any user anchor takes over the wave overlay from auto-detection, even
    /// a single one that is too short to draw.
    pub fn has_user_waves(&self) -> bool {
        !self.elliott_points.is_empty()
    }
}

/// Chart options for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub ticker: String,
    #[serde(flatten)]
    pub options: ChartOptions,
}

/// Tickers are ASCII letters and digits plus the `.-^=` used by share classes,
/// indices and futures/FX symbols.
pub fn validate_ticker(ticker: &str) -> Result<&str, ChartError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(ChartError::invalid("Please enter a valid ticker symbol"));
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(ChartError::InvalidInput(format!("Invalid ticker symbol: {}", ticker)));
    }
    Ok(ticker)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
