use anyhow::{Context, Result};
use chart_core::Period;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Directory holding `<TICKER>.bars.json` and `<TICKER>.fundamentals.json`
    pub data_dir: PathBuf,
    /// Period used when no request file is given
    pub default_period: Period,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup("CHART_DATA_DIR").unwrap_or_else(|| "./data".to_string());
        let default_period = lookup("CHART_DEFAULT_PERIOD")
            .unwrap_or_else(|| "1Y".to_string())
            .parse::<Period>()
            .context("CHART_DEFAULT_PERIOD must be one of 1M, 3M, 6M, 1Y, 5Y")?;

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            default_period,
        })
    }
}
