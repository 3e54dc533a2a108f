//! Forward Fibonacci targets for the next wave of a partially drawn impulse.

use chart_core::{ChartError, DATE_FORMAT};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const WAVE2_RETRACEMENTS: [f64; 4] = [0.5, 0.618, 0.764, 0.854];
pub const WAVE3_EXTENSIONS: [f64; 6] = [1.0, 1.236, 1.382, 1.618, 2.0, 2.618];
pub const WAVE4_RETRACEMENTS: [f64; 6] = [0.146, 0.236, 0.382, 0.5, 0.618, 0.764];
pub const WAVE5_WAVE4_EXTENSIONS: [f64; 3] = [1.0, 1.236, 1.618];
/// Wave 5 target as a fraction of the wave 0 to wave 3 span
pub const WAVE5_COMBINED_RATIO: f64 = 0.618;
/// How far past the chart projection rays extend, so they survive panning
pub const PROJECTION_HORIZON_DAYS: i64 = 365;

const MAX_LABELLED_ANCHORS: usize = 6;
const ANCHOR_LABELS: [&str; MAX_LABELLED_ANCHORS] = ["0", "1", "2", "3", "4", "5"];

/// A wave point placed by the user on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWaveAnchor {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Up,
    Down,
}

/// Whether a projected wave moves with the trend or against it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelRole {
    Corrective,
    Impulsive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectionMethod {
    Retracement,
    Extension,
    EqualToWave1,
    WavesOneToThree,
    Wave4Extension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedLevel {
    /// Wave being projected (2..=5)
    pub wave: u8,
    pub method: ProjectionMethod,
    pub role: LevelRole,
    pub ratio: f64,
    pub price: f64,
    /// Short text drawn at the end of the ray
    pub label: String,
    /// Legend entry
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveProjection {
    pub anchors: Vec<UserWaveAnchor>,
    pub labels: Vec<&'static str>,
    pub direction: TrendDirection,
    pub levels: Vec<ProjectedLevel>,
    /// Rays run from the last anchor to this date
    pub horizon: String,
}

impl WaveProjection {
    pub fn ray_start(&self) -> &str {
        &self.anchors[self.anchors.len() - 1].x
    }

    /// Six or more anchors describe a finished impulse.
    pub fn is_complete(&self) -> bool {
        self.anchors.len() >= MAX_LABELLED_ANCHORS
    }
}

/// Parse an anchor date: plain dates plus the datetime shapes chart clients send.
pub fn parse_anchor_date(x: &str) -> Result<NaiveDate, ChartError> {
    let x = x.trim();
    if let Ok(date) = NaiveDate::parse_from_str(x, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(x) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(x, fmt) {
            return Ok(dt.date());
        }
    }
    Err(ChartError::InvalidInput(format!("Invalid Elliott wave point date: {}", x)))
}

/// Project the next wave from user anchors.
///
/// Returns `Ok(None)` when fewer than two anchors are given. `chart_end` is the
/// last date on the chart; rays extend a year past it or past the last anchor,
/// whichever is later.
pub fn project_waves(
    anchors: &[UserWaveAnchor],
    chart_end: Option<NaiveDate>,
) -> Result<Option<WaveProjection>, ChartError> {
    if anchors.len() < 2 {
        return Ok(None);
    }

    let mut last_anchor_date = NaiveDate::MIN;
    for anchor in anchors {
        if !anchor.y.is_finite() {
            return Err(ChartError::InvalidInput(format!(
                "Invalid Elliott wave point price at {}",
                anchor.x
            )));
        }
        last_anchor_date = parse_anchor_date(&anchor.x)?;
    }
    let last_date = chart_end.map_or(last_anchor_date, |end| end.max(last_anchor_date));
    let horizon = last_date
        .checked_add_signed(Duration::days(PROJECTION_HORIZON_DAYS))
        .ok_or_else(|| ChartError::InvalidInput(format!("Elliott wave point date {} is out of range", last_date)))?
        .format(DATE_FORMAT)
        .to_string();

    let y: Vec<f64> = anchors.iter().map(|a| a.y).collect();
    let direction = if y[1] - y[0] > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };
    let levels = project_levels(&y, direction);

    tracing::debug!(
        "Projected {} levels from {} wave anchors ({:?})",
        levels.len(),
        anchors.len(),
        direction
    );

    Ok(Some(WaveProjection {
        anchors: anchors.to_vec(),
        labels: ANCHOR_LABELS.iter().take(anchors.len()).copied().collect(),
        direction,
        levels,
        horizon,
    }))
}

/// Target prices for the next wave given anchor prices `y` (at least two).
pub fn project_levels(y: &[f64], direction: TrendDirection) -> Vec<ProjectedLevel> {
    // Moves with the trend add, moves against it subtract; downtrends mirror both
    let sign = match direction {
        TrendDirection::Up => 1.0,
        TrendDirection::Down => -1.0,
    };
    let wave1_len = (y[1] - y[0]).abs();

    match y.len() {
        2 => WAVE2_RETRACEMENTS
            .iter()
            .map(|&r| {
                let pct = r * 100.0;
                ProjectedLevel {
                    wave: 2,
                    method: ProjectionMethod::Retracement,
                    role: LevelRole::Corrective,
                    ratio: r,
                    price: y[1] - sign * r * wave1_len,
                    label: format!("W2 {:.1}%", pct),
                    name: format!("W2 {:.1}% Retr.", pct),
                }
            })
            .collect(),
        3 => WAVE3_EXTENSIONS
            .iter()
            .map(|&r| {
                let pct = r * 100.0;
                ProjectedLevel {
                    wave: 3,
                    method: ProjectionMethod::Extension,
                    role: LevelRole::Impulsive,
                    ratio: r,
                    price: y[2] + sign * r * wave1_len,
                    label: format!("W3 {:.1}%", pct),
                    name: format!("W3 {:.1}% Ext.", pct),
                }
            })
            .collect(),
        4 => {
            let wave3_len = (y[3] - y[2]).abs();
            WAVE4_RETRACEMENTS
                .iter()
                .map(|&r| {
                    let pct = r * 100.0;
                    ProjectedLevel {
                        wave: 4,
                        method: ProjectionMethod::Retracement,
                        role: LevelRole::Corrective,
                        ratio: r,
                        price: y[3] - sign * r * wave3_len,
                        label: format!("W4 {:.1}%", pct),
                        name: format!("W4 {:.1}% Retr.", pct),
                    }
                })
                .collect()
        }
        5 => {
            let wave4_end = y[4];
            let waves13_len = (y[3] - y[0]).abs();
            let wave4_len = (y[4] - y[3]).abs();

            let mut levels = vec![
                wave5_level(ProjectionMethod::EqualToWave1, 1.0, wave4_end + sign * wave1_len, "W5 = W1".to_string()),
                wave5_level(
                    ProjectionMethod::WavesOneToThree,
                    WAVE5_COMBINED_RATIO,
                    wave4_end + sign * WAVE5_COMBINED_RATIO * waves13_len,
                    "W5 61.8% W1+3".to_string(),
                ),
            ];
            levels.extend(WAVE5_WAVE4_EXTENSIONS.iter().map(|&r| {
                wave5_level(
                    ProjectionMethod::Wave4Extension,
                    r,
                    wave4_end + sign * r * wave4_len,
                    format!("W5 {:.1}% W4", r * 100.0),
                )
            }));
            levels
        }
        _ => vec![],
    }
}

fn wave5_level(method: ProjectionMethod, ratio: f64, price: f64, label: String) -> ProjectedLevel {
    ProjectedLevel {
        wave: 5,
        method,
        role: LevelRole::Impulsive,
        ratio,
        price,
        name: label.clone(),
        label,
    }
}
