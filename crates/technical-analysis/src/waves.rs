//! Peak and trough detection on a smoothed, normalized close series.

use chart_core::numeric::min_max_normalize;
use serde::Serialize;

/// Smoothing span applied before extremum detection
pub const SMOOTHING_SPAN: usize = 3;
/// Minimum prominence on the normalized [0, 1] scale
pub const DEFAULT_PROMINENCE: f64 = 0.02;
const NORMALIZE_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ExtremumKind {
    Peak,
    Trough,
}

/// A detected turning point, indexed into the close series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtremumPoint {
    pub index: usize,
    pub kind: ExtremumKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Minimum index separation between two peaks (or two troughs).
    /// `None` adapts to the series: `max(5, len / 40)`.
    pub min_distance: Option<usize>,
    pub prominence: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_distance: None,
            prominence: DEFAULT_PROMINENCE,
        }
    }
}

impl DetectorParams {
    pub fn distance_for(&self, len: usize) -> usize {
        self.min_distance.unwrap_or_else(|| (len / 40).max(5)).max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extrema {
    pub peaks: Vec<usize>,
    pub troughs: Vec<usize>,
}

impl Extrema {
    /// Peaks and troughs merged in index order.
    pub fn merged(&self) -> Vec<ExtremumPoint> {
        let mut points: Vec<ExtremumPoint> = self
            .peaks
            .iter()
            .map(|&index| ExtremumPoint { index, kind: ExtremumKind::Peak })
            .chain(
                self.troughs
                    .iter()
                    .map(|&index| ExtremumPoint { index, kind: ExtremumKind::Trough }),
            )
            .collect();
        points.sort_by_key(|p| (p.index, p.kind));
        points
    }
}

/// Find peaks and troughs of `closes`.
pub fn detect_extrema(closes: &[f64], params: &DetectorParams) -> Extrema {
    if closes.len() < 3 {
        return Extrema::default();
    }

    let smoothed = smooth(closes, SMOOTHING_SPAN);
    let normalized = min_max_normalize(&smoothed, NORMALIZE_EPSILON);
    let inverted: Vec<f64> = normalized.iter().map(|v| -v).collect();
    let distance = params.distance_for(closes.len());

    let extrema = Extrema {
        peaks: find_peaks(&normalized, distance, params.prominence),
        troughs: find_peaks(&inverted, distance, params.prominence),
    };
    tracing::debug!(
        "Detected {} peaks and {} troughs over {} points (distance {})",
        extrema.peaks.len(),
        extrema.troughs.len(),
        closes.len(),
        distance
    );
    extrema
}

/// Exponentially weighted mean with adjusted weights.
///
/// Each output is `sum((1-a)^k * x[t-k]) / sum((1-a)^k)`, so early points are
/// not biased toward the first value.
pub fn smooth(data: &[f64], span: usize) -> Vec<f64> {
    if data.is_empty() || span == 0 {
        return data.to_vec();
    }
    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    data.iter()
        .map(|&x| {
            numerator = x + decay * numerator;
            denominator = 1.0 + decay * denominator;
            numerator / denominator
        })
        .collect()
}

/// Local maxima filtered by minimum separation and then by prominence.
///
/// Flat tops report their middle index.
pub fn find_peaks(data: &[f64], distance: usize, min_prominence: f64) -> Vec<usize> {
    let candidates = local_maxima(data);
    let spaced = select_by_distance(data, &candidates, distance);
    spaced
        .into_iter()
        .filter(|&peak| prominence(data, peak) >= min_prominence)
        .collect()
}

fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if data.len() < 3 {
        return maxima;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }
            if data[ahead] < data[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

fn select_by_distance(data: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }

    let mut keep = vec![true; peaks.len()];
    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| {
        data[peaks[a]]
            .partial_cmp(&data[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Tallest first; a kept peak suppresses neighbours that are too close
    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Vertical drop from `peak` to the higher of the two lowest points reached
/// before the series climbs above the peak on each side.
fn prominence(data: &[f64], peak: usize) -> f64 {
    let height = data[peak];

    let mut left_min = height;
    for &value in data[..=peak].iter().rev() {
        if value > height {
            break;
        }
        left_min = left_min.min(value);
    }

    let mut right_min = height;
    for &value in &data[peak..] {
        if value > height {
            break;
        }
        right_min = right_min.min(value);
    }

    height - left_min.max(right_min)
}
