use serde::Serialize;

use crate::waves::{detect_extrema, DetectorParams, ExtremumPoint};

/// Wave 3 must reach this fraction of the longer of waves 1 and 5
pub const WAVE3_MIN_RATIO: f64 = 0.8;
/// Wave 2 retracement of wave 1: [min, max)
pub const WAVE2_RETRACE_MIN: f64 = 0.30;
pub const WAVE2_RETRACE_MAX: f64 = 1.0;
/// Wave 4 retracement of wave 3: [min, max)
pub const WAVE4_RETRACE_MIN: f64 = 0.20;
pub const WAVE4_RETRACE_MAX: f64 = 0.50;
/// Wave C relative to wave A: [min, max]
pub const WAVE_C_RATIO_MIN: f64 = 0.618;
pub const WAVE_C_RATIO_MAX: f64 = 1.618;
/// Wave B retracement of wave A: [min, max]
pub const WAVE_B_RETRACE_MIN: f64 = 0.38;
pub const WAVE_B_RETRACE_MAX: f64 = 0.78;

pub const IMPULSE_POINTS: usize = 6;
pub const CORRECTION_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaveKind {
    /// Five waves with the trend (0-1-2-3-4-5)
    Impulse,
    /// Three waves against it (0-A-B-C)
    Correction,
}

impl WaveKind {
    pub fn point_count(&self) -> usize {
        match self {
            WaveKind::Impulse => IMPULSE_POINTS,
            WaveKind::Correction => CORRECTION_POINTS,
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            WaveKind::Impulse => &["0", "1", "2", "3", "4", "5"],
            WaveKind::Correction => &["0", "A", "B", "C"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WavePattern {
    pub kind: WaveKind,
    pub points: Vec<ExtremumPoint>,
    pub start: usize,
    pub end: usize,
}

impl WavePattern {
    fn new(kind: WaveKind, points: &[ExtremumPoint]) -> Self {
        Self {
            kind,
            points: points.to_vec(),
            start: points[0].index,
            end: points[points.len() - 1].index,
        }
    }

    /// Close prices at each pattern point
    pub fn prices(&self, closes: &[f64]) -> Vec<f64> {
        self.points.iter().map(|p| closes[p.index]).collect()
    }
}

/// Confirmed patterns in scan order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WavePatterns {
    pub impulses: Vec<WavePattern>,
    pub corrections: Vec<WavePattern>,
}

impl WavePatterns {
    pub fn latest_impulse(&self) -> Option<&WavePattern> {
        self.impulses.last()
    }

    pub fn latest_correction(&self) -> Option<&WavePattern> {
        self.corrections.last()
    }

    pub fn is_empty(&self) -> bool {
        self.impulses.is_empty() && self.corrections.is_empty()
    }
}

/// Check a 0-1-2-3-4-5 price path against the impulse rules.
pub fn is_valid_impulse(p: &[f64]) -> bool {
    if p.len() != IMPULSE_POINTS {
        return false;
    }
    let is_up = p[5] > p[0];
    let w: Vec<f64> = p.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let (motive_ok, overlap) = if is_up {
        (
            w[0] > 0.0 && w[2] > 0.0 && w[4] > 0.0 && w[1] < 0.0 && w[3] < 0.0,
            p[4] < p[1],
        )
    } else {
        (
            w[0] < 0.0 && w[2] < 0.0 && w[4] < 0.0 && w[1] > 0.0 && w[3] > 0.0,
            p[4] > p[1],
        )
    };
    if !motive_ok {
        return false;
    }

    let (w1, w2, w3, w4, w5) = (w[0].abs(), w[1].abs(), w[2].abs(), w[3].abs(), w[4].abs());

    if w3 < WAVE3_MIN_RATIO * w1.max(w5) {
        return false;
    }

    let retrace2 = w2 / w1;
    if !(WAVE2_RETRACE_MIN..WAVE2_RETRACE_MAX).contains(&retrace2) {
        return false;
    }

    let retrace4 = w4 / w3;
    if !(WAVE4_RETRACE_MIN..WAVE4_RETRACE_MAX).contains(&retrace4) {
        return false;
    }

    !overlap
}

/// Check a 0-A-B-C price path against the correction rules.
pub fn is_valid_correction(p: &[f64]) -> bool {
    if p.len() != CORRECTION_POINTS {
        return false;
    }
    let is_down = p[3] < p[0];
    let w: Vec<f64> = p.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let signs_ok = if is_down {
        w[0] < 0.0 && w[2] < 0.0 && w[1] > 0.0
    } else {
        w[0] > 0.0 && w[2] > 0.0 && w[1] < 0.0
    };
    if !signs_ok {
        return false;
    }

    let (a, b, c) = (w[0].abs(), w[1].abs(), w[2].abs());

    let ratio_c = c / a;
    if !(WAVE_C_RATIO_MIN..=WAVE_C_RATIO_MAX).contains(&ratio_c) {
        return false;
    }

    let retrace_b = b / a;
    (WAVE_B_RETRACE_MIN..=WAVE_B_RETRACE_MAX).contains(&retrace_b)
}

pub fn validate_impulse(closes: &[f64], points: &[ExtremumPoint]) -> bool {
    points.len() == IMPULSE_POINTS && is_valid_impulse(&prices_at(closes, points))
}

pub fn validate_correction(closes: &[f64], points: &[ExtremumPoint]) -> bool {
    points.len() == CORRECTION_POINTS && is_valid_correction(&prices_at(closes, points))
}

fn prices_at(closes: &[f64], points: &[ExtremumPoint]) -> Vec<f64> {
    points.iter().map(|p| closes[p.index]).collect()
}

fn alternates(points: &[ExtremumPoint]) -> bool {
    points.windows(2).all(|w| w[0].kind != w[1].kind)
}

/// Position of the greedy scan over the merged extrema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Try a 6-point impulse starting here
    ScanningForImpulse(usize),
    /// Try a 4-point correction starting here
    ScanningForCorrection(usize),
    Done,
}

/// Greedy impulse/correction matcher over time-ordered extrema.
pub struct PatternMatcher<'a> {
    closes: &'a [f64],
    extrema: &'a [ExtremumPoint],
    state: ScanState,
    found: WavePatterns,
}

impl<'a> PatternMatcher<'a> {
    pub fn new(closes: &'a [f64], extrema: &'a [ExtremumPoint]) -> Self {
        Self {
            closes,
            extrema,
            state: ScanState::ScanningForImpulse(0),
            found: WavePatterns::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    fn window(&self, start: usize, len: usize) -> Option<&'a [ExtremumPoint]> {
        let extrema: &'a [ExtremumPoint] = self.extrema;
        let window = extrema.get(start..start + len)?;
        alternates(window).then_some(window)
    }

    /// Advance the scan by one transition.
    pub fn step(&mut self) -> ScanState {
        self.state = match self.state {
            ScanState::ScanningForImpulse(i) => {
                // Nothing shorter than a correction can match
                if i + CORRECTION_POINTS > self.extrema.len() {
                    ScanState::Done
                } else {
                    match self.window(i, IMPULSE_POINTS) {
                        Some(points) if validate_impulse(self.closes, points) => {
                            self.found.impulses.push(WavePattern::new(WaveKind::Impulse, points));
                            // The correction may start on wave 5's endpoint
                            ScanState::ScanningForCorrection(i + IMPULSE_POINTS - 1)
                        }
                        _ => ScanState::ScanningForCorrection(i),
                    }
                }
            }
            ScanState::ScanningForCorrection(i) => match self.window(i, CORRECTION_POINTS) {
                Some(points) if validate_correction(self.closes, points) => {
                    self.found
                        .corrections
                        .push(WavePattern::new(WaveKind::Correction, points));
                    ScanState::ScanningForImpulse(i + CORRECTION_POINTS)
                }
                _ => ScanState::ScanningForImpulse(i + 1),
            },
            ScanState::Done => ScanState::Done,
        };
        self.state
    }

    pub fn run(mut self) -> WavePatterns {
        while self.step() != ScanState::Done {}
        tracing::debug!(
            "Matched {} impulses and {} corrections from {} extrema",
            self.found.impulses.len(),
            self.found.corrections.len(),
            self.extrema.len()
        );
        self.found
    }
}

/// Scan merged extrema for impulse and correction patterns.
pub fn identify_wave_patterns(closes: &[f64], extrema: &[ExtremumPoint]) -> WavePatterns {
    PatternMatcher::new(closes, extrema).run()
}

/// Detect extrema in `closes` and match wave patterns over them.
pub fn find_wave_patterns(closes: &[f64], params: &DetectorParams) -> WavePatterns {
    let extrema = detect_extrema(closes, params).merged();
    identify_wave_patterns(closes, &extrema)
}
