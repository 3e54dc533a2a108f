//! Renderer-neutral chart description: stacked panels sharing one date axis,
//! with traces, annotations and horizontal reference lines assigned to panels.

use serde::Serialize;

pub const PRICE_PANEL_WEIGHT: f64 = 1.0;
pub const INDICATOR_PANEL_WEIGHT: f64 = 0.2;
pub const VERTICAL_SPACING: f64 = 0.05;
pub const BASE_HEIGHT: u32 = 600;
pub const INDICATOR_PANEL_HEIGHT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Price,
    Volume,
    Rsi,
    Macd,
}

impl PanelKind {
    fn y_title(&self) -> &'static str {
        match self {
            PanelKind::Price => "Price (USD)",
            PanelKind::Volume => "Volume",
            PanelKind::Rsi => "RSI",
            PanelKind::Macd => "MACD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub kind: PanelKind,
    /// 1-based, top to bottom
    pub row: usize,
    /// Fraction of the plot height; all panels sum to 1
    pub height: f64,
    pub y_title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
    pub show_grid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub dash: LineDash,
}

impl LineStyle {
    pub fn new(color: &str, width: f64) -> Self {
        Self { color: color.to_string(), width, dash: LineDash::Solid }
    }

    pub fn dashed(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    Lines,
    LinesMarkers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceKind {
    Line {
        x: Vec<String>,
        /// `None` where the series is undefined
        y: Vec<Option<f64>>,
        mode: LineMode,
        line: LineStyle,
    },
    Candlestick {
        x: Vec<String>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        increasing_color: String,
        decreasing_color: String,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        /// One color per bar
        colors: Vec<String>,
        opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub row: usize,
    #[serde(flatten)]
    pub kind: TraceKind,
}

impl Trace {
    pub fn line(name: impl Into<String>, x: Vec<String>, y: Vec<f64>, line: LineStyle) -> Self {
        Self::line_with_gaps(name, x, y.into_iter().map(Some).collect(), line)
    }

    pub fn line_with_gaps(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>, line: LineStyle) -> Self {
        Self {
            name: name.into(),
            row: 1,
            kind: TraceKind::Line { x, y, mode: LineMode::Lines, line },
        }
    }

    /// Horizontal segment at `y` between two dates.
    pub fn level(name: impl Into<String>, from: &str, to: &str, y: f64, line: LineStyle) -> Self {
        Self::line(name, vec![from.to_string(), to.to_string()], vec![y, y], line)
    }

    pub fn bar(name: impl Into<String>, x: Vec<String>, y: Vec<f64>, colors: Vec<String>, opacity: f64) -> Self {
        Self {
            name: name.into(),
            row: 1,
            kind: TraceKind::Bar { x, y, colors, opacity },
        }
    }

    pub fn with_markers(mut self) -> Self {
        if let TraceKind::Line { mode, .. } = &mut self.kind {
            *mode = LineMode::LinesMarkers;
        }
        self
    }

    pub fn on_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XAnchor {
    Left,
    Center,
}

/// Text pinned to a data coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub x: String,
    pub y: f64,
    pub text: String,
    pub row: usize,
    pub color: String,
    pub font_size: u32,
    /// Drawn inside a white box outlined in `color`
    pub boxed: bool,
    pub x_anchor: XAnchor,
}

impl Annotation {
    pub fn boxed(x: &str, y: f64, text: &str, color: &str, font_size: u32) -> Self {
        Self {
            x: x.to_string(),
            y,
            text: text.to_string(),
            row: 1,
            color: color.to_string(),
            font_size,
            boxed: true,
            x_anchor: XAnchor::Center,
        }
    }

    pub fn label(x: &str, y: f64, text: &str, color: &str, font_size: u32) -> Self {
        Self {
            boxed: false,
            x_anchor: XAnchor::Left,
            ..Self::boxed(x, y, text, color, font_size)
        }
    }
}

/// Reference line spanning the whole width of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalLine {
    pub y: f64,
    pub row: usize,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFigure {
    pub title: String,
    /// Pixel height
    pub height: u32,
    pub vertical_spacing: f64,
    pub x_title: &'static str,
    pub panels: Vec<Panel>,
    pub traces: Vec<Trace>,
    pub annotations: Vec<Annotation>,
    pub horizontal_lines: Vec<HorizontalLine>,
}

impl ChartFigure {
    /// Price panel on top, then whichever of volume, RSI and MACD are enabled, in that order.
    pub fn new(title: impl Into<String>, show_volume: bool, show_rsi: bool, show_macd: bool) -> Self {
        let mut kinds = vec![PanelKind::Price];
        for (enabled, kind) in [
            (show_volume, PanelKind::Volume),
            (show_rsi, PanelKind::Rsi),
            (show_macd, PanelKind::Macd),
        ] {
            if enabled {
                kinds.push(kind);
            }
        }

        let total = PRICE_PANEL_WEIGHT + INDICATOR_PANEL_WEIGHT * (kinds.len() - 1) as f64;
        let panels = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                let weight = if kind == PanelKind::Price { PRICE_PANEL_WEIGHT } else { INDICATOR_PANEL_WEIGHT };
                Panel {
                    kind,
                    row: i + 1,
                    height: weight / total,
                    y_title: kind.y_title(),
                    y_range: (kind == PanelKind::Rsi).then_some([0.0, 100.0]),
                    show_grid: kind == PanelKind::Price,
                }
            })
            .collect::<Vec<_>>();

        Self {
            title: title.into(),
            height: BASE_HEIGHT + INDICATOR_PANEL_HEIGHT * (panels.len() as u32 - 1),
            vertical_spacing: VERTICAL_SPACING,
            x_title: "Date",
            panels,
            traces: Vec::new(),
            annotations: Vec::new(),
            horizontal_lines: Vec::new(),
        }
    }

    pub fn row_of(&self, kind: PanelKind) -> Option<usize> {
        self.panels.iter().find(|p| p.kind == kind).map(|p| p.row)
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn add_hline(&mut self, row: usize, y: f64, line: LineStyle) {
        self.horizontal_lines.push(HorizontalLine { y, row, line });
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}
