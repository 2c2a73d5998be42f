//! Plot chrome shared by the fallback and the engine backends: plot area,
//! grid, axes, titles and label shortening.

use crate::core::{LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

pub(crate) const GRID_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
pub(crate) const MAX_LABEL_CHARS: usize = 8;

pub(crate) const TEXT_COLOR: Color = Color::rgb(0.216, 0.255, 0.318);
pub(crate) const AXIS_COLOR: Color = Color::rgb(0.612, 0.639, 0.686);
pub(crate) const GRID_COLOR: Color = Color::rgb(0.898, 0.906, 0.922);

const TITLE_FONT_PX: f64 = 16.0;
const LABEL_FONT_PX: f64 = 11.0;

/// Pixel rectangle inside the margins where marks are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn inset(viewport: Viewport, left: f64, right: f64, top: f64, bottom: f64) -> ChartResult<Self> {
        let area = Self {
            left,
            top,
            right: f64::from(viewport.width) - right,
            bottom: f64::from(viewport.height) - bottom,
        };
        if !(area.width() > 0.0 && area.height() > 0.0) {
            return Err(ChartError::InvalidData(format!(
                "margins leave no plot area in {}x{}",
                viewport.width, viewport.height
            )));
        }
        Ok(area)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Value scale mapping larger values upwards.
    pub fn value_scale(self, min: f64, max: f64) -> ChartResult<LinearScale> {
        LinearScale::new(min, max, self.bottom, self.top)
    }
}

/// Viewport from optional spec dimensions; missing sides use the defaults.
pub(crate) fn viewport_from(width: Option<f64>, height: Option<f64>) -> ChartResult<Viewport> {
    let fallback = Viewport::default();
    let side = |value: Option<f64>, default: u32| -> ChartResult<u32> {
        match value {
            None => Ok(default),
            Some(value) if value.is_finite() && value >= 1.0 && value <= f64::from(u16::MAX) => {
                Ok(value.round() as u32)
            }
            Some(value) => Err(ChartError::InvalidData(format!(
                "chart dimension {value} is out of range"
            ))),
        }
    };
    Viewport::new(side(width, fallback.width)?, side(height, fallback.height)?).validated()
}

/// Min/max of `values` widened by `fraction` of the span on both sides.
pub(crate) fn padded_extent(values: impl IntoIterator<Item = f64>, fraction: f64) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values.into_iter().filter(|value| value.is_finite()) {
        min = min.min(value);
        max = max.max(value);
    }
    if !min.is_finite() {
        return None;
    }
    let span = max - min;
    let pad = if span == 0.0 {
        if min == 0.0 { 1.0 } else { min.abs() * fraction.max(0.1) }
    } else {
        span * fraction
    };
    Some((min - pad, max + pad))
}

/// Horizontal grid lines and value ticks at the fixed fractions.
pub(crate) fn push_value_grid(
    frame: &mut RenderFrame,
    area: PlotArea,
    domain: (f64, f64),
    show_grid: bool,
    grid_color: Color,
) {
    for fraction in GRID_FRACTIONS {
        let y = area.bottom - fraction * area.height();
        if show_grid {
            frame
                .lines
                .push(LinePrimitive::new(area.left, y, area.right, y, 1.0, grid_color));
        }
        let value = domain.0 + fraction * (domain.1 - domain.0);
        frame.texts.push(TextPrimitive::new(
            format_tick(value),
            area.left - 6.0,
            y + 4.0,
            LABEL_FONT_PX,
            TEXT_COLOR,
            TextHAlign::Right,
        ));
    }
}

pub(crate) fn push_axes(frame: &mut RenderFrame, area: PlotArea) {
    frame.lines.push(LinePrimitive::new(
        area.left,
        area.bottom,
        area.right,
        area.bottom,
        1.0,
        AXIS_COLOR,
    ));
    frame.lines.push(LinePrimitive::new(
        area.left,
        area.top,
        area.left,
        area.bottom,
        1.0,
        AXIS_COLOR,
    ));
}

/// Tick label under the x axis.
pub(crate) fn push_x_label(frame: &mut RenderFrame, area: PlotArea, x: f64, label: &str) {
    if label.is_empty() {
        return;
    }
    frame.texts.push(TextPrimitive::new(
        label,
        x,
        area.bottom + 16.0,
        LABEL_FONT_PX,
        TEXT_COLOR,
        TextHAlign::Center,
    ));
}

pub(crate) fn push_title(frame: &mut RenderFrame, title: Option<&str>, color: Color) {
    let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) else {
        return;
    };
    frame.texts.push(TextPrimitive::new(
        title,
        f64::from(frame.viewport.width) / 2.0,
        24.0,
        TITLE_FONT_PX,
        color,
        TextHAlign::Center,
    ));
}

pub(crate) fn push_axis_titles(
    frame: &mut RenderFrame,
    area: PlotArea,
    x_title: Option<&str>,
    y_title: Option<&str>,
) {
    if let Some(x_title) = x_title.map(str::trim).filter(|title| !title.is_empty()) {
        frame.texts.push(TextPrimitive::new(
            x_title,
            area.left + area.width() / 2.0,
            f64::from(frame.viewport.height) - 10.0,
            12.0,
            TEXT_COLOR,
            TextHAlign::Center,
        ));
    }
    if let Some(y_title) = y_title.map(str::trim).filter(|title| !title.is_empty()) {
        frame.texts.push(
            TextPrimitive::new(
                y_title,
                14.0,
                area.top + area.height() / 2.0,
                12.0,
                TEXT_COLOR,
                TextHAlign::Center,
            )
            .rotated(90.0),
        );
    }
}

/// Shortens labels longer than eight characters with a trailing ellipsis.
#[must_use]
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let mut short: String = label.chars().take(MAX_LABEL_CHARS).collect();
        short.push_str("...");
        short
    } else {
        label.to_owned()
    }
}

/// Grouped integers from a thousand up, one decimal below.
#[must_use]
pub(crate) fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        let rounded = value.round() as i64;
        let digits = rounded.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if rounded < 0 {
            grouped.insert(0, '-');
        }
        grouped
    } else {
        let rounded = (value * 10.0).round() / 10.0;
        if rounded == 0.0 {
            "0".to_owned()
        } else {
            format!("{rounded}")
        }
    }
}
