//! Engine-neutral chart models and their layout onto a `RenderFrame`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use chrono::DateTime;
use indexmap::IndexSet;
use serde_json::Value;

use crate::core::{BandScale, LinearScale, PointScale, Viewport, date_to_unix_seconds, parse_iso_date};
use crate::error::{ChartError, ChartResult};
use crate::render::chrome::{
    GRID_COLOR, GRID_FRACTIONS, PlotArea, TEXT_COLOR, format_tick, padded_extent, push_axes,
    push_axis_titles, push_title, push_value_grid, push_x_label, truncate_label,
};
use crate::render::fallback::value_label;
use crate::render::{
    CirclePrimitive, Color, PolygonPrimitive, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};
use crate::spec::ColorScheme;

const MAX_X_LABELS: usize = 12;

/// Default series color for position `index`.
pub(crate) fn palette_color(index: usize) -> Color {
    let colors = ColorScheme::Default.colors();
    Color::parse(colors[index % colors.len()]).unwrap_or(Color::rgb(0.329, 0.153, 0.561))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum XAxisHint {
    Auto,
    Category,
    Linear,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 20.0,
            top: 50.0,
            bottom: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Series {
    pub kind: MarkKind,
    pub xs: Vec<Value>,
    pub ys: Vec<f64>,
    /// Cycled per point for bars and markers.
    pub colors: Vec<Color>,
    pub line_color: Color,
    pub line_width: f64,
    pub draw_line: bool,
    pub marker_radius: Option<f64>,
    pub fill: Option<Color>,
}

impl Series {
    pub fn new(kind: MarkKind, xs: Vec<Value>, ys: Vec<f64>, color: Color) -> Self {
        Self {
            kind,
            xs,
            ys,
            colors: vec![color],
            line_color: color,
            line_width: 2.0,
            draw_line: kind == MarkKind::Line,
            marker_radius: (kind == MarkKind::Line).then_some(3.0),
            fill: None,
        }
    }

    fn color_at(&self, index: usize) -> Color {
        self.colors
            .get(index % self.colors.len().max(1))
            .copied()
            .unwrap_or(self.line_color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XyChart {
    pub viewport: Viewport,
    pub margins: Margins,
    pub background: Option<Color>,
    pub title: Option<String>,
    pub title_color: Color,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub x_axis: XAxisHint,
    pub show_grid: bool,
    pub grid_color: Color,
    pub begin_at_zero: bool,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub series: Vec<Series>,
}

impl XyChart {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: Margins::default(),
            background: None,
            title: None,
            title_color: TEXT_COLOR,
            x_title: None,
            y_title: None,
            x_axis: XAxisHint::Auto,
            show_grid: true,
            grid_color: GRID_COLOR,
            begin_at_zero: false,
            y_min: None,
            y_max: None,
            series: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PieChart {
    pub viewport: Viewport,
    pub background: Option<Color>,
    pub title: Option<String>,
    pub title_color: Color,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
    /// Inner radius as a fraction of the outer one; zero for a full pie.
    pub hole: f64,
}

enum XPlacement {
    Continuous { scale: LinearScale, dates: bool },
    Band { scale: BandScale, categories: IndexSet<String> },
    Point { scale: PointScale, categories: IndexSet<String> },
}

impl XPlacement {
    fn resolve(chart: &XyChart, area: PlotArea) -> ChartResult<Self> {
        let has_bars = chart.series.iter().any(|series| series.kind == MarkKind::Bar);
        let all_xs = || chart.series.iter().flat_map(|series| series.xs.iter());

        let numeric: Option<Vec<f64>> = all_xs().map(Value::as_f64).collect();
        let dates: Option<Vec<f64>> = all_xs().map(date_seconds).collect();

        let continuous = match chart.x_axis {
            _ if has_bars => None,
            XAxisHint::Category => None,
            XAxisHint::Date => dates.map(|values| (values, true)).or(numeric.map(|values| (values, false))),
            XAxisHint::Linear => numeric.map(|values| (values, false)),
            XAxisHint::Auto => numeric
                .map(|values| (values, false))
                .or(dates.map(|values| (values, true))),
        };
        if let Some((values, dates)) = continuous {
            let scale = LinearScale::fit(values, area.left, area.right)?;
            return Ok(Self::Continuous { scale, dates });
        }

        let categories: IndexSet<String> = all_xs().map(value_label).collect();
        if has_bars {
            let scale = BandScale::new(categories.len(), area.left, area.right, 0.2)?;
            Ok(Self::Band { scale, categories })
        } else {
            let scale = PointScale::new(categories.len(), area.left, area.right)?;
            Ok(Self::Point { scale, categories })
        }
    }

    /// Pixel x of a point; bars get the band start and width instead.
    fn center(&self, x: &Value) -> ChartResult<f64> {
        match self {
            Self::Continuous { scale, dates } => {
                let value = if *dates { date_seconds(x) } else { x.as_f64() };
                let value = value.ok_or_else(|| {
                    ChartError::InvalidData(format!("x value {x} does not fit the axis"))
                })?;
                scale.domain_to_pixel(value)
            }
            Self::Band { scale, categories } => {
                let index = category_index(categories, x)?;
                Ok(scale.band_start(index)? + scale.bandwidth() / 2.0)
            }
            Self::Point { scale, categories } => scale.position(category_index(categories, x)?),
        }
    }

    fn push_labels(&self, frame: &mut RenderFrame, area: PlotArea) -> ChartResult<()> {
        match self {
            Self::Continuous { scale, dates } => {
                let (start, end) = scale.domain();
                for fraction in GRID_FRACTIONS {
                    let value = start + fraction * (end - start);
                    let label = if *dates {
                        DateTime::from_timestamp(value.round() as i64, 0)
                            .map(|stamp| stamp.format("%Y-%m-%d").to_string())
                            .unwrap_or_default()
                    } else {
                        format_tick(value)
                    };
                    push_x_label(frame, area, area.left + fraction * area.width(), &label);
                }
            }
            Self::Band { categories, .. } | Self::Point { categories, .. } => {
                let step = categories.len().div_ceil(MAX_X_LABELS).max(1);
                for category in categories.iter().step_by(step) {
                    let x = self.center(&Value::String(category.clone()))?;
                    push_x_label(frame, area, x, &truncate_label(category));
                }
            }
        }
        Ok(())
    }
}

fn category_index(categories: &IndexSet<String>, x: &Value) -> ChartResult<usize> {
    categories
        .get_index_of(&value_label(x))
        .ok_or_else(|| ChartError::InvalidData(format!("unknown category {x}")))
}

fn date_seconds(value: &Value) -> Option<f64> {
    let text = value.as_str()?.trim();
    let day = text.get(..10).unwrap_or(text);
    parse_iso_date(day).map(date_to_unix_seconds)
}

/// Lays out bars, lines, areas and markers over shared axes.
pub(crate) fn draw_xy(chart: &XyChart) -> ChartResult<RenderFrame> {
    if chart.series.is_empty() {
        return Err(ChartError::InvalidData("chart has no series".to_owned()));
    }
    for (index, series) in chart.series.iter().enumerate() {
        if series.xs.len() != series.ys.len() {
            return Err(ChartError::InvalidData(format!(
                "series {index} has {} x values but {} y values",
                series.xs.len(),
                series.ys.len()
            )));
        }
    }

    let margins = chart.margins;
    let area = PlotArea::inset(
        chart.viewport,
        margins.left,
        margins.right,
        margins.top,
        margins.bottom,
    )?;
    let mut frame = RenderFrame::new(chart.viewport);
    if let Some(background) = chart.background {
        frame.rects.push(RectPrimitive::new(
            0.0,
            0.0,
            f64::from(chart.viewport.width),
            f64::from(chart.viewport.height),
            background,
        ));
    }

    let all_ys = || chart.series.iter().flat_map(|series| series.ys.iter().copied());
    let anchored = chart.begin_at_zero
        || chart
            .series
            .iter()
            .any(|series| series.kind == MarkKind::Bar || series.fill.is_some());
    let (raw_min, raw_max) = padded_extent(all_ys(), 0.0)
        .ok_or_else(|| ChartError::InvalidData("no finite y values".to_owned()))?;
    let (mut low, mut high) = padded_extent(all_ys(), 0.05)
        .ok_or_else(|| ChartError::InvalidData("no finite y values".to_owned()))?;
    if anchored {
        if raw_min >= 0.0 {
            low = 0.0;
        }
        if raw_max <= 0.0 {
            high = 0.0;
        }
        if low == high {
            high = low + 1.0;
        }
    }
    low = chart.y_min.unwrap_or(low);
    high = chart.y_max.unwrap_or(high);
    let y_scale = area.value_scale(low, high)?;
    let baseline = y_scale.domain_to_pixel(0.0_f64.clamp(low.min(high), low.max(high)))?;

    push_value_grid(&mut frame, area, (low, high), chart.show_grid, chart.grid_color);
    push_axes(&mut frame, area);

    let placement = XPlacement::resolve(chart, area)?;
    let bar_series = chart
        .series
        .iter()
        .filter(|series| series.kind == MarkKind::Bar)
        .count();
    let mut bar_slot = 0;

    for series in &chart.series {
        match series.kind {
            MarkKind::Bar => {
                let XPlacement::Band { scale, .. } = &placement else {
                    return Err(ChartError::InvalidData(
                        "bars need a band axis".to_owned(),
                    ));
                };
                let group_width = scale.bandwidth() / bar_series as f64;
                for (index, (x, y)) in series.xs.iter().zip(&series.ys).enumerate() {
                    let band_left = placement.center(x)? - scale.bandwidth() / 2.0;
                    let top = y_scale.domain_to_pixel(*y)?;
                    frame.rects.push(RectPrimitive::new(
                        band_left + bar_slot as f64 * group_width + group_width * 0.05,
                        top.min(baseline),
                        group_width * 0.9,
                        (top - baseline).abs(),
                        series.color_at(index),
                    ));
                }
                bar_slot += 1;
            }
            MarkKind::Line => {
                let points = series
                    .xs
                    .iter()
                    .zip(&series.ys)
                    .map(|(x, y)| Ok((placement.center(x)?, y_scale.domain_to_pixel(*y)?)))
                    .collect::<ChartResult<Vec<_>>>()?;
                if let (Some(fill), Some(first), Some(last)) =
                    (series.fill, points.first(), points.last())
                {
                    let mut outline = points.clone();
                    outline.push((last.0, baseline));
                    outline.push((first.0, baseline));
                    let mut area_fill = PolygonPrimitive::filled(outline, fill, fill);
                    area_fill.stroke_width = 0.0;
                    frame.polygons.push(area_fill);
                }
                if series.draw_line && points.len() > 1 {
                    frame.polygons.push(PolygonPrimitive::polyline(
                        points.clone(),
                        series.line_width,
                        series.line_color,
                    ));
                }
                if let Some(radius) = series.marker_radius {
                    for (index, (x, y)) in points.into_iter().enumerate() {
                        frame
                            .circles
                            .push(CirclePrimitive::new(x, y, radius, series.color_at(index)));
                    }
                }
            }
        }
    }

    placement.push_labels(&mut frame, area)?;
    push_title(&mut frame, chart.title.as_deref(), chart.title_color);
    push_axis_titles(&mut frame, area, chart.x_title.as_deref(), chart.y_title.as_deref());

    let points: usize = chart.series.iter().map(|series| series.ys.len()).sum();
    Ok(frame.with_annotation("points", points.to_string()))
}

/// Lays out slices clockwise from twelve o'clock.
pub(crate) fn draw_pie(chart: &PieChart) -> ChartResult<RenderFrame> {
    if chart.values.is_empty() {
        return Err(ChartError::InvalidData("pie has no values".to_owned()));
    }
    if chart.values.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(ChartError::InvalidData(
            "pie values must be finite and >= 0".to_owned(),
        ));
    }
    let total: f64 = chart.values.iter().sum();
    if total <= 0.0 {
        return Err(ChartError::InvalidData("pie values sum to zero".to_owned()));
    }
    if !(0.0..1.0).contains(&chart.hole) {
        return Err(ChartError::InvalidData(
            "pie hole must be in [0, 1)".to_owned(),
        ));
    }

    let width = f64::from(chart.viewport.width);
    let height = f64::from(chart.viewport.height);
    let center = (width / 2.0, (height + 40.0) / 2.0);
    let radius = (width.min(height - 40.0) / 2.0) - 30.0;
    if radius <= 0.0 {
        return Err(ChartError::InvalidViewport {
            width: chart.viewport.width,
            height: chart.viewport.height,
        });
    }
    let inner = radius * chart.hole;

    let mut frame = RenderFrame::new(chart.viewport);
    if let Some(background) = chart.background {
        frame
            .rects
            .push(RectPrimitive::new(0.0, 0.0, width, height, background));
    }

    let mut start = -FRAC_PI_2;
    for (index, value) in chart.values.iter().enumerate() {
        if *value == 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        let end = start + sweep;
        let steps = ((sweep / (PI / 36.0)).ceil() as usize).max(2);
        let arc = |r: f64| -> Vec<(f64, f64)> {
            (0..=steps)
                .map(|step| {
                    let angle = start + sweep * step as f64 / steps as f64;
                    (center.0 + r * angle.cos(), center.1 + r * angle.sin())
                })
                .collect()
        };

        let mut outline = arc(radius);
        if inner > 0.0 {
            outline.extend(arc(inner).into_iter().rev());
        } else {
            outline.push(center);
        }
        let color = chart
            .colors
            .get(index % chart.colors.len().max(1))
            .copied()
            .unwrap_or_else(|| palette_color(index));
        frame.polygons.push(PolygonPrimitive::filled(
            outline,
            color,
            Color::rgb(1.0, 1.0, 1.0),
        ));

        let label = chart.labels.get(index).map(String::as_str).unwrap_or_default();
        let label = truncate_label(label);
        if !label.is_empty() {
            let middle = start + sweep / 2.0;
            let reach = radius + 14.0;
            let anchor = if middle.cos() >= 0.0 {
                TextHAlign::Left
            } else {
                TextHAlign::Right
            };
            let percent = value / total * 100.0;
            frame.texts.push(TextPrimitive::new(
                format!("{label} {percent:.0}%"),
                center.0 + reach * middle.cos(),
                center.1 + reach * middle.sin() + 4.0,
                11.0,
                TEXT_COLOR,
                anchor,
            ));
        }
        start = end;
    }

    push_title(&mut frame, chart.title.as_deref(), chart.title_color);
    Ok(frame.with_annotation("points", chart.values.len().to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn line_chart(xs: Vec<Value>, ys: Vec<f64>) -> XyChart {
        let mut chart = XyChart::new(Viewport::default());
        chart.series.push(Series::new(MarkKind::Line, xs, ys, palette_color(0)));
        chart
    }

    #[test]
    fn numeric_x_maps_onto_full_width() {
        let chart = line_chart(vec![json!(0), json!(10)], vec![1.0, 2.0]);
        let frame = draw_xy(&chart).expect("frame");
        let xs: Vec<f64> = frame.circles.iter().map(|circle| circle.cx).collect();
        assert_eq!(xs, vec![60.0, 580.0]);
        assert_eq!(frame.annotation("points"), Some("2"));
    }

    #[test]
    fn bars_use_bands_and_anchor_at_zero() {
        let mut chart = XyChart::new(Viewport::default());
        chart.series.push(Series::new(
            MarkKind::Bar,
            vec![json!("Apples"), json!("Oranges")],
            vec![12.0, 7.0],
            palette_color(0),
        ));
        let frame = draw_xy(&chart).expect("frame");
        assert_eq!(frame.rects.len(), 2);
        let bottoms: Vec<f64> = frame.rects.iter().map(|rect| rect.y + rect.height).collect();
        assert!((bottoms[0] - bottoms[1]).abs() < 1e-9);
        assert!(frame.rects[0].height > frame.rects[1].height);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let chart = line_chart(vec![json!(1)], vec![1.0, 2.0]);
        assert!(draw_xy(&chart).is_err());
    }

    #[test]
    fn pie_slices_follow_values() {
        let chart = PieChart {
            viewport: Viewport::default(),
            background: None,
            title: Some("Fruit".to_owned()),
            title_color: TEXT_COLOR,
            labels: vec!["Apples".to_owned(), "Oranges".to_owned()],
            values: vec![3.0, 1.0],
            colors: Vec::new(),
            hole: 0.0,
        };
        let frame = draw_pie(&chart).expect("pie");
        assert_eq!(frame.polygons.len(), 2);
        assert!(frame.texts.iter().any(|text| text.text == "Apples 75%"));
    }
}
