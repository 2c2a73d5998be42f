use serde_json::Value;
use tracing::trace;

use crate::error::ChartResult;
use crate::render::backends::ChartBackend;
use crate::render::backends::marks::{
    MarkKind, PieChart, Series, XAxisHint, XyChart, draw_pie, draw_xy, palette_color,
};
use crate::render::chrome::{TEXT_COLOR, viewport_from};
use crate::render::fallback::value_label;
use crate::render::{Color, EngineId, RenderFrame};
use crate::spec::canvas::{
    CanvasData, CanvasDatum, CanvasDataset, CanvasOptions, ColorList, normalize_canvas_options,
};

/// The five chart shapes the canvas engine knows; anything else draws as a
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasShape {
    Bar,
    Pie,
    Doughnut,
    Scatter,
    Line,
}

impl CanvasShape {
    #[must_use]
    pub fn from_type(chart_type: Option<&str>) -> Self {
        match chart_type {
            Some("bar") => Self::Bar,
            Some("pie") => Self::Pie,
            Some("doughnut") => Self::Doughnut,
            Some("scatter") => Self::Scatter,
            _ => Self::Line,
        }
    }
}

/// Canvas-imperative engine: `{type, data: {labels, datasets}, options}`.
///
/// Legacy option shapes are upgraded before drawing.
#[derive(Debug, Default)]
pub struct CanvasBackend {
    last_shape: Option<CanvasShape>,
}

impl CanvasBackend {
    #[must_use]
    pub fn last_shape(&self) -> Option<CanvasShape> {
        self.last_shape
    }
}

impl ChartBackend for CanvasBackend {
    fn engine(&self) -> EngineId {
        EngineId::Canvas
    }

    fn draw(&mut self, spec: &Value) -> ChartResult<RenderFrame> {
        let options = normalize_canvas_options(&spec["options"])?;
        let data: CanvasData = match spec.get("data") {
            Some(data) => serde_json::from_value(data.clone())?,
            None => CanvasData::default(),
        };
        let shape = CanvasShape::from_type(spec["type"].as_str());
        let viewport = viewport_from(spec["width"].as_f64(), spec["height"].as_f64())?;

        let frame = match shape {
            CanvasShape::Pie | CanvasShape::Doughnut => {
                let dataset = data.datasets.first();
                draw_pie(&PieChart {
                    viewport,
                    background: None,
                    title: options.title_text().map(str::to_owned),
                    title_color: TEXT_COLOR,
                    labels: data.labels.iter().map(value_label).collect(),
                    values: dataset
                        .map(|dataset| dataset.data.iter().map(CanvasDatum::y).collect())
                        .unwrap_or_default(),
                    colors: dataset
                        .and_then(|dataset| dataset.background_color.as_ref())
                        .map(color_list)
                        .transpose()?
                        .unwrap_or_default(),
                    hole: if shape == CanvasShape::Doughnut { 0.5 } else { 0.0 },
                })?
            }
            CanvasShape::Bar | CanvasShape::Scatter | CanvasShape::Line => {
                let mut chart = XyChart::new(viewport);
                apply_options(&mut chart, &options, shape);
                for (index, dataset) in data.datasets.iter().enumerate() {
                    chart
                        .series
                        .push(series(index, dataset, &data.labels, shape)?);
                }
                draw_xy(&chart)?
            }
        };

        self.last_shape = Some(shape);
        trace!(?shape, datasets = data.datasets.len(), "canvas frame drawn");
        Ok(frame.with_annotation("engine", EngineId::Canvas.as_str()))
    }
}

fn apply_options(chart: &mut XyChart, options: &CanvasOptions, shape: CanvasShape) {
    chart.title = options.title_text().map(str::to_owned);
    chart.x_title = options.axis_title("x").map(str::to_owned);
    chart.y_title = options.axis_title("y").map(str::to_owned);
    chart.show_grid = options.shows_grid("y");

    let x_type = options
        .scales
        .get("x")
        .and_then(|scale| scale.scale_type.as_deref());
    chart.x_axis = match (x_type, shape) {
        (Some("linear" | "logarithmic"), _) => XAxisHint::Linear,
        (Some("time" | "timeseries"), _) => XAxisHint::Date,
        (Some("category"), _) => XAxisHint::Category,
        (_, CanvasShape::Scatter) => XAxisHint::Auto,
        _ => XAxisHint::Category,
    };

    if let Some(y) = options.scales.get("y") {
        chart.begin_at_zero = y.begin_at_zero.unwrap_or(false);
        chart.y_min = y.min;
        chart.y_max = y.max;
    }
}

fn series(
    index: usize,
    dataset: &CanvasDataset,
    labels: &[Value],
    shape: CanvasShape,
) -> ChartResult<Series> {
    let xs = dataset
        .data
        .iter()
        .enumerate()
        .map(|(position, datum)| match datum {
            CanvasDatum::Point { x, .. } => x.clone(),
            CanvasDatum::Value(_) => labels
                .get(position)
                .cloned()
                .unwrap_or_else(|| Value::from(position)),
        })
        .collect();
    let ys = dataset.data.iter().map(CanvasDatum::y).collect();

    let background = dataset
        .background_color
        .as_ref()
        .map(color_list)
        .transpose()?
        .unwrap_or_default();
    let border = match &dataset.border_color {
        Some(ColorList::One(color)) => Some(Color::parse(color)?),
        Some(ColorList::Many(colors)) => colors.first().map(|color| Color::parse(color)).transpose()?,
        None => None,
    };
    let primary = border
        .or_else(|| background.first().copied())
        .unwrap_or_else(|| palette_color(index));

    let kind = if shape == CanvasShape::Bar {
        MarkKind::Bar
    } else {
        MarkKind::Line
    };
    let mut series = Series::new(kind, xs, ys, primary);
    match shape {
        CanvasShape::Bar => {
            if !background.is_empty() {
                series.colors = background;
            }
        }
        CanvasShape::Scatter => {
            series.draw_line = false;
            series.marker_radius = Some(4.0);
        }
        _ => {
            if let Some(width) = dataset.border_width {
                series.line_width = width;
            }
            if dataset.fills_area() {
                series.fill = Some(
                    background
                        .first()
                        .copied()
                        .unwrap_or(Color { alpha: 0.3, ..primary }),
                );
            }
        }
    }
    Ok(series)
}

fn color_list(colors: &ColorList) -> ChartResult<Vec<Color>> {
    match colors {
        ColorList::One(color) => Ok(vec![Color::parse(color)?]),
        ColorList::Many(colors) => colors.iter().map(|color| Color::parse(color)).collect(),
    }
}
