use serde_json::{Map, Value, json};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::render::backends::ChartBackend;
use crate::render::backends::marks::{
    MarkKind, Margins, PieChart, Series, XAxisHint, XyChart, draw_pie, draw_xy, palette_color,
};
use crate::render::chrome::{TEXT_COLOR, viewport_from};
use crate::render::fallback::value_label;
use crate::render::{Color, EngineId, RenderFrame};
use crate::spec::plot::{ColorValue, Layout, PlotSpec, Trace};

/// Declarative-vector engine: draws `{data, layout, config}` documents.
#[derive(Debug, Default)]
pub struct VectorBackend {
    draws: u64,
}

impl VectorBackend {
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

/// Overlays the caller's `layout` and `config` on the engine defaults
/// (`autosize`, `responsive`, no mode bar). Caller keys always win.
#[must_use]
pub fn merge_plot_defaults(spec: &Value) -> Value {
    let mut layout = Map::new();
    layout.insert("autosize".to_owned(), Value::Bool(true));
    let mut config = Map::new();
    config.insert("responsive".to_owned(), Value::Bool(true));
    config.insert("displayModeBar".to_owned(), Value::Bool(false));

    if let Some(caller) = spec["layout"].as_object() {
        layout.extend(caller.clone());
    }
    if let Some(caller) = spec["config"].as_object() {
        config.extend(caller.clone());
    }

    json!({
        "data": spec.get("data").cloned().unwrap_or_else(|| Value::Array(Vec::new())),
        "layout": layout,
        "config": config,
    })
}

impl ChartBackend for VectorBackend {
    fn engine(&self) -> EngineId {
        EngineId::Vector
    }

    fn draw(&mut self, spec: &Value) -> ChartResult<RenderFrame> {
        let plot: PlotSpec = serde_json::from_value(merge_plot_defaults(spec))?;
        let Some(first) = plot.data.first() else {
            return Err(ChartError::InvalidData("plot has no traces".to_owned()));
        };

        let frame = if first.trace_type == "pie" {
            draw_pie(&pie_chart(first, &plot.layout)?)?
        } else {
            draw_xy(&xy_chart(&plot)?)?
        };
        self.draws += 1;
        trace!(traces = plot.data.len(), draws = self.draws, "vector frame drawn");
        Ok(frame.with_annotation("engine", EngineId::Vector.as_str()))
    }
}

fn pie_chart(trace: &Trace, layout: &Layout) -> ChartResult<PieChart> {
    let colors = match &trace.marker {
        Some(marker) => match (&marker.colors, &marker.color) {
            (Some(colors), _) => parse_colors(colors)?,
            (None, Some(ColorValue::PerPoint(colors))) => parse_colors(colors)?,
            _ => Vec::new(),
        },
        None => Vec::new(),
    };
    let (values, labels) = if trace.values.is_empty() {
        (trace.y.clone(), trace.x.iter().map(value_label).collect())
    } else {
        (trace.values.clone(), trace.labels.clone())
    };

    Ok(PieChart {
        viewport: viewport_from(layout.width, layout.height)?,
        background: optional_color(layout.paper_bgcolor.as_deref())?,
        title: layout.title.as_ref().map(|title| title.text().to_owned()),
        title_color: font_color(layout)?,
        labels,
        values,
        colors,
        hole: trace.hole.unwrap_or(0.0),
    })
}

fn xy_chart(plot: &PlotSpec) -> ChartResult<XyChart> {
    let layout = &plot.layout;
    let mut chart = XyChart::new(viewport_from(layout.width, layout.height)?);
    if let Some(margin) = layout.margin {
        chart.margins = Margins {
            left: margin.l,
            right: margin.r,
            top: margin.t,
            bottom: margin.b,
        };
    }
    chart.background = optional_color(layout.paper_bgcolor.as_deref())?;
    chart.title = layout.title.as_ref().map(|title| title.text().to_owned());
    chart.title_color = font_color(layout)?;

    if let Some(xaxis) = &layout.xaxis {
        chart.x_title = xaxis.title.as_ref().map(|title| title.text().to_owned());
        chart.x_axis = match xaxis.axis_type.as_deref() {
            Some("category") => XAxisHint::Category,
            Some("date") => XAxisHint::Date,
            Some("linear" | "log") => XAxisHint::Linear,
            _ => XAxisHint::Auto,
        };
    }
    if let Some(yaxis) = &layout.yaxis {
        chart.y_title = yaxis.title.as_ref().map(|title| title.text().to_owned());
        chart.show_grid = yaxis.showgrid.unwrap_or(true);
        if let Some(grid) = optional_color(yaxis.gridcolor.as_deref())? {
            chart.grid_color = grid;
        }
    }

    for (index, trace) in plot.data.iter().enumerate() {
        chart.series.push(series(index, trace)?);
    }
    Ok(chart)
}

fn series(index: usize, trace: &Trace) -> ChartResult<Series> {
    let kind = match trace.trace_type.as_str() {
        "bar" => MarkKind::Bar,
        "scatter" | "scattergl" | "line" => MarkKind::Line,
        other => {
            return Err(ChartError::InvalidData(format!(
                "trace type `{other}` cannot be mixed into an x/y plot"
            )));
        }
    };
    let xs = if trace.x.is_empty() {
        (0..trace.y.len()).map(Value::from).collect()
    } else {
        trace.x.clone()
    };

    let marker = trace.marker.as_ref();
    let mut colors = match marker.and_then(|marker| marker.color.as_ref()) {
        Some(ColorValue::Single(color)) => vec![Color::parse(color)?],
        Some(ColorValue::PerPoint(colors)) => parse_colors(colors)?,
        None => Vec::new(),
    };
    let line_color = match trace.line.as_ref().and_then(|line| line.color.as_deref()) {
        Some(color) => Color::parse(color)?,
        None => colors.first().copied().unwrap_or_else(|| palette_color(index)),
    };
    if colors.is_empty() {
        colors.push(line_color);
    }

    let mut series = Series::new(kind, xs, trace.y.clone(), line_color);
    series.colors = colors;
    if kind == MarkKind::Line {
        series.draw_line = trace.draws_lines();
        series.marker_radius = trace
            .draws_markers()
            .then(|| marker.and_then(|marker| marker.size).unwrap_or(6.0) / 2.0);
        if let Some(width) = trace.line.as_ref().and_then(|line| line.width) {
            series.line_width = width;
        }
        if trace.fill.as_deref().is_some_and(|fill| fill.starts_with("to")) {
            series.fill = Some(match trace.fillcolor.as_deref() {
                Some(color) => Color::parse(color)?,
                None => Color {
                    alpha: 0.3,
                    ..line_color
                },
            });
        }
    }
    Ok(series)
}

fn parse_colors(colors: &[String]) -> ChartResult<Vec<Color>> {
    colors.iter().map(|color| Color::parse(color)).collect()
}

fn optional_color(color: Option<&str>) -> ChartResult<Option<Color>> {
    color.map(Color::parse).transpose()
}

fn font_color(layout: &Layout) -> ChartResult<Color> {
    Ok(optional_color(
        layout
            .font
            .as_ref()
            .and_then(|font| font.color.as_deref()),
    )?
    .unwrap_or(TEXT_COLOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_layout_overrides_defaults() {
        let merged = merge_plot_defaults(&json!({
            "data": [],
            "layout": { "autosize": false, "height": 300 },
            "config": { "displayModeBar": true }
        }));
        assert_eq!(merged["layout"]["autosize"], json!(false));
        assert_eq!(merged["layout"]["height"], json!(300));
        assert_eq!(merged["config"]["responsive"], json!(true));
        assert_eq!(merged["config"]["displayModeBar"], json!(true));
    }

    #[test]
    fn unknown_trace_types_are_errors() {
        let mut backend = VectorBackend::default();
        let spec = json!({ "data": [{ "type": "heatmap", "z": [[1, 2]] }] });
        assert!(backend.draw(&spec).is_err());
        assert_eq!(backend.draws(), 0);
    }
}
