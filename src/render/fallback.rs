use serde_json::Value;
use tracing::debug;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::chrome::{
    GRID_COLOR, PlotArea, TEXT_COLOR, padded_extent, push_axes, push_axis_titles, push_title,
    push_value_grid, push_x_label, truncate_label, viewport_from,
};
use crate::render::{
    CirclePrimitive, Color, PolygonPrimitive, RectPrimitive, RenderFrame, SvgRenderer,
    TextHAlign, TextPrimitive,
};

/// Notice shown next to fallback output.
pub const FALLBACK_NOTICE: &str = "Using fallback renderer";

const SERIES_COLOR: Color = Color::rgb(0.310, 0.275, 0.898);
const MAX_X_LABELS: usize = 12;
const LAST_RESORT_MARKUP: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400" data-fallback="true" data-points="0"></svg>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    NoData,
    InvalidData,
}

impl Placeholder {
    fn message(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::InvalidData => "Invalid data",
        }
    }

    fn state(self) -> &'static str {
        match self {
            Self::NoData => "no-data",
            Self::InvalidData => "invalid-data",
        }
    }
}

/// Draws `{data, layout}` as static SVG with hand-computed scales.
///
/// Reads only the first trace; pie slices are drawn as bars. Never fails: unusable input yields a
/// "No data" or "Invalid data" placeholder document. The root element
/// carries `data-points` with the number of points drawn.
#[must_use]
pub fn draw_fallback(spec: &Value) -> String {
    let viewport = layout_viewport(spec).unwrap_or_default();
    let frame = match series_frame(spec, viewport) {
        Ok(frame) => frame,
        Err(placeholder) => placeholder_frame(viewport, placeholder),
    };

    SvgRenderer::new()
        .with_background(Color::rgb(1.0, 1.0, 1.0))
        .render_to_string(&frame)
        .or_else(|err| {
            debug!(error = %err, "fallback frame rejected; drawing placeholder");
            SvgRenderer::new()
                .render_to_string(&placeholder_frame(viewport, Placeholder::InvalidData))
        })
        .unwrap_or_else(|_| LAST_RESORT_MARKUP.to_owned())
}

fn layout_viewport(spec: &Value) -> ChartResult<Viewport> {
    let layout = &spec["layout"];
    viewport_from(layout["width"].as_f64(), layout["height"].as_f64())
}

fn series_frame(spec: &Value, viewport: Viewport) -> Result<RenderFrame, Placeholder> {
    let Some(trace) = spec["data"].as_array().and_then(|data| data.first()) else {
        return Err(Placeholder::NoData);
    };
    let Some((xs, ys)) = trace_columns(trace) else {
        let fields = ["x", "y", "labels", "values"];
        return Err(if fields.iter().all(|field| trace[*field].is_null()) {
            Placeholder::NoData
        } else {
            Placeholder::InvalidData
        });
    };
    if xs.is_empty() || ys.is_empty() {
        return Err(Placeholder::NoData);
    }
    let values = ys
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()
        .ok_or(Placeholder::InvalidData)?;
    let count = xs.len().min(values.len());
    let values = &values[..count];

    draw_series(spec, trace, xs, values, viewport).map_err(|err| {
        debug!(error = %err, "fallback series could not be laid out");
        Placeholder::InvalidData
    })
}

/// `x`/`y` columns, or `labels`/`values` for pie traces.
fn trace_columns(trace: &Value) -> Option<(&Vec<Value>, &Vec<Value>)> {
    match (trace["x"].as_array(), trace["y"].as_array()) {
        (Some(xs), Some(ys)) => Some((xs, ys)),
        _ => trace["labels"].as_array().zip(trace["values"].as_array()),
    }
}

fn draw_series(
    spec: &Value,
    trace: &Value,
    xs: &[Value],
    values: &[f64],
    viewport: Viewport,
) -> ChartResult<RenderFrame> {
    let layout = &spec["layout"];
    let count = values.len();
    let area = PlotArea::inset(viewport, 60.0, 20.0, 40.0, 50.0)?;
    let (y_min, y_max) = padded_extent(values.iter().copied(), 0.1)
        .ok_or_else(|| ChartError::InvalidData("no finite values".to_owned()))?;
    let y_scale = area.value_scale(y_min, y_max)?;

    let mut frame = RenderFrame::new(viewport)
        .with_annotation("fallback", "true")
        .with_annotation("points", count.to_string());
    push_value_grid(&mut frame, area, (y_min, y_max), true, GRID_COLOR);
    push_axes(&mut frame, area);

    let color = trace["marker"]["color"]
        .as_str()
        .or_else(|| trace["line"]["color"].as_str())
        .and_then(|color| Color::parse(color).ok())
        .unwrap_or(SERIES_COLOR);
    let is_bar = matches!(trace["type"].as_str(), Some("bar" | "pie"));
    let slot = area.width() / count as f64;
    let x_at = |index: usize| -> f64 {
        if is_bar {
            area.left + (index as f64 + 0.5) * slot
        } else if count == 1 {
            area.left + area.width() / 2.0
        } else {
            area.left + index as f64 * area.width() / (count - 1) as f64
        }
    };

    if is_bar {
        let baseline = y_scale.domain_to_pixel(0.0_f64.clamp(y_min, y_max))?;
        for (index, value) in values.iter().enumerate() {
            let y = y_scale.domain_to_pixel(*value)?;
            frame.rects.push(RectPrimitive::new(
                x_at(index) - slot * 0.4,
                y.min(baseline),
                slot * 0.8,
                (y - baseline).abs(),
                color,
            ));
        }
    } else {
        let points = values
            .iter()
            .enumerate()
            .map(|(index, value)| Ok((x_at(index), y_scale.domain_to_pixel(*value)?)))
            .collect::<ChartResult<Vec<_>>>()?;
        if points.len() > 1 {
            frame
                .polygons
                .push(PolygonPrimitive::polyline(points.clone(), 2.0, color));
        }
        for (x, y) in points {
            frame.circles.push(CirclePrimitive::new(x, y, 3.0, color));
        }
    }

    let step = count.div_ceil(MAX_X_LABELS).max(1);
    for (index, x) in xs.iter().take(count).enumerate().step_by(step) {
        push_x_label(&mut frame, area, x_at(index), &truncate_label(&value_label(x)));
    }

    push_title(&mut frame, title_text(&layout["title"]), TEXT_COLOR);
    push_axis_titles(
        &mut frame,
        area,
        title_text(&layout["xaxis"]["title"]),
        title_text(&layout["yaxis"]["title"]),
    );
    Ok(frame)
}

fn placeholder_frame(viewport: Viewport, placeholder: Placeholder) -> RenderFrame {
    RenderFrame::new(viewport)
        .with_annotation("fallback", "true")
        .with_annotation("points", "0")
        .with_annotation("state", placeholder.state())
        .with_text(TextPrimitive::new(
            placeholder.message(),
            f64::from(viewport.width) / 2.0,
            f64::from(viewport.height) / 2.0,
            14.0,
            TEXT_COLOR,
            TextHAlign::Center,
        ))
}

/// Titles arrive either as strings or as `{ "text": ... }` objects.
pub(crate) fn title_text(value: &Value) -> Option<&str> {
    value.as_str().or_else(|| value["text"].as_str())
}

pub(crate) fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn placeholder_for_missing_series() {
        let markup = draw_fallback(&json!({ "layout": {} }));
        assert!(markup.contains("No data"));
        assert!(markup.contains(r#"data-points="0""#));

        let markup = draw_fallback(&json!({ "data": [{ "x": [1], "y": ["a"] }] }));
        assert!(markup.contains("Invalid data"));
    }

    #[test]
    fn pie_slices_are_drawn_as_bars() {
        let markup = draw_fallback(&json!({
            "data": [{ "type": "pie", "labels": ["Alpha", "Beta", "Gamma"], "values": [-5, 3, 4] }]
        }));
        assert!(markup.contains(r#"data-points="3""#));
        assert!(markup.contains(">Alpha</text>"));
        assert!(!markup.contains("No data"));

        let markup = draw_fallback(&json!({ "data": [{ "type": "pie", "labels": ["a"] }] }));
        assert!(markup.contains("Invalid data"));
    }

    #[test]
    fn title_accepts_both_shapes() {
        assert_eq!(title_text(&json!("Sales")), Some("Sales"));
        assert_eq!(title_text(&json!({ "text": "Sales" })), Some("Sales"));
        assert_eq!(title_text(&Value::Null), None);
    }
}
