use serde_json::Value;
use tracing::trace;

use crate::error::ChartResult;
use crate::render::backends::ChartBackend;
use crate::render::backends::marks::{MarkKind, Series, XyChart, draw_xy, palette_color};
use crate::render::chrome::viewport_from;
use crate::render::{Color, EngineId, RenderFrame};
use crate::spec::drawing::DrawingSpec;

/// Low-level-drawing engine over raw `{x, y}` rows.
///
/// Owns its target: every draw clears it before redrawing, so the last
/// spec drawn always wins. Teardown clears it for good.
#[derive(Debug, Default)]
pub struct DrawingBackend {
    target: Option<RenderFrame>,
    redraws: u64,
}

impl DrawingBackend {
    #[must_use]
    pub fn target(&self) -> Option<&RenderFrame> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl ChartBackend for DrawingBackend {
    fn engine(&self) -> EngineId {
        EngineId::Drawing
    }

    fn draw(&mut self, spec: &Value) -> ChartResult<RenderFrame> {
        self.target = None;

        let spec = DrawingSpec::from_value(spec)?;
        let mut chart = XyChart::new(viewport_from(spec.width, spec.height)?);
        chart.title = spec.title.clone();
        chart.x_title = spec.x_label.clone();
        chart.y_title = spec.y_label.clone();

        let color = match spec.color.as_deref() {
            Some(color) => Color::parse(color)?,
            None => palette_color(0),
        };
        let kind = if spec.draws_bars() {
            MarkKind::Bar
        } else {
            MarkKind::Line
        };
        let (xs, ys): (Vec<Value>, Vec<f64>) = spec
            .data
            .into_iter()
            .map(|datum| (datum.x, datum.y))
            .unzip();
        chart.series.push(Series::new(kind, xs, ys, color));

        let frame = draw_xy(&chart)?.with_annotation("engine", EngineId::Drawing.as_str());
        self.target = Some(frame.clone());
        self.redraws += 1;
        trace!(redraws = self.redraws, "drawing target redrawn");
        Ok(frame)
    }

    fn teardown(&mut self) {
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failed_redraw_leaves_target_cleared() {
        let mut backend = DrawingBackend::default();
        backend
            .draw(&json!({ "type": "bar", "data": [{ "x": "A", "y": 1 }] }))
            .expect("bar draws");
        assert!(backend.target().is_some());

        assert!(backend.draw(&json!({ "data": [{ "x": "A" }] })).is_err());
        assert!(backend.target().is_none());
        assert_eq!(backend.redraws(), 1);
    }

    #[test]
    fn bare_rows_draw_as_a_line() {
        let mut backend = DrawingBackend::default();
        let frame = backend
            .draw(&json!([{ "x": "a", "y": 1 }, { "x": "b", "y": 2 }]))
            .expect("bare rows draw");
        assert!(!frame.polygons.is_empty());
        assert_eq!(backend.redraws(), 1);

        assert!(backend.draw(&json!([{ "x": "a", "y": "high" }])).is_err());
    }
}
