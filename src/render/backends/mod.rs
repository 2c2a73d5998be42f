//! Engine backends: each turns its engine-native spec into a `RenderFrame`.

mod canvas;
mod drawing;
mod marks;
mod vector;

use std::fmt;

use serde_json::Value;

use crate::error::ChartResult;
use crate::render::{EngineId, RenderFrame};

pub use canvas::{CanvasBackend, CanvasShape};
pub use drawing::DrawingBackend;
pub use vector::{VectorBackend, merge_plot_defaults};

/// Contract shared by the three rendering engines.
///
/// `draw` receives the spec exactly as built or sniffed; backends own their
/// schema parsing and report anything they cannot draw as an error.
pub trait ChartBackend: fmt::Debug + Send {
    fn engine(&self) -> EngineId;

    fn draw(&mut self, spec: &Value) -> ChartResult<RenderFrame>;

    /// Releases whatever the backend keeps for its target.
    fn teardown(&mut self) {}
}

/// Fresh backend instance for `engine`.
#[must_use]
pub fn create_backend(engine: EngineId) -> Box<dyn ChartBackend> {
    match engine {
        EngineId::Vector => Box::new(VectorBackend::default()),
        EngineId::Canvas => Box::new(CanvasBackend::default()),
        EngineId::Drawing => Box::new(DrawingBackend::default()),
    }
}
