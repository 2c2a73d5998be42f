use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};
use crate::render::backends::merge_plot_defaults;
use crate::render::fallback::{FALLBACK_NOTICE, draw_fallback};
use crate::render::registry::{Activation, BackendRegistry, LoadTicket};
use crate::render::{EngineId, ExportFormat, RenderFrame, SvgRenderer};
use crate::spec::ChartSpec;

/// What a surface shows after a render request.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedOutput {
    /// Nothing to draw.
    Empty,
    /// The engine is still loading; show a placeholder until
    /// [`ChartSurface::poll_loads`] completes it.
    Loading { engine: EngineId, ticket: LoadTicket },
    Chart { engine: EngineId, markup: String },
    /// The vector engine failed and the fallback drew the same data.
    /// `error` is the vector engine's own message.
    Fallback {
        markup: String,
        notice: String,
        error: String,
    },
    /// A lazily loaded engine failed; there is no fallback for those.
    Failed { engine: EngineId, error: String },
}

impl RenderedOutput {
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Chart { markup, .. } | Self::Fallback { markup, .. } => Some(markup),
            Self::Empty | Self::Loading { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Image export parameters; missing sizes keep the chart's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl ExportRequest {
    #[must_use]
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            width: None,
            height: None,
            filename: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Requested filename (or `chart`) with the format extension appended
    /// when missing.
    #[must_use]
    pub fn resolved_filename(&self) -> String {
        let base = self
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("chart");
        let suffix = format!(".{}", self.format.extension());
        if base.to_ascii_lowercase().ends_with(&suffix) {
            base.to_owned()
        } else {
            format!("{base}{suffix}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// One chart instance: its own engine registry and the spec it shows.
///
/// Surfaces share nothing; two charts never draw into the same target.
#[derive(Debug, Default)]
pub struct ChartSurface {
    registry: BackendRegistry,
    current: Option<ChartSpec>,
}

impl ChartSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_registry(registry: BackendRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BackendRegistry {
        &mut self.registry
    }

    /// Spec of the last render request, if any.
    #[must_use]
    pub fn current(&self) -> Option<&ChartSpec> {
        self.current.as_ref()
    }

    /// Draws `chart` with its engine.
    ///
    /// No chart (or a null spec) yields [`RenderedOutput::Empty`]. Draw
    /// errors never escape: the vector engine fails over to the fallback
    /// renderer, lazily loaded engines report [`RenderedOutput::Failed`].
    pub fn render(&mut self, chart: Option<&ChartSpec>) -> RenderedOutput {
        let Some(chart) = chart.filter(|chart| !chart.spec().is_null()) else {
            self.current = None;
            return RenderedOutput::Empty;
        };
        self.current = Some(chart.clone());
        let engine = chart.engine();

        if let Activation::Pending(ticket) = self.registry.activate(engine) {
            debug!(%engine, "engine still loading");
            return RenderedOutput::Loading { engine, ticket };
        }
        let Some(backend) = self.registry.backend_mut(engine) else {
            return RenderedOutput::Failed {
                engine,
                error: ChartError::BackendUnavailable { engine }.to_string(),
            };
        };

        let drawn = backend
            .draw(chart.spec())
            .and_then(|frame| SvgRenderer::new().render_to_string(&frame));
        match drawn {
            Ok(markup) => RenderedOutput::Chart { engine, markup },
            Err(err) => {
                warn!(%engine, error = %err, "backend failed to draw");
                if engine == EngineId::Vector {
                    RenderedOutput::Fallback {
                        markup: draw_fallback(&merge_plot_defaults(chart.spec())),
                        notice: FALLBACK_NOTICE.to_owned(),
                        error: err.to_string(),
                    }
                } else {
                    RenderedOutput::Failed {
                        engine,
                        error: ChartError::BackendRender {
                            engine,
                            message: err.to_string(),
                        }
                        .to_string(),
                    }
                }
            }
        }
    }

    /// Renders the current spec again, e.g. once a pending load completed.
    pub fn refresh(&mut self) -> RenderedOutput {
        let current = self.current.take();
        self.render(current.as_ref())
    }

    /// Completes pending engine loads; returns how many became ready.
    pub fn poll_loads(&mut self) -> usize {
        self.registry.poll_loads()
    }

    /// Drops the current spec and tears down every engine. Loads still in
    /// flight are discarded when they complete.
    pub fn unmount(&mut self) {
        self.current = None;
        self.registry.teardown();
    }

    /// Exports the current chart as an image. Only the vector engine
    /// supports export.
    pub fn download_image(&mut self, request: &ExportRequest) -> ChartResult<ExportedImage> {
        let chart = self
            .current
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("no chart has been rendered".to_owned()))?;
        let engine = chart.engine();
        if engine != EngineId::Vector {
            return Err(ChartError::UnsupportedExport {
                engine,
                format: request.format,
            });
        }

        let spec = sized_spec(chart.spec(), request.width, request.height);
        let backend = self
            .registry
            .backend_mut(engine)
            .ok_or(ChartError::BackendUnavailable { engine })?;
        let frame = backend.draw(&spec)?;

        let bytes = match request.format {
            ExportFormat::Svg => SvgRenderer::new().render_to_string(&frame)?.into_bytes(),
            ExportFormat::Png => png_bytes(&frame)?,
        };
        let filename = request.resolved_filename();
        debug!(%filename, format = %request.format, bytes = bytes.len(), "chart exported");
        Ok(ExportedImage {
            filename,
            format: request.format,
            bytes,
        })
    }
}

fn sized_spec(spec: &Value, width: Option<u32>, height: Option<u32>) -> Value {
    let mut spec = spec.clone();
    if let Some(root) = spec.as_object_mut() {
        let layout = root
            .entry("layout")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Some(layout) = layout.as_object_mut() {
            if let Some(width) = width {
                layout.insert("width".to_owned(), Value::from(width));
            }
            if let Some(height) = height {
                layout.insert("height".to_owned(), Value::from(height));
            }
        }
    }
    spec
}

#[cfg(feature = "cairo-backend")]
fn png_bytes(frame: &RenderFrame) -> ChartResult<Vec<u8>> {
    use crate::render::{CairoRenderer, Renderer};

    let width = i32::try_from(frame.viewport.width).map_err(|_| ChartError::InvalidViewport {
        width: frame.viewport.width,
        height: frame.viewport.height,
    })?;
    let height =
        i32::try_from(frame.viewport.height).map_err(|_| ChartError::InvalidViewport {
            width: frame.viewport.width,
            height: frame.viewport.height,
        })?;
    let mut renderer = CairoRenderer::new(width, height)?;
    renderer.render(frame)?;
    renderer.png_bytes()
}

#[cfg(not(feature = "cairo-backend"))]
fn png_bytes(_frame: &RenderFrame) -> ChartResult<Vec<u8>> {
    Err(ChartError::UnsupportedExport {
        engine: EngineId::Vector,
        format: ExportFormat::Png,
    })
}
