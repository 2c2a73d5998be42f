use thiserror::Error;

use crate::render::{EngineId, ExportFormat};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("malformed chart spec: {0}")]
    MalformedSpec(String),

    #[error("unsupported visualization library `{0}`")]
    UnsupportedLibrary(String),

    #[error("backend `{engine}` is not loaded")]
    BackendUnavailable { engine: EngineId },

    #[error("backend `{engine}` failed to render: {message}")]
    BackendRender { engine: EngineId, message: String },

    #[error("backend `{engine}` cannot export {format}")]
    UnsupportedExport {
        engine: EngineId,
        format: ExportFormat,
    },
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedSpec(err.to_string())
    }
}
