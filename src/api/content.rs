use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::EngineId;
use crate::spec::ChartSpec;

use super::sniff_engine;

/// One fenced code block found in message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Lowercased first word of the info string, if any.
    pub language: Option<String>,
    pub body: String,
}

/// A message resolved either to a chart or to plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Chart(ChartSpec),
    Text(String),
}

impl ContentBlock {
    #[must_use]
    pub fn as_chart(&self) -> Option<&ChartSpec> {
        match self {
            Self::Chart(spec) => Some(spec),
            Self::Text(_) => None,
        }
    }
}

const ENVELOPE_KIND: &str = "visualization";

#[derive(Debug, Deserialize)]
struct Envelope {
    library: String,
    spec: Value,
    #[serde(default)]
    meta: EnvelopeMeta,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeMeta {
    #[serde(default)]
    height: Option<f64>,
}

/// Lists fenced code blocks in order of appearance.
///
/// A fence left open runs to the end of the text.
#[must_use]
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(usize, Option<String>, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let fence_len = trimmed.chars().take_while(|ch| *ch == '`').count();

        let closes = |width: usize| fence_len >= width && trimmed[fence_len..].trim().is_empty();

        match open.take() {
            Some((width, language, body)) if closes(width) => {
                blocks.push(FencedBlock {
                    language,
                    body: body.join("\n"),
                });
            }
            Some((width, language, mut body)) => {
                body.push(line);
                open = Some((width, language, body));
            }
            None if fence_len >= 3 => {
                let language = trimmed[fence_len..]
                    .split_whitespace()
                    .next()
                    .map(str::to_ascii_lowercase);
                open = Some((fence_len, language, Vec::new()));
            }
            None => {}
        }
    }

    if let Some((_, language, body)) = open {
        blocks.push(FencedBlock {
            language,
            body: body.join("\n"),
        });
    }
    blocks
}

/// Parses a top-level `{kind: "visualization", library, spec, meta}`
/// envelope. Only the vector engine's library is honored; `meta.height`
/// overrides the layout height.
pub fn parse_envelope(text: &str) -> ChartResult<ChartSpec> {
    let document: Value = serde_json::from_str(text.trim())?;
    if document.get("kind").and_then(Value::as_str) != Some(ENVELOPE_KIND) {
        return Err(ChartError::MalformedSpec(
            "document is not a visualization envelope".to_owned(),
        ));
    }
    let envelope: Envelope = serde_json::from_value(document)?;

    if EngineId::from_tag(&envelope.library) != Some(EngineId::Vector) {
        return Err(ChartError::UnsupportedLibrary(envelope.library));
    }
    if !envelope.spec.is_object() {
        return Err(ChartError::MalformedSpec(
            "envelope spec must be an object".to_owned(),
        ));
    }

    let spec = ChartSpec::new(EngineId::Vector, envelope.spec);
    Ok(match envelope.meta.height {
        Some(height) if height.is_finite() && height > 0.0 => spec.with_height(height),
        _ => spec,
    })
}

/// Resolves message text to a chart spec when it carries one.
///
/// Shapes are tried in order: an envelope document, a fence tagged with an
/// engine name, then an untagged or `json` fence whose body is sniffed.
/// Anything malformed or unsupported falls through to [`ContentBlock::Text`].
#[must_use]
pub fn detect_visualization(text: &str) -> ContentBlock {
    match parse_envelope(text) {
        Ok(spec) => return ContentBlock::Chart(spec),
        Err(err @ ChartError::UnsupportedLibrary(_)) => {
            debug!(error = %err, "envelope rendered as text");
            return ContentBlock::Text(text.to_owned());
        }
        Err(_) => {}
    }

    let blocks = fenced_blocks(text);

    for block in &blocks {
        let Some(engine) = block.language.as_deref().and_then(EngineId::from_tag) else {
            continue;
        };
        match parse_object(&block.body) {
            Ok(spec) => return ContentBlock::Chart(ChartSpec::new(engine, spec)),
            Err(err) => debug!(%engine, error = %err, "tagged block is not a chart spec"),
        }
    }

    for block in &blocks {
        if !matches!(block.language.as_deref(), None | Some("json")) {
            continue;
        }
        let Ok(spec) = parse_object(&block.body) else {
            continue;
        };
        if let Some(engine) = sniff_engine(&spec) {
            return ContentBlock::Chart(ChartSpec::new(engine, spec));
        }
    }

    ContentBlock::Text(text.to_owned())
}

fn parse_object(body: &str) -> ChartResult<Value> {
    let value: Value = serde_json::from_str(body)?;
    if value.is_object() || value.is_array() {
        Ok(value)
    } else {
        Err(ChartError::MalformedSpec(
            "chart spec must be a JSON object or array".to_owned(),
        ))
    }
}
