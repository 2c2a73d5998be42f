use serde_json::Value;

use crate::render::EngineId;

/// Engine implied by the structure of an arbitrary JSON payload.
///
/// Checked in order:
/// - an array `data` plus a `layout`, or a `type` on `data[0]`: vector;
/// - a `type` string plus `data.labels`: canvas;
/// - a non-empty array of objects that all carry `x` and `y` (the payload
///   itself or its `data`): drawing.
#[must_use]
pub fn sniff_engine(payload: &Value) -> Option<EngineId> {
    if let Some(data) = payload.get("data").and_then(Value::as_array) {
        let first_has_type = data.first().is_some_and(|trace| trace.get("type").is_some());
        if payload.get("layout").is_some() || first_has_type {
            return Some(EngineId::Vector);
        }
    }

    let typed = payload.get("type").is_some_and(Value::is_string);
    if typed && payload["data"].get("labels").is_some() {
        return Some(EngineId::Canvas);
    }

    let rows = payload
        .as_array()
        .or_else(|| payload.get("data").and_then(Value::as_array));
    if rows.is_some_and(|rows| !rows.is_empty() && rows.iter().all(is_xy_row)) {
        return Some(EngineId::Drawing);
    }

    None
}

fn is_xy_row(row: &Value) -> bool {
    row.as_object()
        .is_some_and(|row| row.contains_key("x") && row.contains_key("y"))
}
