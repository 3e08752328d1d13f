//! Walks Presentation API 2.x and 3.x manifest JSON.
//!
//! Works on `serde_json::Value` rather than typed structs: real manifests mix
//! `@id`/`id`, object/array `service` values and localized labels, and only a
//! handful of fields matter here.

use serde_json::Value;

use super::CanvasImage;

/// Parses a manifest body into its canvases, in manifest order.
pub(super) fn parse_canvases(body: &[u8]) -> Result<Vec<CanvasImage>, String> {
    let doc: Value = serde_json::from_slice(body).map_err(|e| format!("invalid JSON: {}", e))?;
    let root = doc
        .as_object()
        .ok_or_else(|| "manifest root is not a JSON object".to_string())?;

    if let Some(sequences) = root.get("sequences") {
        return parse_v2(sequences);
    }
    if let Some(items) = root.get("items") {
        return parse_v3(items);
    }
    Err("manifest has neither `sequences` nor `items`".to_string())
}

/// 2.x: `sequences[0].canvases[*].images[0].resource`.
fn parse_v2(sequences: &Value) -> Result<Vec<CanvasImage>, String> {
    let first = sequences
        .as_array()
        .ok_or_else(|| "`sequences` is not an array".to_string())?
        .first()
        .ok_or_else(|| "`sequences` is empty".to_string())?;
    let canvases = first
        .get("canvases")
        .and_then(Value::as_array)
        .ok_or_else(|| "sequence 0 has no `canvases` array".to_string())?;

    canvases
        .iter()
        .enumerate()
        .map(|(i, canvas)| {
            let resource = canvas
                .get("images")
                .and_then(Value::as_array)
                .and_then(|images| images.first())
                .and_then(|image| image.get("resource"))
                .ok_or_else(|| format!("canvas {} has no image resource", i))?;
            image_from_resource(i, canvas, resource)
        })
        .collect()
}

/// 3.x: `items[*]` (canvas) → `items[0]` (page) → `items[0]` (annotation) → `body`.
fn parse_v3(items: &Value) -> Result<Vec<CanvasImage>, String> {
    let canvases = items
        .as_array()
        .ok_or_else(|| "`items` is not an array".to_string())?;

    canvases
        .iter()
        .enumerate()
        .map(|(i, canvas)| {
            let body = first_item(canvas)
                .and_then(first_item)
                .and_then(|annotation| annotation.get("body"))
                .map(first_or_self)
                .ok_or_else(|| format!("canvas {} has no painting annotation body", i))?;
            image_from_resource(i, canvas, body)
        })
        .collect()
}

fn image_from_resource(index: usize, canvas: &Value, resource: &Value) -> Result<CanvasImage, String> {
    let resource_id = id_of(resource)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| format!("canvas {} image resource has no identifier", index))?;
    let service_id = resource
        .get("service")
        .map(first_or_self)
        .and_then(id_of)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string);

    Ok(CanvasImage {
        label: canvas.get("label").and_then(label_text),
        resource_id: resource_id.to_string(),
        service_id,
    })
}

fn first_item(value: &Value) -> Option<&Value> {
    value.get("items").and_then(Value::as_array).and_then(|a| a.first())
}

/// `service` and `body` may be a single object or an array of them.
fn first_or_self(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.first().unwrap_or(value),
        other => other,
    }
}

fn id_of(value: &Value) -> Option<&str> {
    value
        .get("@id")
        .or_else(|| value.get("id"))
        .and_then(Value::as_str)
}

/// 2.x labels are plain strings; 3.x labels are language maps (`{"en": ["..."]}`).
fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .values()
            .filter_map(Value::as_array)
            .flat_map(|values| values.iter())
            .find_map(Value::as_str)
            .map(str::to_string),
        Value::Array(values) => values.iter().find_map(label_text),
        _ => None,
    }
}
