use serde_json::Value;

use super::body::Envelope;
use super::codes::Errcode;

/// Whether a body already has the canonical envelope shape: a JSON object
/// carrying at least `code`, `message` and `data`.
pub fn is_standard(body: &Value) -> bool {
    body.as_object()
        .map(|map| {
            map.contains_key("code") && map.contains_key("message") && map.contains_key("data")
        })
        .unwrap_or(false)
}

/// Wrap a body into the canonical shape unless it is already standard.
///
/// Idempotent: the required-key check short-circuits, so normalizing twice
/// is the same as normalizing once. Bodies produced by paths that never
/// touched the envelope builder (framework defaults, bare handler output)
/// become the `data` of a fresh envelope built with `fallback`.
pub fn normalize(body: Value, fallback: Errcode) -> Value {
    if is_standard(&body) {
        return body;
    }

    let envelope = Envelope {
        code: fallback as i32,
        message: fallback.label().to_string(),
        data: body,
        context: None,
        extra: serde_json::Map::new(),
    };

    serde_json::to_value(envelope).unwrap_or(Value::Null)
}
