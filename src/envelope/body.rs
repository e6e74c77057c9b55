use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::codes::Errcode;

/// Envelope keys that may only be set through the dedicated builder
/// parameters, never through `field()`.
pub const RESERVED_FIELDS: [&str; 4] = ["code", "message", "context", "data"];

/// Programmer errors caught while assembling an envelope. These never reach
/// a client; they indicate a broken call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("extra field `{0}` collides with a reserved envelope key")]
    ReservedField(String),

    #[error("envelope message must not be an empty string")]
    EmptyMessage,

    #[error("envelope field `{field}` must be {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },
}

/// The canonical response body every API outcome is wrapped in.
///
/// `code`, `message` and `data` are always present; `context` is dropped
/// from the serialized form when absent. Anything the builder accepted as
/// an extra field (`prev`, `next`, `pages`, ...) is flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Start building an envelope for the given code.
    pub fn of(code: Errcode) -> EnvelopeBuilder {
        EnvelopeBuilder {
            code,
            data: Value::Null,
            message: None,
            context: None,
            extra: Map::new(),
        }
    }

    /// Plain successful envelope: code [`Errcode::Done`], no extras.
    pub fn done(data: Value) -> Envelope {
        Envelope {
            code: Errcode::Done as i32,
            message: Errcode::Done.label().to_string(),
            data,
            context: None,
            extra: Map::new(),
        }
    }
}

impl IntoResponse for Envelope {
    /// The standard response path: fixed HTTP 200, JSON body. Callers are
    /// expected to branch on `code`.
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Assembles an [`Envelope`], enforcing the field-presence invariants at
/// build time. The single choke point all response paths funnel through.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    code: Errcode,
    data: Value,
    message: Option<String>,
    context: Option<Value>,
    extra: Map<String, Value>,
}

impl EnvelopeBuilder {
    /// Business data. Defaults to JSON null.
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Override the message. When not set, the code's label is used.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Diagnostic context for the caller's developers. A JSON null is
    /// treated as absent and omitted from the serialized envelope.
    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach an extra top-level field, e.g. pagination cursors.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn build(self) -> Result<Envelope, EnvelopeError> {
        let message = match self.message {
            Some(m) if m.is_empty() => return Err(EnvelopeError::EmptyMessage),
            Some(m) => m,
            None => self.code.label().to_string(),
        };

        for name in RESERVED_FIELDS {
            if self.extra.contains_key(name) {
                return Err(EnvelopeError::ReservedField(name.to_string()));
            }
        }

        if let Some(pages) = self.extra.get("pages") {
            if !pages.is_i64() && !pages.is_u64() {
                return Err(EnvelopeError::InvalidFieldType {
                    field: "pages".to_string(),
                    expected: "an integer",
                });
            }
        }

        // Pagination URLs are string-or-null, never "".
        for name in ["prev", "next"] {
            if let Some(value) = self.extra.get(name) {
                let valid = match value {
                    Value::Null => true,
                    Value::String(s) => !s.is_empty(),
                    _ => false,
                };
                if !valid {
                    return Err(EnvelopeError::InvalidFieldType {
                        field: name.to_string(),
                        expected: "a non-empty string or null",
                    });
                }
            }
        }

        let context = match self.context {
            Some(Value::Null) | None => None,
            present => present,
        };

        Ok(Envelope {
            code: self.code as i32,
            message,
            data: self.data,
            context,
            extra: self.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_keys_always_present() {
        let envelope = Envelope::of(Errcode::Done)
            .data(json!({"id": 7}))
            .build()
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["code"], 0);
        assert!(value["message"].is_string());
        assert!(!value["message"].as_str().unwrap().is_empty());
        assert_eq!(value["data"], json!({"id": 7}));
    }

    #[test]
    fn test_message_defaults_to_label() {
        let envelope = Envelope::of(Errcode::Failed).build().unwrap();
        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.message, "Fail");
        assert_eq!(envelope.data, Value::Null);
    }

    #[test]
    fn test_explicit_empty_message_is_rejected() {
        let err = Envelope::of(Errcode::Done).message("").build().unwrap_err();
        assert_eq!(err, EnvelopeError::EmptyMessage);
    }

    #[test]
    fn test_null_context_is_omitted() {
        let envelope = Envelope::of(Errcode::Done)
            .context(Value::Null)
            .build()
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(!value.as_object().unwrap().contains_key("context"));
    }

    #[test]
    fn test_present_context_is_kept() {
        let envelope = Envelope::of(Errcode::InvalidParams)
            .context(json!({"title": ["required"]}))
            .build()
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["context"], json!({"title": ["required"]}));
    }

    #[test]
    fn test_reserved_fields_are_rejected() {
        for name in RESERVED_FIELDS {
            let err = Envelope::of(Errcode::Done)
                .field(name, json!(1))
                .build()
                .unwrap_err();
            assert_eq!(err, EnvelopeError::ReservedField(name.to_string()));
        }
    }

    #[test]
    fn test_pages_must_be_an_integer() {
        let err = Envelope::of(Errcode::Done)
            .field("pages", json!("3"))
            .build()
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidFieldType { .. }));

        let envelope = Envelope::of(Errcode::Done)
            .field("pages", json!(3))
            .build()
            .unwrap();
        assert_eq!(serde_json::to_value(&envelope).unwrap()["pages"], 3);
    }

    #[test]
    fn test_pagination_urls_are_string_or_null() {
        let err = Envelope::of(Errcode::Done)
            .field("next", json!(""))
            .build()
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidFieldType { .. }));

        let envelope = Envelope::of(Errcode::Done)
            .field("prev", Value::Null)
            .field("next", json!("/notes?page=2"))
            .build()
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["prev"], Value::Null);
        assert_eq!(value["next"], "/notes?page=2");
    }

    #[test]
    fn test_extra_fields_are_flattened() {
        let envelope = Envelope::of(Errcode::Done)
            .data(json!([1, 2, 3]))
            .field("pages", json!(1))
            .field("total", json!(3))
            .build()
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["pages"], 1);
        assert_eq!(value["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_done_shorthand() {
        let value = serde_json::to_value(Envelope::done(json!("hi"))).unwrap();
        assert_eq!(value["code"], 0);
        assert_eq!(value["message"], "Done");
        assert_eq!(value["data"], "hi");
    }
}
