use serde_json::{Map, Value};
use std::fmt;

use crate::envelope::{Envelope, EnvelopeError, Errcode, RESERVED_FIELDS};

/// Business-rule violation raised deep in handler or store code and
/// resolved exactly once at the request boundary, where it turns into a
/// standard envelope.
///
/// Carries the same parameter set as the envelope builder; the envelope
/// itself is only assembled when the boundary consumes the exception.
#[derive(Debug, Clone)]
pub struct ApiException {
    code: Errcode,
    message: Option<String>,
    context: Option<Value>,
    fields: Map<String, Value>,
}

impl ApiException {
    pub fn new(code: Errcode) -> Self {
        Self {
            code,
            message: None,
            context: None,
            fields: Map::new(),
        }
    }

    /// Generic failure, for sites that have not assigned a specific code.
    pub fn failed() -> Self {
        Self::new(Errcode::Failed)
    }

    pub fn msg(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach an extra envelope field. Reserved names are rejected here,
    /// at the raise site, rather than at the boundary.
    pub fn field(
        mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Self, EnvelopeError> {
        let name = name.into();
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(EnvelopeError::ReservedField(name));
        }
        self.fields.insert(name, value);
        Ok(self)
    }

    pub fn code(&self) -> Errcode {
        self.code
    }

    /// Resolve the deferred envelope.
    pub fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        let mut builder = Envelope::of(self.code);
        if let Some(message) = self.message {
            builder = builder.message(message);
        }
        if let Some(context) = self.context {
            builder = builder.context(context);
        }
        for (name, value) in self.fields {
            builder = builder.field(name, value);
        }
        builder.build()
    }
}

impl fmt::Display for ApiException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for ApiException {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boundary_scenario_missing_params() {
        // Raised deep in business logic with a caller-facing message...
        let exc = ApiException::new(Errcode::MissingParams).msg("need id");

        // ...and resolved once at the boundary.
        let value = serde_json::to_value(exc.into_envelope().unwrap()).unwrap();
        assert_eq!(value["code"], -4001);
        assert_eq!(value["message"], "need id");
        assert_eq!(value["data"], Value::Null);
    }

    #[test]
    fn test_defaults_to_generic_failure() {
        let envelope = ApiException::failed().into_envelope().unwrap();
        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.message, "Fail");
    }

    #[test]
    fn test_reserved_field_rejected_at_raise_site() {
        let err = ApiException::failed()
            .field("message", json!("nope"))
            .unwrap_err();
        assert_eq!(err, EnvelopeError::ReservedField("message".to_string()));
    }

    #[test]
    fn test_context_and_fields_carry_through() {
        let exc = ApiException::new(Errcode::InvalidParams)
            .context(json!({"page": ["must be positive"]}))
            .field("hint", json!("page starts at 1"))
            .unwrap();
        let value = serde_json::to_value(exc.into_envelope().unwrap()).unwrap();
        assert_eq!(value["code"], -4002);
        assert_eq!(value["context"], json!({"page": ["must be positive"]}));
        assert_eq!(value["hint"], "page starts at 1");
    }
}
