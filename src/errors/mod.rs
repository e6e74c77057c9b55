//! Error types reaching the request boundary, and their mapping onto the
//! standard envelope.

pub mod exception;

pub use exception::ApiException;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::envelope::{Envelope, Errcode};

/// Detail payload of a validation failure. Validation layers report either
/// a plain human-readable string or a structured per-field breakdown.
#[derive(Debug, Clone)]
pub enum ValidationDetail {
    Text(String),
    Data(Value),
}

/// Everything a handler or store can fail with. Mapped to a response in
/// fixed priority order by the `IntoResponse` impl below.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage-layer integrity violation (unique/foreign-key/check).
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Request/validation failure from the framework layer. `summary` is
    /// the generic description used when the detail is structured.
    #[error("validation failed: {summary}")]
    Validation {
        summary: String,
        detail: ValidationDetail,
    },

    /// Business-rule violation carrying its own envelope data.
    #[error(transparent)]
    Api(#[from] ApiException),

    /// Anything unrecognized; handed to the platform fault path.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(summary: impl Into<String>, detail: ValidationDetail) -> Self {
        Self::Validation {
            summary: summary.into(),
            detail,
        }
    }
}

/// Unrecognized failures fall through to this plain 500. It deliberately
/// does not carry a JSON body, so the response normalizer leaves it alone.
fn platform_fault() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let built = match self {
            // 1. Integrity violations surface their own text under the
            //    generic failure code.
            ServiceError::Integrity(message) => {
                Envelope::of(Errcode::Failed).message(message).build()
            }

            // 2. Validation failures: a plain string becomes the message;
            //    structured detail keeps the summary and rides in context.
            ServiceError::Validation { summary, detail } => match detail {
                ValidationDetail::Text(text) => {
                    Envelope::of(Errcode::Failed).message(text).build()
                }
                ValidationDetail::Data(data) => Envelope::of(Errcode::Failed)
                    .message(summary)
                    .context(data)
                    .build(),
            },

            // 3. Business exceptions resolve their deferred envelope.
            ServiceError::Api(exc) => exc.into_envelope(),

            // 4. Everything else is not ours to dress up.
            ServiceError::Internal(err) => {
                error!("unhandled error reached the request boundary: {err:#}");
                return platform_fault();
            }
        };

        match built {
            Ok(envelope) => envelope.into_response(),
            Err(err) => {
                error!("broken envelope construction at the boundary: {err}");
                platform_fault()
            }
        }
    }
}

impl From<crate::envelope::EnvelopeError> for ServiceError {
    fn from(err: crate::envelope::EnvelopeError) -> Self {
        ServiceError::Internal(err.into())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
            {
                return ServiceError::Integrity(db.message().to_string());
            }
        }
        ServiceError::Internal(err.into())
    }
}
