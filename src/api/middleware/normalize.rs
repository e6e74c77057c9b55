use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::error;

use crate::envelope::{normalize, Errcode};

/// Completion code for a response that did not choose its own: derived
/// once per request from the transport status and the request method.
fn completion_code(method: &Method, status: StatusCode) -> Errcode {
    if !status.is_success() {
        Errcode::Failed
    } else if method.is_safe() {
        Errcode::Done
    } else {
        Errcode::Succeed
    }
}

/// Outermost response boundary: every JSON body leaving the service gets
/// the canonical envelope shape.
///
/// Responses that already carry a standard body pass through unchanged, so
/// a handler-chosen code always wins over the method-derived one. OPTIONS,
/// bodiless 204s and non-JSON payloads are left alone; the original HTTP
/// status is preserved either way.
/// The OpenAPI document and its UI assets are consumed by Swagger UI, not
/// by envelope-aware clients, and must leave the service verbatim.
const DOCS_PREFIX: &str = "/api-docs";

pub async fn normalize_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let is_docs = request.uri().path().starts_with(DOCS_PREFIX);
    let response = next.run(request).await;

    if method == Method::OPTIONS || is_docs {
        return response;
    }

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return response;
    }

    // Unset content type counts as JSON: framework fallbacks (404 and
    // friends) produce empty untyped bodies that still need wrapping.
    let is_json = match response.headers().get(header::CONTENT_TYPE) {
        None => true,
        Some(value) => value
            .to_str()
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false),
    };
    if !is_json {
        return response;
    }

    let code = completion_code(&method, status);

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("failed to buffer response body for normalization: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body_value = if bytes.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            // Claimed JSON but is not; reattach untouched.
            Err(_) => return Response::from_parts(parts, Body::from(bytes)),
        }
    };

    let normalized = normalize(body_value, code);
    let payload = match serde_json::to_vec(&normalized) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to serialize normalized response body: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(payload))
}
