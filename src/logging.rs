//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::Response,
};
use serde_json::Value;

/// Bodies longer than this many bytes are truncated at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated and
/// the full body is logged at the `debug` level. Password fields in JSON
/// request bodies are replaced with asterisks.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = read_body(body).await;

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    let body_text = String::from_utf8_lossy(&body_bytes);

    if is_json {
        log_request(&parts, &redact_passwords(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = read_body(body).await;
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Bytes {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read body for logging: {error}");
            Bytes::new()
        }
    }
}

/// Replace the value of every `password` field in a JSON document.
///
/// Text that is not valid JSON is returned unchanged.
fn redact_passwords(json_text: &str) -> String {
    fn redact(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, value) in map.iter_mut() {
                    if key.to_lowercase().contains("password") {
                        *value = Value::String(REDACTED.to_owned());
                    } else {
                        redact(value);
                    }
                }
            }
            Value::Array(values) => values.iter_mut().for_each(redact),
            _ => {}
        }
    }

    match serde_json::from_str::<Value>(json_text) {
        Ok(mut value) => {
            redact(&mut value);
            value.to_string()
        }
        Err(_) => json_text.to_owned(),
    }
}

/// The longest prefix of `text` that fits in `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = (0..=limit)
        .rev()
        .find(|index| text.is_char_boundary(*index))
        .unwrap_or(0);

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}
