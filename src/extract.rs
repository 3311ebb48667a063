//! Request extractors that reject with [Error], so that a malformed body or
//! path parameter gets the same `{"error": ...}` response as any other
//! validation failure.

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// A JSON request body or response.
///
/// Wraps [axum::Json], rejecting with [Error::Validation] instead of axum's
/// plain text 400/415/422 responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// A path parameter, rejecting with [Error::Validation] when it does not parse.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");
        Error::Validation(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path parameter: {rejection}");
        Error::Validation(format!("Parâmetro inválido: {}", rejection.body_text()))
    }
}
