//! Guards the user management endpoints with a static bearer token.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{Error, auth::AuthState};

/// Middleware that rejects requests without `Authorization: Bearer <admin token>`.
///
/// When no admin token is configured every request is let through.
pub async fn admin_guard(
    State(state): State<AuthState>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(admin_token) = state.admin_token.as_deref() else {
        return next.run(request).await;
    };

    match authorization {
        Some(TypedHeader(Authorization(bearer))) if bearer.token() == admin_token => {
            next.run(request).await
        }
        _ => {
            tracing::warn!(
                "rejected {} {} without a valid admin token",
                request.method(),
                request.uri()
            );
            Error::Unauthorized.into_response()
        }
    }
}
