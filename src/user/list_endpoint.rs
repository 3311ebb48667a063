//! Defines the endpoint for listing users.

use axum::extract::State;

use crate::{
    Error,
    extract::Json,
    user::{User, UserState, core::list_users},
};

/// A route handler that responds with every user, without password hashes.
pub async fn list_users_endpoint(State(state): State<UserState>) -> Result<Json<Vec<User>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let users = list_users(&connection)
        .inspect_err(|error| tracing::error!("could not list users: {error}"))?;

    Ok(Json(users))
}
