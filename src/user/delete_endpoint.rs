//! Defines the endpoint for deleting a user.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    extract::{Json, Path},
    user::{UserId, UserState, core::delete_user},
};

/// A route handler for deleting a user.
///
/// Users that recorded transactions or receipts cannot be deleted, since that
/// would leave those records without an author.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_user(UserId::new(user_id), &connection)?;
    tracing::info!("deleted user {user_id}");

    Ok(Json(json!({ "message": "Usuário excluído com sucesso" })))
}
