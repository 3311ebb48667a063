//! Defines the endpoint for renaming a caixa.

use axum::extract::State;

use crate::{
    Error,
    caixa::{Caixa, CaixaState, core::rename_caixa, create_endpoint::CaixaInput},
    extract::{Json, Path},
};

/// A route handler for renaming the caixa with `key`, responds with the updated caixa.
///
/// The key is never regenerated from the new name.
pub async fn edit_caixa_endpoint(
    State(state): State<CaixaState>,
    Path(key): Path<String>,
    Json(input): Json<CaixaInput>,
) -> Result<Json<Caixa>, Error> {
    let name = input.name()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(rename_caixa(&key, name, &connection)?))
}
