//! Defines the endpoint for listing caixas.

use axum::extract::State;

use crate::{
    Error,
    caixa::{Caixa, CaixaState, list_caixas},
    extract::Json,
};

/// A route handler that responds with every caixa.
pub async fn list_caixas_endpoint(
    State(state): State<CaixaState>,
) -> Result<Json<Vec<Caixa>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let caixas = list_caixas(&connection)
        .inspect_err(|error| tracing::error!("could not list caixas: {error}"))?;

    Ok(Json(caixas))
}
