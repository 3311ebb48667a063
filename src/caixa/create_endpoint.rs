//! Defines the endpoint for creating a caixa.

use axum::extract::State;
use serde::Deserialize;

use crate::{
    Error,
    caixa::{Caixa, CaixaState, create_caixa},
    extract::Json,
};

/// The JSON body for creating or renaming a caixa.
#[derive(Debug, Default, Deserialize)]
pub struct CaixaInput {
    /// The display name of the caixa.
    pub name: Option<String>,
}

impl CaixaInput {
    pub(crate) fn name(&self) -> Result<&str, Error> {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::Validation("Nome do caixa é obrigatório.".to_owned())),
        }
    }
}

/// A route handler for creating a caixa, responds with the new caixa.
pub async fn create_caixa_endpoint(
    State(state): State<CaixaState>,
    Json(input): Json<CaixaInput>,
) -> Result<Json<Caixa>, Error> {
    let name = input.name()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let caixa = create_caixa(name, &connection)?;
    tracing::info!("created caixa {} ({})", caixa.name, caixa.key);

    Ok(Json(caixa))
}
