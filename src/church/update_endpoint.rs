//! Defines the endpoint for saving the church profile.

use axum::extract::State;

use crate::{
    Error,
    church::{ChurchData, ChurchDataInput, ChurchState, upsert_church_data},
    extract::Json,
};

/// A route handler that creates or overwrites the church profile.
pub async fn update_church_endpoint(
    State(state): State<ChurchState>,
    Json(input): Json<ChurchDataInput>,
) -> Result<Json<ChurchData>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let church = upsert_church_data(&input, &connection)?;
    tracing::info!("saved church profile \"{}\"", church.name);

    Ok(Json(church))
}
