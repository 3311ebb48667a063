//! Defines the endpoint for reading the church profile.

use axum::extract::State;

use crate::{
    Error,
    church::{ChurchData, ChurchState, get_church_data},
    extract::Json,
};

/// A route handler that responds with the church profile, or `null` if it
/// has not been set up.
pub async fn get_church_endpoint(
    State(state): State<ChurchState>,
) -> Result<Json<Option<ChurchData>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_church_data(&connection).map(Json)
}
