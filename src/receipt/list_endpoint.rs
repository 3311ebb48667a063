use axum::extract::State;

use crate::{
    Error,
    extract::Json,
    receipt::{Receipt, ReceiptState, core::list_receipts},
};

/// A route handler that responds with every receipt, newest first.
pub async fn list_receipts_endpoint(
    State(state): State<ReceiptState>,
) -> Result<Json<Vec<Receipt>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    list_receipts(&connection).map(Json)
}
