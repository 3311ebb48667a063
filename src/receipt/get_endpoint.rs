use axum::extract::State;

use crate::{
    Error,
    database_id::ReceiptId,
    extract::{Json, Path},
    receipt::{Receipt, ReceiptState, get_receipt},
};

/// A route handler that responds with a single receipt, or 404.
pub async fn get_receipt_endpoint(
    State(state): State<ReceiptState>,
    Path(receipt_id): Path<ReceiptId>,
) -> Result<Json<Receipt>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_receipt(receipt_id, &connection).map(Json)
}
