//! Defines the endpoint for deleting a transaction.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::TransactionId,
    extract::{Json, Path},
    transaction::{TransactionState, delete_transaction},
};

/// A route handler for deleting a transaction and its receipt.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &connection)?;
    tracing::info!("deleted transaction {transaction_id}");

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        receipt::Receipt,
        test_utils::{
            get_test_state, insert_test_caixa, insert_test_transaction, insert_test_user,
            test_server,
        },
    };

    #[tokio::test]
    async fn deleting_transaction_removes_its_receipt() {
        let state = get_test_state();
        let user = insert_test_user(&state, "tesoureiro");
        let caixa = insert_test_caixa(&state, "Geral");
        let transaction = insert_test_transaction(&state, &caixa, &user);
        let server = test_server(state);
        let receipt = server
            .post(endpoints::RECEIPTS)
            .json(&json!({
                "name": "Doação",
                "type": "entrada",
                "amount": transaction.amount,
                "user": "tesoureiro",
                "transactionId": transaction.id,
            }))
            .await
            .json::<Receipt>();

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["success"], true);
        server
            .get(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format_endpoint(endpoints::RECEIPT, receipt.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let server = test_server(get_test_state());

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, 12))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
