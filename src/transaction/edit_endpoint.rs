//! Defines the endpoint for editing a transaction.

use axum::extract::State;

use crate::{
    Error,
    database_id::TransactionId,
    extract::{Json, Path},
    transaction::{
        TransactionDetails, TransactionInput, TransactionState, get_transaction_details,
        update_transaction,
    },
};

/// A route handler that overwrites a transaction with the request body.
///
/// The body is validated exactly like a new transaction. Any `receipt` field is
/// ignored, the linked receipt is left as it was printed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(input): Json<TransactionInput>,
) -> Result<Json<TransactionDetails>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = input.resolve(&connection)?;
    update_transaction(transaction_id, &new_transaction, &connection)?;
    tracing::info!("updated transaction {transaction_id}");

    get_transaction_details(transaction_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            get_test_state, insert_test_caixa, insert_test_transaction, insert_test_user,
            test_server,
        },
        transaction::{TransactionDetails, TransactionType},
    };

    #[tokio::test]
    async fn updates_transaction() {
        let state = get_test_state();
        let user = insert_test_user(&state, "tesoureiro");
        let geral = insert_test_caixa(&state, "Geral");
        let missoes = insert_test_caixa(&state, "Missões");
        let transaction = insert_test_transaction(&state, &geral, &user);
        let server = test_server(state);

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .json(&json!({
                "type": "saida",
                "caixaId": missoes.id,
                "userId": user.id.as_i64(),
                "description": "Passagens",
                "amount": "45,90",
                "date": "2025-10-01",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<TransactionDetails>();
        assert_eq!(updated.transaction.id, transaction.id);
        assert_eq!(updated.transaction.transaction_type, TransactionType::Saida);
        assert_eq!(updated.transaction.amount, 45.9);
        assert_eq!(updated.caixa, missoes);
        assert_eq!(updated.transaction.description, "Passagens");
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        server
            .put(&format_endpoint(endpoints::TRANSACTION, 404))
            .json(&json!({
                "type": "saida",
                "caixa": "geral",
                "user": "tesoureiro",
                "amount": 1,
                "date": "2025-10-01",
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_body_is_bad_request() {
        let state = get_test_state();
        let user = insert_test_user(&state, "tesoureiro");
        let caixa = insert_test_caixa(&state, "Geral");
        let transaction = insert_test_transaction(&state, &caixa, &user);
        let server = test_server(state);

        server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .json(&json!({
                "type": "saida",
                "caixa": "geral",
                "user": "tesoureiro",
                "amount": 0,
                "date": "2025-10-01",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
