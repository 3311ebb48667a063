//! Defines the endpoint for deleting a caixa.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    caixa::{CaixaState, core::delete_caixa},
    extract::{Json, Path},
};

/// A route handler for deleting the caixa with `key`.
///
/// Caixas with transactions are kept so the ledger never points at a missing caixa.
pub async fn delete_caixa_endpoint(
    State(state): State<CaixaState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_caixa(&key, &connection)?;
    tracing::info!("deleted caixa {key}");

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            get_test_state, insert_test_caixa, insert_test_transaction, insert_test_user,
            test_server,
        },
    };

    #[tokio::test]
    async fn deletes_empty_caixa() {
        let state = get_test_state();
        let caixa = insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        let response = server
            .delete(&format_endpoint(endpoints::CAIXA, &caixa.key))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["success"], true);
        assert!(
            server
                .get(endpoints::CAIXAS)
                .await
                .json::<Vec<Value>>()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn caixa_with_transactions_is_kept() {
        let state = get_test_state();
        let caixa = insert_test_caixa(&state, "Geral");
        let user = insert_test_user(&state, "tesoureiro");
        insert_test_transaction(&state, &caixa, &user);
        let server = test_server(state);

        server
            .delete(&format_endpoint(endpoints::CAIXA, &caixa.key))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let server = test_server(get_test_state());

        server
            .delete(&format_endpoint(endpoints::CAIXA, "naoexiste"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
