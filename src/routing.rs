//! Application router configuration with guarded and open route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, Error,
    auth::{admin_guard, post_log_in},
    caixa::{
        create_caixa_endpoint, delete_caixa_endpoint, edit_caixa_endpoint, get_balances_endpoint,
        list_caixas_endpoint,
    },
    church::{get_church_endpoint, update_church_endpoint},
    endpoints,
    receipt::{
        create_receipt_endpoint, get_receipt_endpoint, get_receipt_print_page,
        list_receipts_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_transactions_endpoint, get_transaction_endpoint, list_transactions_endpoint,
    },
    user::{create_user_endpoint, delete_user_endpoint, edit_user_endpoint, list_users_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    // Creating, editing and deleting users needs the admin token when one is configured.
    let admin_routes = Router::new()
        .route(endpoints::USERS, post(create_user_endpoint))
        .route(
            endpoints::USER,
            put(edit_user_endpoint).delete(delete_user_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard));

    let api_routes = Router::new()
        .route(endpoints::AUTH, post(post_log_in))
        .route(endpoints::USERS, get(list_users_endpoint))
        .route(
            endpoints::CAIXAS,
            get(list_caixas_endpoint).post(create_caixa_endpoint),
        )
        .route(
            endpoints::CAIXA,
            put(edit_caixa_endpoint).delete(delete_caixa_endpoint),
        )
        .route(endpoints::BALANCES, get(get_balances_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::RECEIPTS,
            get(list_receipts_endpoint).post(create_receipt_endpoint),
        )
        .route(endpoints::RECEIPT, get(get_receipt_endpoint))
        .route(endpoints::RECEIPT_PRINT, get(get_receipt_print_page))
        .route(
            endpoints::CHURCH,
            get(get_church_endpoint).put(update_church_endpoint),
        );

    api_routes
        .merge(admin_routes)
        .route(endpoints::ROOT, get(get_index_page))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD)
}

async fn get_404_not_found() -> Error {
    Error::NotFound("Recurso")
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD);
    }
}
