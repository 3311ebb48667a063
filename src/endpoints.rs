//! The API endpoints URIs.
//!
//! Paths with a parameter, e.g. '/api/users/{user_id}', are filled in by `format_endpoint` in tests.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard entry page.
pub const DASHBOARD: &str = "/static/index.html";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for checking a username and password.
pub const AUTH: &str = "/api/auth";
/// The route to list and create users.
pub const USERS: &str = "/api/users";
/// The route to update or delete a user.
pub const USER: &str = "/api/users/{user_id}";
/// The route to list and create caixas.
pub const CAIXAS: &str = "/api/caixas";
/// The route to rename or delete a caixa.
pub const CAIXA: &str = "/api/caixas/{key}";
/// The route for the balance of every caixa.
pub const BALANCES: &str = "/api/balances";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for downloading transactions as CSV.
pub const TRANSACTIONS_EXPORT: &str = "/api/transactions/export";
/// The route to list and create receipts.
pub const RECEIPTS: &str = "/api/receipts";
/// The route to get a single receipt.
pub const RECEIPT: &str = "/api/receipts/{receipt_id}";
/// The route for the printable version of a receipt.
pub const RECEIPT_PRINT: &str = "/api/receipts/{receipt_id}/print";
/// The route for the church profile.
pub const CHURCH: &str = "/api/church";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Only the first `{...}` segment is replaced. If there is no parameter the
/// path is returned unchanged.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_endpoint(endpoints::TRANSACTION, 1), "/api/transactions/1");
/// ```
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let (Some(start), Some(end)) = (endpoint_path.find('{'), endpoint_path.find('}')) else {
        return endpoint_path.to_owned();
    };

    format!(
        "{}{}{}",
        &endpoint_path[..start],
        id,
        &endpoint_path[end + 1..]
    )
}
