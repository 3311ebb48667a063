//! Tesouraria is the bookkeeping back end for a church treasury.
//!
//! It records cash boxes ("caixas"), the entries and exits posted against
//! them, the receipts issued for those movements and the church profile used
//! to brand the receipts. Everything is exposed as a JSON REST API that is
//! consumed by the browser dashboard served from `static/`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod caixa;
mod church;
mod config;
mod database_id;
mod date;
mod db;
mod endpoints;
mod extract;
mod logging;
mod password;
mod receipt;
mod reference;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use caixa::{Caixa, create_caixa, derive_caixa_key};
pub use church::{ChurchData, ChurchDataInput, get_church_data, upsert_church_data};
pub use config::{Config, DEFAULT_PORT, MIN_PASSWORD_COST, database_path_from_url};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{
    NewUser, Role, User, UserId, create_user, get_user_by_username, update_password,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every variant maps to an HTTP status code and a JSON body of the form
/// `{"error": "..."}`. Messages are in Portuguese since they are shown
/// directly to the dashboard users.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A field failed validation, the message describes which one and why.
    #[error("{0}")]
    Validation(String),

    /// One or more of the required fields were missing or empty.
    #[error("Campos obrigatórios ausentes ou inválidos.")]
    MissingFields,

    /// A date string could not be parsed as `YYYY-MM-DD` or RFC 3339.
    #[error("Data inválida: {0}")]
    InvalidDate(String),

    /// The transaction or receipt type is not one of entrada/saida/transferencia.
    #[error("Tipo inválido: {0}")]
    InvalidTransactionType(String),

    /// The user role is not one of admin/tesoureiro/secretario.
    #[error("Perfil inválido: {0}")]
    InvalidRole(String),

    /// The caixa referenced by id or key does not exist.
    #[error("Caixa não encontrado")]
    UnknownCaixa,

    /// The destination caixa of a transfer does not exist.
    #[error("Caixa de destino não encontrado")]
    UnknownTransferTarget,

    /// The user referenced by id or username does not exist.
    #[error("Usuário não encontrado")]
    UnknownUser,

    /// The transaction a receipt should be linked to does not exist.
    #[error("Transação não encontrada")]
    UnknownTransaction,

    /// A caixa with the same derived key already exists.
    #[error("Já existe um caixa com esse nome.")]
    DuplicateCaixa,

    /// A user with the same username already exists.
    #[error("Nome de usuário já cadastrado.")]
    DuplicateUsername,

    /// The transaction already has a receipt linked to it.
    #[error("Esta transação já possui um recibo.")]
    DuplicateReceipt,

    /// An outgoing receipt needs the church name but no church profile exists.
    #[error("Nome da igreja não configurado")]
    ChurchNameMissing,

    /// Tried to delete a caixa that still has transactions posted against it.
    #[error("O caixa possui transações vinculadas e não pode ser excluído.")]
    CaixaInUse,

    /// Tried to delete a user that still has transactions or receipts.
    #[error("O usuário possui transações ou recibos vinculados e não pode ser excluído.")]
    UserInUse,

    /// The user provided a password that is too easy to guess.
    #[error("Senha muito fraca: {0}")]
    TooWeak(String),

    /// The username and password did not match a registered user.
    #[error("Usuário ou senha inválidos")]
    InvalidCredentials,

    /// The request did not carry the admin token.
    #[error("Não autorizado")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows. The
    /// payload names the resource, e.g. "Transação".
    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The CSV report could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Registro"),
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The status code the client receives for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::MissingFields
            | Error::InvalidDate(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidRole(_)
            | Error::UnknownCaixa
            | Error::UnknownTransferTarget
            | Error::UnknownUser
            | Error::UnknownTransaction
            | Error::DuplicateCaixa
            | Error::DuplicateUsername
            | Error::DuplicateReceipt
            | Error::ChurchNameMissing
            | Error::CaixaInUse
            | Error::UserInUse
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::CsvError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Erro interno do servidor".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_becomes_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_are_bad_requests() {
        assert_eq!(Error::DuplicateCaixa.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::DuplicateUsername.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::HashingError("secret detail".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(!body.contains("secret detail"), "got body {body}");
        assert!(body.contains("Erro interno do servidor"));
    }

    #[tokio::test]
    async fn church_name_missing_mentions_church() {
        let response = Error::ChurchNameMissing.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().to_lowercase().contains("igreja"));
    }
}
