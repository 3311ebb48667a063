//! Checks a username and password against the stored bcrypt hash.
//!
//! The dashboard expects a 200 response for bad credentials, with `success`
//! set to false, so [Error::InvalidCredentials] never reaches the client from
//! this endpoint.

use std::sync::Mutex;

use axum::extract::State;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash,
    auth::AuthState,
    extract::Json,
    user::{User, get_credentials},
};

/// The JSON body of a log-in request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogInInput {
    /// The username to log in as.
    pub username: Option<String>,
    /// The raw password.
    pub password: Option<String>,
}

/// The body of every log-in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the credentials were valid.
    pub success: bool,
    /// The user that logged in, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Why the log-in failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.to_owned()),
        }
    }
}

/// Check `password` against the stored hash of the user `username`.
///
/// The database lock is only held while looking up the credentials: the
/// bcrypt check runs after the guard is dropped, so a slow hash does not
/// block other requests.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the user does not exist or the
/// password does not match, or [Error::HashingError] if the stored hash
/// could not be checked.
pub fn authenticate(
    username: &str,
    password: &str,
    db_connection: &Mutex<Connection>,
) -> Result<User, Error> {
    let credentials = {
        let connection = db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        get_credentials(username, &connection)
    };

    let (user, password_hash) = credentials.map_err(|error| match error {
        Error::NotFound(_) => Error::InvalidCredentials,
        error => error,
    })?;

    check_password(user, &password_hash, password)
}

fn check_password(user: User, password_hash: &PasswordHash, password: &str) -> Result<User, Error> {
    match password_hash.verify(password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// A route handler for logging in.
///
/// Responds with 200 and `{success: true, user}` or `{success: false, message}`.
/// Only unexpected errors produce a 500.
pub async fn post_log_in(
    State(state): State<AuthState>,
    Json(input): Json<LogInInput>,
) -> Result<Json<AuthResponse>, Error> {
    let username = input.username.as_deref().map(str::trim).unwrap_or_default();
    let password = input.password.as_deref().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Ok(Json(AuthResponse::failure("Usuário e senha obrigatórios")));
    }

    match authenticate(username, password, &state.db_connection) {
        Ok(user) => {
            tracing::info!("log-in succeeded for {username}");
            Ok(Json(AuthResponse {
                success: true,
                user: Some(user),
                message: None,
            }))
        }
        Err(Error::InvalidCredentials) => {
            tracing::info!("log-in failed for {username}");
            Ok(Json(AuthResponse::failure(
                &Error::InvalidCredentials.to_string(),
            )))
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials for {username}: {error}");
            Err(error)
        }
    }
}

#[cfg(test)]
mod authenticate_tests {
    use crate::{
        Error, PasswordHash,
        test_utils::{TEST_PASSWORD, get_test_state, insert_test_user},
    };

    use super::{authenticate, check_password};

    #[test]
    fn correct_password_returns_user() {
        let state = get_test_state();
        let user = insert_test_user(&state, "tesoureiro");

        assert_eq!(
            authenticate("tesoureiro", TEST_PASSWORD, &state.db_connection),
            Ok(user)
        );
    }

    #[test]
    fn wrong_password_fails() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");

        assert_eq!(
            authenticate("tesoureiro", "wrongpassword", &state.db_connection),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn unknown_user_fails() {
        let state = get_test_state();

        assert_eq!(
            authenticate("ninguem", TEST_PASSWORD, &state.db_connection),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn password_is_checked_without_the_database() {
        let state = get_test_state();
        let user = insert_test_user(&state, "tesoureiro");
        let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, 4).unwrap();

        // Holding the lock here would deadlock if the hash check needed it.
        let _guard = state.db_connection.lock().unwrap();

        assert_eq!(
            check_password(user.clone(), &password_hash, TEST_PASSWORD),
            Ok(user.clone())
        );
        assert_eq!(
            check_password(user, &password_hash, "wrongpassword"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn lock_is_released_after_authenticating() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");

        authenticate("tesoureiro", TEST_PASSWORD, &state.db_connection).unwrap();

        assert!(state.db_connection.try_lock().is_ok());
    }
}
