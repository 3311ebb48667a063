//! Defines the endpoint for creating a user.

use axum::extract::State;
use serde::Deserialize;

use crate::{
    Error, PasswordHash,
    extract::Json,
    user::{NewUser, Role, User, UserState, create_user},
};

/// The JSON body for creating a user.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserInput {
    /// The unique name used to log in.
    pub username: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The raw password, hashed before it is stored.
    pub password: Option<String>,
    /// One of admin, tesoureiro or secretario.
    pub role: Option<String>,
}

/// Get the trimmed value of a required text field, or fail if it is missing or blank.
pub(crate) fn required(field: Option<&str>) -> Result<&str, Error> {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingFields),
    }
}

/// A route handler for creating a user, responds with the new user.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    Json(input): Json<CreateUserInput>,
) -> Result<Json<User>, Error> {
    let username = required(input.username.as_deref())?;
    let name = required(input.name.as_deref())?;
    let password = input
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or(Error::MissingFields)?;
    let role: Role = required(input.role.as_deref())?.parse()?;

    let password_hash = PasswordHash::from_raw_password(password, state.password_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(
        NewUser {
            username: username.to_owned(),
            name: name.to_owned(),
            password_hash,
            role,
        },
        &connection,
    )?;
    tracing::info!("created user {} with role {}", user.username, role.as_str());

    Ok(Json(user))
}
