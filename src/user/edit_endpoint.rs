//! Defines the endpoint for updating a user.

use axum::extract::State;
use serde::Deserialize;

use crate::{
    Error, PasswordHash,
    extract::{Json, Path},
    user::{
        Role, User, UserId, UserState,
        core::{update_password, update_user},
        create_endpoint::required,
    },
};

/// The JSON body for updating a user.
///
/// The password is only changed when one is given.
#[derive(Debug, Default, Deserialize)]
pub struct EditUserInput {
    /// The unique name used to log in.
    pub username: Option<String>,
    /// The display name.
    pub name: Option<String>,
    /// The new raw password.
    pub password: Option<String>,
    /// One of admin, tesoureiro or secretario.
    pub role: Option<String>,
}

/// A route handler for updating a user, responds with the updated user.
pub async fn edit_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<i64>,
    Json(input): Json<EditUserInput>,
) -> Result<Json<User>, Error> {
    let user_id = UserId::new(user_id);
    let username = required(input.username.as_deref())?;
    let name = required(input.name.as_deref())?;
    let role: Role = required(input.role.as_deref())?.parse()?;

    let password_hash = match input.password.as_deref() {
        Some(password) if !password.is_empty() => Some(PasswordHash::from_raw_password(
            password,
            state.password_cost,
        )?),
        _ => None,
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.unchecked_transaction()?;
    let user = update_user(user_id, username, name, role, &transaction)?;
    if let Some(password_hash) = password_hash {
        update_password(user_id, &password_hash, &transaction)?;
    }
    transaction.commit()?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_state, insert_test_user, test_server},
        user::{Role, User, get_credentials},
    };

    #[tokio::test]
    async fn updates_user_and_keeps_password() {
        let state = get_test_state();
        let user = insert_test_user(&state, "secretario");
        let server = test_server(state.clone());

        let response = server
            .put(&format_endpoint(endpoints::USER, user.id))
            .json(&json!({
                "username": "secretaria",
                "name": "Secretária",
                "role": "secretario",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<User>();
        assert_eq!(updated.username, "secretaria");
        assert_eq!(updated.role, Role::Secretario);

        let connection = state.db_connection.lock().unwrap();
        let (_, hash) = get_credentials("secretaria", &connection).unwrap();
        assert!(hash.verify(crate::test_utils::TEST_PASSWORD).unwrap());
    }

    #[tokio::test]
    async fn changes_password_when_given() {
        let state = get_test_state();
        let user = insert_test_user(&state, "secretario");
        let server = test_server(state.clone());

        server
            .put(&format_endpoint(endpoints::USER, user.id))
            .json(&json!({
                "username": "secretario",
                "name": "Secretário",
                "password": "turkeysgogobblegobble",
                "role": "secretario",
            }))
            .await
            .assert_status_ok();

        let connection = state.db_connection.lock().unwrap();
        let (_, hash) = get_credentials("secretario", &connection).unwrap();
        assert!(hash.verify("turkeysgogobblegobble").unwrap());
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let server = test_server(get_test_state());

        server
            .put(&format_endpoint(endpoints::USER, 42))
            .json(&json!({
                "username": "ninguem",
                "name": "Ninguém",
                "role": "admin",
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
