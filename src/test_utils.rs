//! Helpers shared by the tests: an in-memory app and fixtures.

#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use time::macros::date;

use crate::{
    AppState, PasswordHash, build_router,
    caixa::{Caixa, create_caixa},
    transaction::{NewTransaction, Transaction, TransactionType, insert_transaction},
    user::{NewUser, Role, User, create_user},
};

/// The password of every user created by [insert_test_user].
pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest bcrypt cost, to keep the tests fast.
const TEST_PASSWORD_COST: u32 = 4;

pub fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, TEST_PASSWORD_COST, None).expect("Could not create app state.")
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

pub fn insert_test_user(state: &AppState, username: &str) -> User {
    let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, TEST_PASSWORD_COST)
        .expect("Could not hash test password.");

    create_user(
        NewUser {
            username: username.to_owned(),
            name: format!("Usuário {username}"),
            password_hash,
            role: Role::Tesoureiro,
        },
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test user.")
}

pub fn insert_test_caixa(state: &AppState, name: &str) -> Caixa {
    create_caixa(name, &state.db_connection.lock().unwrap()).expect("Could not create test caixa.")
}

/// Insert an entrada of 100.00 on 2025-09-22.
pub fn insert_test_transaction(state: &AppState, caixa: &Caixa, user: &User) -> Transaction {
    insert_transaction(
        &NewTransaction {
            transaction_type: TransactionType::Entrada,
            caixa_id: caixa.id,
            description: "Oferta".to_owned(),
            person: "Membro".to_owned(),
            amount: 100.0,
            date: date!(2025 - 09 - 22),
            transfer_to_id: None,
            user_id: user.id,
        },
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test transaction.")
}
