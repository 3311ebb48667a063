//! Command line and environment configuration for the server.

use clap::{ArgAction, Parser};

use crate::PasswordHash;

/// The port the server listens on when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3001;

/// The lowest bcrypt cost accepted for hashing passwords.
pub const MIN_PASSWORD_COST: u32 = 10;

/// The REST API server for the church treasury.
///
/// Every option can also be set through the environment variable named next
/// to it, or in a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The SQLite database, e.g. `tesouraria.db` or `sqlite://data/tesouraria.db`.
    #[arg(long, env = "DATABASE_URL", default_value = "tesouraria.db")]
    pub database_url: String,

    /// The bearer token required to create, edit and delete users.
    #[arg(long, env = "ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Log request and response bodies.
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_truthy,
    )]
    pub debug: bool,

    /// The bcrypt cost for hashing new passwords.
    #[arg(
        long,
        env = "PASSWORD_COST",
        default_value_t = PasswordHash::DEFAULT_COST,
        value_parser = parse_password_cost,
    )]
    pub password_cost: u32,
}

impl Config {
    /// The path of the database file, see [database_path_from_url].
    pub fn database_path(&self) -> &str {
        database_path_from_url(&self.database_url)
    }

    /// The admin token, treating an empty value as unset.
    pub fn admin_token(&self) -> Option<String> {
        self.admin_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    }
}

/// Strip the `sqlite://`, `sqlite:` or `file:` scheme from a database URL.
///
/// Plain paths are returned as is.
pub fn database_path_from_url(database_url: &str) -> &str {
    ["sqlite://", "sqlite:", "file:"]
        .into_iter()
        .find_map(|scheme| database_url.strip_prefix(scheme))
        .unwrap_or(database_url)
}

fn parse_truthy(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected true or false, got {other:?}")),
    }
}

fn parse_password_cost(value: &str) -> Result<u32, String> {
    let cost: u32 = value
        .trim()
        .parse()
        .map_err(|error| format!("invalid password cost {value:?}: {error}"))?;

    if (MIN_PASSWORD_COST..=31).contains(&cost) {
        Ok(cost)
    } else {
        Err(format!(
            "password cost must be between {MIN_PASSWORD_COST} and 31, got {cost}"
        ))
    }
}
