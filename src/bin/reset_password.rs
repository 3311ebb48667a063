use std::{io, path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;

use tesouraria::{PasswordHash, ValidatedPassword, get_user_by_username, update_password};

/// Sets a new password for a dashboard user, e.g. when the treasurer forgot theirs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The treasury database, e.g. `tesouraria.db`.
    #[arg(long)]
    db_path: PathBuf,

    /// Who gets the new password.
    #[arg(long, short)]
    username: String,
}

fn main() {
    let args = Args::parse();

    if !args.db_path.is_file() {
        fail(format!("No database found at {}.", args.db_path.display()));
    }

    let connection = Connection::open(&args.db_path)
        .unwrap_or_else(|error| fail(format!("Could not open the database: {error}")));
    let user = get_user_by_username(&args.username, &connection)
        .unwrap_or_else(|error| fail(format!("No user {:?}: {error}", args.username)));

    println!("New password for {} ({}).", user.name, user.username);
    let Some(password) = ask_new_password() else {
        println!("Cancelled, the password was not changed.");
        return;
    };

    let password_hash = PasswordHash::hash(&password, PasswordHash::DEFAULT_COST)
        .unwrap_or_else(|error| fail(format!("Could not hash the password: {error}")));

    match update_password(user.id, &password_hash, &connection) {
        Ok(()) => println!("Password changed."),
        Err(error) => fail(format!("Could not save the password: {error}")),
    }
}

/// Ask until a strong password is typed twice. `None` when stdin is closed.
fn ask_new_password() -> Option<ValidatedPassword> {
    loop {
        let entered = read_secret("Password: ")?;
        let password = match ValidatedPassword::new(&entered) {
            Ok(password) => password,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        if read_secret("Repeat the password: ")? == entered {
            return Some(password);
        }
        eprintln!("The passwords differ, start again.");
    }
}

fn read_secret(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(secret) => Some(secret),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => fail(format!("Could not read from the terminal: {error}")),
    }
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    exit(1);
}
