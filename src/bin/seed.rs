use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use tesouraria::{
    ChurchDataInput, NewUser, PasswordHash, Role, ValidatedPassword, create_caixa, create_user,
    initialize_db, upsert_church_data,
};

/// The caixas every church starts with.
const DEFAULT_CAIXAS: [&str; 4] = ["Escola Bíblica", "Missões", "Missões do Campo", "Geral"];

/// A utility for creating a new treasury database with the default caixas and
/// an admin user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    match db_path.extension() {
        None => {
            eprintln!("Database path must include a file extension (e.g., 'tesouraria.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Database path must include a file extension (e.g., 'tesouraria.db').");
            exit(1);
        }
        _ => {}
    }

    if db_path.is_file() {
        eprintln!("File already exists at {db_path:#?}!");
        exit(1);
    }

    println!("Creating the admin user. Choose a password.");
    let Some(password_hash) = prompt_password_hash() else {
        return Ok(());
    };

    println!("Creating database at {db_path:#?}");
    let conn = Connection::open(db_path)?;
    initialize_db(&conn)?;

    for name in DEFAULT_CAIXAS {
        let caixa = create_caixa(name, &conn)?;
        println!("Created caixa {} ({})", caixa.name, caixa.key);
    }

    upsert_church_data(
        &ChurchDataInput {
            name: Some("Igreja".to_owned()),
            ..Default::default()
        },
        &conn,
    )?;
    println!("Created church profile \"Igreja\", edit it in the dashboard.");

    create_user(
        NewUser {
            username: "admin".to_owned(),
            name: "Administrador".to_owned(),
            password_hash,
            role: Role::Admin,
        },
        &conn,
    )?;
    println!("Created user admin.");

    println!("Success!");

    Ok(())
}

fn prompt_password_hash() -> Option<PasswordHash> {
    loop {
        let password = match rpassword::prompt_password("Admin password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(error) => {
                eprintln!("Could not read password from stdin: {error}");
                return None;
            }
        };

        let validated_password = match ValidatedPassword::new(&password) {
            Ok(validated_password) => validated_password,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        match PasswordHash::hash(&validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                eprintln!("Could not hash password: {error}. Try again.");
                continue;
            }
        }
    }
}
