use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use expensify_rs::{ExpenseFields, SqliteDatabase, Store, UserId, initialize_db, start_add_expense};

/// A utility for creating a test database for expensify_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the user that owns the test expenses.
    #[arg(long, default_value = "test-user")]
    uid: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let uid = UserId::new(&args.uid)?;

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    let database = SqliteDatabase::new(Arc::new(Mutex::new(connection)));
    let store = Store::new();

    println!("Creating test expenses for user {uid}...");

    let four_days = 4 * 24 * 60 * 60 * 1000;
    let expenses = [
        ExpenseFields::default().description("Gum").amount(195),
        ExpenseFields::default()
            .description("Rent")
            .amount(109500)
            .created_at(-four_days),
        ExpenseFields::default()
            .description("Credit Card")
            .note("Paid in full")
            .amount(4500)
            .created_at(four_days),
    ];

    for fields in expenses {
        start_add_expense(&store, &database, &uid, fields).await?;
    }

    println!("Success!");

    Ok(())
}
