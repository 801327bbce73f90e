//! Sets up the SQLite database that backs [crate::SqliteDatabase].

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, remote::create_node_table};

/// Create the tables for the application's database.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_node_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
