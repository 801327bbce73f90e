//! Expensify is an app for keeping track of what you spend.
//!
//! This library provides the client side of the app: a store holding the
//! user's expenses, the actions and reducer that change it, and action
//! creators that keep the store in sync with a remote database.

#![warn(missing_docs)]

mod db;
mod expense;
mod logging;
mod navigation;
mod remote;
mod store;
mod user;

#[cfg(test)]
mod test_utils;

pub use db::initialize as initialize_db;
pub use expense::{
    CreateExpensePage, EditExpensePage, Expense, ExpenseAction, ExpenseFields, ExpenseId,
    ExpenseUpdate, ExpensesState, add_expense, default_expenses_state, edit_expense,
    expenses_reducer, remove_expense, select_expense, set_expenses, start_add_expense,
    start_edit_expense, start_remove_expense, start_set_expenses,
};
pub use logging::init_logging;
pub use navigation::{DASHBOARD_VIEW, Navigator};
pub use remote::{
    DbPath, MemoryDatabase, RemoteDatabase, Snapshot, SqliteDatabase, compare_keys, expense_path,
    expenses_path,
};
pub use store::{Dispatch, Store};
pub use user::UserId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user ID was empty or could not be used to address the user's data.
    #[error("\"{0}\" is not a valid user ID")]
    InvalidUserId(String),

    /// A database path segment was empty or contained one of `.#$[]/`.
    #[error("\"{0}\" is not a valid database path segment")]
    InvalidPath(String),

    /// A record stored under the user's expenses could not be read as an
    /// expense.
    ///
    /// Callers should pass in the key of the record and the reason it was
    /// rejected.
    #[error("the expense \"{0}\" is not a valid record: {1}")]
    InvalidExpenseRecord(String, String),

    /// The requested expense was not found in the store.
    #[error("the requested expense could not be found")]
    NotFound,

    /// The remote database could not be reached.
    ///
    /// The string describes the cause and should only be logged, the user
    /// should be told to try again later.
    #[error("the remote database is unavailable: {0}")]
    RemoteUnavailable(String),

    /// An error occurred while converting between a struct and JSON.
    #[error("could not convert to or from JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
