//! Action creators that write to the remote database before changing the
//! store.
//!
//! Each function performs exactly one remote operation and, only if it
//! succeeds, dispatches the matching action. On failure the error is returned
//! and nothing is dispatched, so the store never shows a change the database
//! did not accept. There is no retry and no timeout.

use serde_json::{Map, Value};

use crate::{
    Error, UserId,
    expense::{
        Expense, ExpenseFields, ExpenseId, ExpenseUpdate, add_expense, edit_expense,
        remove_expense, set_expenses,
    },
    remote::{RemoteDatabase, Snapshot, expense_path, expenses_path},
    store::Dispatch,
};

/// Save a new expense under a generated ID, then add it to the store.
///
/// `fields` may be partially filled, whatever was left at its default is saved
/// as the default.
///
/// # Errors
///
/// Returns an error if the database could not be written.
pub async fn start_add_expense<D, R>(
    dispatcher: &D,
    database: &R,
    uid: &UserId,
    fields: ExpenseFields,
) -> Result<Expense, Error>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
{
    let value = serde_json::to_value(&fields)?;

    let key = database
        .push(&expenses_path(uid), value)
        .await
        .inspect_err(|error| tracing::error!("Could not add expense for user {uid}: {error}"))?;

    let expense = fields.with_id(ExpenseId::new(key));
    tracing::info!("Added expense {} for user {uid}", expense.id);

    dispatcher.dispatch(add_expense(expense.clone()));

    Ok(expense)
}

/// Delete the expense `id` from the database, then from the store.
///
/// Deleting an expense that does not exist succeeds.
///
/// # Errors
///
/// Returns an error if `id` is not a valid key or the database could not be
/// written.
pub async fn start_remove_expense<D, R>(
    dispatcher: &D,
    database: &R,
    uid: &UserId,
    id: ExpenseId,
) -> Result<(), Error>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
{
    database
        .remove(&expense_path(uid, &id)?)
        .await
        .inspect_err(|error| tracing::error!("Could not remove expense {id}: {error}"))?;

    tracing::info!("Removed expense {id} for user {uid}");
    dispatcher.dispatch(remove_expense(id));

    Ok(())
}

/// Apply `updates` to the expense `id` in the database, then in the store.
///
/// # Errors
///
/// Returns an error if `id` is not a valid key or the database could not be
/// written.
pub async fn start_edit_expense<D, R>(
    dispatcher: &D,
    database: &R,
    uid: &UserId,
    id: ExpenseId,
    updates: ExpenseUpdate,
) -> Result<(), Error>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
{
    let fields = update_fields(&updates)?;

    database
        .update(&expense_path(uid, &id)?, fields)
        .await
        .inspect_err(|error| tracing::error!("Could not update expense {id}: {error}"))?;

    tracing::info!("Updated expense {id} for user {uid}");
    dispatcher.dispatch(edit_expense(id, updates));

    Ok(())
}

/// Fetch all of the user's expenses and replace the store's contents with
/// them.
///
/// Expenses are listed in key order and each takes its key as its ID.
/// Stored records that are not valid expenses are logged and left out.
///
/// # Errors
///
/// Returns an error if the database could not be read.
pub async fn start_set_expenses<D, R>(
    dispatcher: &D,
    database: &R,
    uid: &UserId,
) -> Result<Vec<Expense>, Error>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
{
    let snapshot = database
        .get(&expenses_path(uid))
        .await
        .inspect_err(|error| tracing::error!("Could not fetch expenses for user {uid}: {error}"))?;

    let expenses = snapshot
        .children()
        .iter()
        .filter_map(|child| {
            map_expense_snapshot(child)
                .inspect_err(|error| tracing::warn!("Skipping expense for user {uid}: {error}"))
                .ok()
        })
        .collect::<Vec<_>>();

    tracing::info!("Fetched {} expenses for user {uid}", expenses.len());
    dispatcher.dispatch(set_expenses(expenses.clone()));

    Ok(expenses)
}

fn update_fields(updates: &ExpenseUpdate) -> Result<Map<String, Value>, Error> {
    match serde_json::to_value(updates)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::JSONSerializationError(format!(
            "expected expense updates to serialize to an object, got {other}"
        ))),
    }
}

/// Map a child of the expenses path to an expense whose ID is the child's key.
fn map_expense_snapshot(snapshot: &Snapshot) -> Result<Expense, Error> {
    let key = snapshot.key().unwrap_or_default().to_owned();
    let value = snapshot.val().cloned().unwrap_or(Value::Null);

    let fields: ExpenseFields = serde_json::from_value(value)
        .map_err(|error| Error::InvalidExpenseRecord(key.clone(), error.to_string()))?;

    Ok(fields.with_id(ExpenseId::new(key)))
}
