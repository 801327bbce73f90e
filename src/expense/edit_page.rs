//! The surface for changing or removing an existing expense.

use crate::{
    Error, UserId,
    expense::{
        Expense, ExpenseFields, ExpenseId, ExpenseUpdate, select_expense, start_edit_expense,
        start_remove_expense,
    },
    navigation::{DASHBOARD_VIEW, Navigator},
    remote::RemoteDatabase,
    store::Dispatch,
};

/// Edits or removes one of the user's expenses.
///
/// The page is built from the store's current expenses and keeps its own copy
/// of the expense it was opened for.
pub struct EditExpensePage<'a, D: ?Sized, R: ?Sized, N: ?Sized> {
    expense: Expense,
    uid: &'a UserId,
    dispatcher: &'a D,
    database: &'a R,
    navigator: &'a N,
}

impl<'a, D, R, N> EditExpensePage<'a, D, R, N>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
    N: Navigator + ?Sized,
{
    /// Open the page for the expense `id` found in `expenses`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if no expense in `expenses` has the ID `id`.
    pub fn new(
        expenses: &[Expense],
        id: &ExpenseId,
        uid: &'a UserId,
        dispatcher: &'a D,
        database: &'a R,
        navigator: &'a N,
    ) -> Result<Self, Error> {
        let expense = select_expense(expenses, id).cloned().ok_or_else(|| {
            tracing::debug!("Could not open edit page, there is no expense {id}");
            Error::NotFound
        })?;

        Ok(Self {
            expense,
            uid,
            dispatcher,
            database,
            navigator,
        })
    }

    /// The expense being edited, as it was when the page was opened.
    pub fn expense(&self) -> &Expense {
        &self.expense
    }

    /// Save the submitted form, then go back to the dashboard.
    ///
    /// The user is sent to the dashboard whether or not the save succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from [start_edit_expense].
    pub async fn on_submit(&self, fields: ExpenseFields) -> Result<(), Error> {
        let result = start_edit_expense(
            self.dispatcher,
            self.database,
            self.uid,
            self.expense.id.clone(),
            ExpenseUpdate::from(fields),
        )
        .await;

        self.navigator.push(DASHBOARD_VIEW);

        result
    }

    /// Delete the expense, then go back to the dashboard.
    ///
    /// The user is sent to the dashboard whether or not the delete succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from [start_remove_expense].
    pub async fn on_remove(&self) -> Result<(), Error> {
        let result = start_remove_expense(
            self.dispatcher,
            self.database,
            self.uid,
            self.expense.id.clone(),
        )
        .await;

        self.navigator.push(DASHBOARD_VIEW);

        result
    }
}
