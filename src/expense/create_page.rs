//! The surface for adding a new expense.

use crate::{
    Error, UserId,
    expense::{Expense, ExpenseFields, start_add_expense},
    navigation::{DASHBOARD_VIEW, Navigator},
    remote::RemoteDatabase,
    store::Dispatch,
};

/// Adds a new expense for the user.
pub struct CreateExpensePage<'a, D: ?Sized, R: ?Sized, N: ?Sized> {
    uid: &'a UserId,
    dispatcher: &'a D,
    database: &'a R,
    navigator: &'a N,
}

impl<'a, D, R, N> CreateExpensePage<'a, D, R, N>
where
    D: Dispatch + ?Sized,
    R: RemoteDatabase + ?Sized,
    N: Navigator + ?Sized,
{
    /// Open the page.
    pub fn new(uid: &'a UserId, dispatcher: &'a D, database: &'a R, navigator: &'a N) -> Self {
        Self {
            uid,
            dispatcher,
            database,
            navigator,
        }
    }

    /// Save the submitted form as a new expense, then go back to the dashboard.
    ///
    /// The user is sent to the dashboard whether or not the save succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from [start_add_expense].
    pub async fn on_submit(&self, fields: ExpenseFields) -> Result<Expense, Error> {
        let result = start_add_expense(self.dispatcher, self.database, self.uid, fields).await;

        self.navigator.push(DASHBOARD_VIEW);

        result
    }
}
