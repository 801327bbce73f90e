//! The container that holds the client's copy of the user's expenses.

use std::sync::Arc;

use tokio::sync::watch;

use crate::expense::{
    Expense, ExpenseAction, ExpensesState, default_expenses_state, expenses_reducer,
};

/// Something that accepts expense actions.
///
/// This is the only way surfaces and action creators change the store.
pub trait Dispatch: Send + Sync {
    /// Apply `action`.
    fn dispatch(&self, action: ExpenseAction);
}

/// Holds the current list of expenses and applies dispatched actions to it.
///
/// Each dispatch replaces the whole list with a new value, so a snapshot
/// returned by [Store::state] never changes after it is taken. Dispatches from
/// several tasks are applied one at a time in the order they acquire the
/// store.
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<ExpensesState>,
}

impl Store {
    /// Create a store with no expenses.
    pub fn new() -> Self {
        Self::with_state(default_expenses_state())
    }

    /// Create a store that starts with `expenses`.
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self::with_state(Arc::from(expenses))
    }

    fn with_state(state: ExpensesState) -> Self {
        let (state, _) = watch::channel(state);

        Self { state }
    }

    /// A snapshot of the current expenses.
    pub fn state(&self) -> ExpensesState {
        self.state.borrow().clone()
    }

    /// Watch the store for changes.
    ///
    /// The receiver is notified whenever a dispatch changes the expenses.
    /// Actions that leave the store as it was do not notify.
    pub fn subscribe(&self) -> watch::Receiver<ExpensesState> {
        self.state.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: ExpenseAction) {
        tracing::debug!("Dispatching {action:?}");

        self.state.send_if_modified(|state| {
            let next_state = expenses_reducer(state.clone(), &action);
            let changed = !Arc::ptr_eq(state, &next_state);
            *state = next_state;

            changed
        });
    }
}
