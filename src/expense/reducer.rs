//! Folds expense actions into the list of expenses held by the store.

use std::sync::Arc;

use crate::expense::{Expense, ExpenseAction, ExpenseId};

/// The expenses held by the store.
///
/// A shared, immutable slice: every transition builds a new one and snapshots
/// taken earlier are never modified.
pub type ExpensesState = Arc<[Expense]>;

/// The state of the store before any action has been dispatched.
pub fn default_expenses_state() -> ExpensesState {
    Arc::from(Vec::new())
}

/// Compute the store's next state from its current `state` and an `action`.
///
/// Never fails. Transitions that change nothing (removing or editing an ID
/// that is not in the store, or an [ExpenseAction::Unknown]) return `state`
/// itself, so callers can use [Arc::ptr_eq] to detect no-ops.
pub fn expenses_reducer(state: ExpensesState, action: &ExpenseAction) -> ExpensesState {
    match action {
        ExpenseAction::AddExpense { expense } => state
            .iter()
            .cloned()
            .chain(std::iter::once(expense.clone()))
            .collect(),
        ExpenseAction::RemoveExpense { id } => {
            if !contains(&state, id) {
                return state;
            }

            state
                .iter()
                .filter(|expense| &expense.id != id)
                .cloned()
                .collect()
        }
        ExpenseAction::EditExpense { id, updates } => {
            if !contains(&state, id) {
                return state;
            }

            state
                .iter()
                .map(|expense| {
                    if &expense.id == id {
                        updates.apply(expense)
                    } else {
                        expense.clone()
                    }
                })
                .collect()
        }
        ExpenseAction::SetExpenses { expenses } => Arc::from(expenses.as_slice()),
        ExpenseAction::Unknown => state,
    }
}

/// Find the expense with `id` in `state`.
pub fn select_expense<'a>(state: &'a [Expense], id: &ExpenseId) -> Option<&'a Expense> {
    state.iter().find(|expense| &expense.id == id)
}

fn contains(state: &[Expense], id: &ExpenseId) -> bool {
    select_expense(state, id).is_some()
}
