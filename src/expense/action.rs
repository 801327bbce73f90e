//! The messages that may change the expense store.

use serde::{Deserialize, Serialize};

use crate::expense::{Expense, ExpenseId, ExpenseUpdate};

/// A request to change the expense store.
///
/// Actions serialize to JSON objects tagged by their `type`, e.g.
/// `{"type": "REMOVE_EXPENSE", "id": "123abc"}`. An object with any other
/// `type` deserializes to [ExpenseAction::Unknown], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseAction {
    /// Append an expense that already has its ID.
    AddExpense {
        /// The expense to add.
        expense: Expense,
    },
    /// Remove the expense with the given ID, if there is one.
    RemoveExpense {
        /// The ID of the expense to remove.
        id: ExpenseId,
    },
    /// Merge `updates` over the expense with the given ID, if there is one.
    EditExpense {
        /// The ID of the expense to edit.
        id: ExpenseId,
        /// The fields to change.
        updates: ExpenseUpdate,
    },
    /// Replace every expense in the store.
    SetExpenses {
        /// The new contents of the store.
        expenses: Vec<Expense>,
    },
    /// An action meant for some other part of the application.
    #[serde(other)]
    Unknown,
}

/// Create an action that appends `expense` to the store.
pub fn add_expense(expense: Expense) -> ExpenseAction {
    ExpenseAction::AddExpense { expense }
}

/// Create an action that removes the expense with `id` from the store.
pub fn remove_expense(id: ExpenseId) -> ExpenseAction {
    ExpenseAction::RemoveExpense { id }
}

/// Create an action that applies `updates` to the expense with `id`.
pub fn edit_expense(id: ExpenseId, updates: ExpenseUpdate) -> ExpenseAction {
    ExpenseAction::EditExpense { id, updates }
}

/// Create an action that replaces the store's contents with `expenses`.
pub fn set_expenses(expenses: Vec<Expense>) -> ExpenseAction {
    ExpenseAction::SetExpenses { expenses }
}
