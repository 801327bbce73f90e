//! Expense management for the tracking application.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the partial `ExpenseFields`/`ExpenseUpdate` payloads
//! - The actions that change the store and the reducer that applies them
//! - Action creators that sync changes with the remote database
//! - The surfaces for creating, editing and removing expenses

mod action;
mod async_actions;
mod core;
mod create_page;
mod edit_page;
mod reducer;

pub use action::{ExpenseAction, add_expense, edit_expense, remove_expense, set_expenses};
pub use async_actions::{
    start_add_expense, start_edit_expense, start_remove_expense, start_set_expenses,
};
pub use core::{Expense, ExpenseFields, ExpenseId, ExpenseUpdate};
pub use create_page::CreateExpensePage;
pub use edit_page::EditExpensePage;
pub use reducer::{ExpensesState, default_expenses_state, expenses_reducer, select_expense};
