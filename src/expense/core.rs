//! Defines the core data models for expenses.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

// ============================================================================
// MODELS
// ============================================================================

/// The key an expense is stored under in the remote database.
///
/// IDs are opaque: they are generated by the database when the expense is
/// first pushed and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Wrap an existing key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for ExpenseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Money that was spent, as known to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A short text description of what the money was spent on.
    pub description: String,
    /// Free-form notes.
    pub note: String,
    /// The amount spent, in cents.
    pub amount: i64,
    /// When the expense happened, in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Expense {
    /// The fields of the expense without its ID, i.e. what is stored in the
    /// remote database under the expense's key.
    pub fn fields(&self) -> ExpenseFields {
        ExpenseFields {
            description: self.description.clone(),
            note: self.note.clone(),
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

/// The data of an expense without an ID.
///
/// Missing fields are defaulted when deserializing, so `{}` is a valid,
/// empty expense. Use the builder methods to fill in the fields you have:
///
/// ```
/// use expensify_rs::ExpenseFields;
///
/// let fields = ExpenseFields::default()
///     .description("Mouse")
///     .amount(3000);
///
/// assert_eq!(fields.note, "");
/// assert_eq!(fields.created_at, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseFields {
    /// A short text description of what the money was spent on.
    pub description: String,
    /// Free-form notes.
    pub note: String,
    /// The amount spent, in cents.
    pub amount: i64,
    /// When the expense happened, in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl ExpenseFields {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the note.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_owned();
        self
    }

    /// Set the amount in cents.
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Set the creation timestamp in milliseconds.
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attach an ID, producing a complete [Expense].
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            note: self.note,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

/// A partial set of changes to an expense.
///
/// Fields left as `None` are not changed. There is no `id` field, an `id` key
/// in incoming JSON is ignored and an edit can never re-key an expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// The new description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The new note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// The new amount in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// The new creation timestamp in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl ExpenseUpdate {
    /// Change the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Change the note.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Change the amount in cents.
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Change the creation timestamp in milliseconds.
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow-merge the update over `expense`, the update winning on conflict.
    pub fn apply(&self, expense: &Expense) -> Expense {
        Expense {
            id: expense.id.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| expense.description.clone()),
            note: self.note.clone().unwrap_or_else(|| expense.note.clone()),
            amount: self.amount.unwrap_or(expense.amount),
            created_at: self.created_at.unwrap_or(expense.created_at),
        }
    }
}

impl From<ExpenseFields> for ExpenseUpdate {
    fn from(fields: ExpenseFields) -> Self {
        Self {
            description: Some(fields.description),
            note: Some(fields.note),
            amount: Some(fields.amount),
            created_at: Some(fields.created_at),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
