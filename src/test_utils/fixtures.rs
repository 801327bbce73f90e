//! Sample expenses and helpers for seeding a database with them.

use serde_json::{Map, Value};

use crate::{
    UserId,
    expense::{Expense, ExpenseFields, ExpenseId},
    remote::{RemoteDatabase, expenses_path},
};

/// Four days in milliseconds.
const FOUR_DAYS: i64 = 4 * 24 * 60 * 60 * 1000;

pub(crate) fn test_uid() -> UserId {
    UserId::new("thisismytestUid").expect("could not create test user ID")
}

/// Three expenses with IDs "1", "2" and "3", in that order.
pub(crate) fn fixture_expenses() -> Vec<Expense> {
    vec![
        ExpenseFields::default()
            .description("Gum")
            .amount(195)
            .with_id(ExpenseId::new("1")),
        ExpenseFields::default()
            .description("Rent")
            .amount(109500)
            .created_at(-FOUR_DAYS)
            .with_id(ExpenseId::new("2")),
        ExpenseFields::default()
            .description("Credit Card")
            .amount(4500)
            .created_at(FOUR_DAYS)
            .with_id(ExpenseId::new("3")),
    ]
}

/// Replace `uid`'s expenses in `database` with [fixture_expenses].
pub(crate) async fn seed_database<R>(database: &R, uid: &UserId)
where
    R: RemoteDatabase + ?Sized,
{
    let expenses: Map<String, Value> = fixture_expenses()
        .into_iter()
        .map(|expense| {
            let fields =
                serde_json::to_value(expense.fields()).expect("could not serialize expense");
            (expense.id.to_string(), fields)
        })
        .collect();

    database
        .set(&expenses_path(uid), Value::Object(expenses))
        .await
        .expect("could not seed test database");
}
