//! The remote database that holds the authoritative copy of every user's
//! expenses.
//!
//! The database is a tree of JSON values addressed by `/`-separated paths,
//! e.g. `users/{uid}/expenses/{expense_id}`. It follows the rules of a
//! realtime database:
//! - writing `null` to a path removes it,
//! - objects with no children do not exist,
//! - children are listed in key order: keys that are 32-bit integers first, in
//!   numeric order, then every other key in lexicographic order.

mod memory;
mod path;
mod sqlite;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use memory::MemoryDatabase;
pub use path::DbPath;
pub use sqlite::{SqliteDatabase, create_node_table};

use crate::{Error, UserId, expense::ExpenseId};

/// A JSON tree that lives somewhere other than the store.
///
/// Every operation either completes or returns an error, there are no partial
/// writes visible to later reads.
#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    /// Replace the value at `path` with `value`. Writing [Value::Null] removes
    /// the path.
    async fn set(&self, path: &DbPath, value: Value) -> Result<(), Error>;

    /// Write each of `fields` as a child of `path`, leaving other children
    /// alone.
    async fn update(&self, path: &DbPath, fields: Map<String, Value>) -> Result<(), Error>;

    /// Delete the value at `path` and everything below it.
    async fn remove(&self, path: &DbPath) -> Result<(), Error>;

    /// Read the value at `path` once.
    async fn get(&self, path: &DbPath) -> Result<Snapshot, Error>;

    /// Store `value` under a newly generated child key of `path` and return the
    /// key.
    ///
    /// Keys are time-ordered, so listing the children of `path` yields pushed
    /// values in the order they were pushed.
    async fn push(&self, path: &DbPath, value: Value) -> Result<String, Error> {
        let key = generate_push_key();
        self.set(&path.child(&key)?, value).await?;

        Ok(key)
    }
}

/// The value found at a path by [RemoteDatabase::get].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    key: Option<String>,
    value: Option<Value>,
}

impl Snapshot {
    /// Create a snapshot of `value` read from the path whose last segment is
    /// `key`.
    ///
    /// `None`, `null` and empty objects all mean that nothing is there.
    pub fn new(key: Option<String>, value: Option<Value>) -> Self {
        let value = value.filter(|value| match value {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });

        Self { key, value }
    }

    /// The last segment of the path that was read, `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The value at the path, `None` if there is nothing there.
    pub fn val(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether there is a value at the path.
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// The children of an object value in key order, see [compare_keys].
    /// Leaves have no children.
    pub fn children(&self) -> Vec<Snapshot> {
        match &self.value {
            Some(Value::Object(map)) => {
                let mut children: Vec<Snapshot> = map
                    .iter()
                    .map(|(key, value)| Snapshot::new(Some(key.clone()), Some(value.clone())))
                    .filter(Snapshot::exists)
                    .collect();
                children.sort_by(|a, b| {
                    compare_keys(a.key().unwrap_or_default(), b.key().unwrap_or_default())
                });
                children
            }
            _ => Vec::new(),
        }
    }
}

/// The path holding all of `uid`'s expenses.
pub fn expenses_path(uid: &UserId) -> DbPath {
    DbPath::root()
        .child_unchecked("users")
        .child_unchecked(uid.as_ref())
        .child_unchecked("expenses")
}

/// The path holding the expense `id` belonging to `uid`.
///
/// # Errors
///
/// Returns [Error::InvalidPath] if `id` cannot be used as a path segment.
pub fn expense_path(uid: &UserId, id: &ExpenseId) -> Result<DbPath, Error> {
    expenses_path(uid).child(id.as_ref())
}

/// The order children are listed in.
///
/// Keys that are canonical 32-bit integers ("7", "-3", but not "007") sort
/// first by value, everything else sorts after them lexicographically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn integer_key(key: &str) -> Option<i32> {
    key.parse::<i32>()
        .ok()
        .filter(|number| number.to_string() == key)
}

fn generate_push_key() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod snapshot_tests {
    use serde_json::json;

    use crate::{
        UserId,
        expense::ExpenseId,
        remote::{Snapshot, expense_path, expenses_path},
    };

    use super::generate_push_key;

    #[test]
    fn null_and_empty_objects_do_not_exist() {
        assert!(!Snapshot::new(None, None).exists());
        assert!(!Snapshot::new(None, Some(json!(null))).exists());
        assert!(!Snapshot::new(None, Some(json!({}))).exists());
        assert!(Snapshot::new(None, Some(json!(0))).exists());
        assert!(Snapshot::new(None, Some(json!(""))).exists());
    }

    #[test]
    fn children_are_in_key_order() {
        let snapshot = Snapshot::new(
            Some("expenses".to_owned()),
            Some(json!({ "b": { "amount": 2 }, "a": { "amount": 1 }, "c": {} })),
        );

        let keys: Vec<_> = snapshot
            .children()
            .iter()
            .map(|child| child.key().unwrap().to_owned())
            .collect();

        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn integer_keys_come_first_in_numeric_order() {
        let snapshot = Snapshot::new(
            None,
            Some(json!({ "b": 1, "10": 1, "9": 1, "007": 1, "-1": 1 })),
        );

        let keys: Vec<_> = snapshot
            .children()
            .iter()
            .map(|child| child.key().unwrap().to_owned())
            .collect();

        assert_eq!(keys, vec!["-1", "9", "10", "007", "b"]);
    }

    #[test]
    fn leaves_have_no_children() {
        let snapshot = Snapshot::new(Some("amount".to_owned()), Some(json!(10)));

        assert!(snapshot.children().is_empty());
    }

    #[test]
    fn expense_paths_are_namespaced_by_user() {
        let uid = UserId::new("thisismytestUid").unwrap();

        assert_eq!(
            expenses_path(&uid).to_string(),
            "users/thisismytestUid/expenses"
        );
        assert_eq!(
            expense_path(&uid, &ExpenseId::new("abc")).unwrap().to_string(),
            "users/thisismytestUid/expenses/abc"
        );
    }

    #[test]
    fn expense_path_rejects_bad_ids() {
        let uid = UserId::new("thisismytestUid").unwrap();

        assert!(expense_path(&uid, &ExpenseId::new("a/b")).is_err());
    }

    #[test]
    fn push_keys_are_increasing() {
        let first = generate_push_key();
        let second = generate_push_key();

        assert_ne!(first, second);
        assert!(first < second);
    }
}
