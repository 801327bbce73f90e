//! A remote database persisted in SQLite.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::{
    Error,
    remote::{DbPath, RemoteDatabase, Snapshot},
};

/// A [RemoteDatabase] that stores the tree in a SQLite `node` table.
///
/// Each leaf of the tree is one row: its full path and its JSON encoded value.
/// Objects are implied by the paths of their leaves, which is what makes empty
/// objects disappear.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// Create a database backed by `connection`.
    ///
    /// The `node` table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

#[async_trait]
impl RemoteDatabase for SqliteDatabase {
    async fn set(&self, path: &DbPath, value: Value) -> Result<(), Error> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;

        write_subtree(&transaction, path, &value)?;

        transaction.commit()?;
        tracing::debug!("Set value at \"{path}\"");
        Ok(())
    }

    async fn update(&self, path: &DbPath, fields: Map<String, Value>) -> Result<(), Error> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;

        for (key, value) in &fields {
            write_subtree(&transaction, &path.child(key)?, value)?;
        }

        transaction.commit()?;
        tracing::debug!("Updated value at \"{path}\"");
        Ok(())
    }

    async fn remove(&self, path: &DbPath) -> Result<(), Error> {
        let connection = self.lock()?;

        delete_subtree(&connection, path)?;

        tracing::debug!("Removed value at \"{path}\"");
        Ok(())
    }

    async fn get(&self, path: &DbPath) -> Result<Snapshot, Error> {
        let connection = self.lock()?;

        let value = read_subtree(&connection, path)?;

        Ok(Snapshot::new(path.key().map(str::to_owned), value))
    }
}

/// Create the table that holds the leaves of the tree.
pub fn create_node_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS node (
                path TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

type RowsAffected = usize;

fn delete_subtree(connection: &Connection, path: &DbPath) -> Result<RowsAffected, Error> {
    if path.is_root() {
        return connection.execute("DELETE FROM node", ()).map_err(Error::from);
    }

    connection
        .execute(
            "DELETE FROM node WHERE path = ?1 OR substr(path, 1, length(?2)) = ?2",
            (path.to_string(), format!("{path}/")),
        )
        .map_err(Error::from)
}

fn write_subtree(connection: &Connection, path: &DbPath, value: &Value) -> Result<(), Error> {
    let mut leaves = Vec::new();
    flatten(path, value, &mut leaves)?;

    delete_subtree(connection, path)?;

    // A leaf at an ancestor would hide the new value. Removing nothing below a
    // leaf leaves the leaf alone.
    if !path.is_root() && !leaves.is_empty() {
        let mut statement = connection.prepare("DELETE FROM node WHERE path = ?1")?;
        for ancestor in std::iter::once(DbPath::root()).chain(path.ancestors()) {
            statement.execute((ancestor.to_string(),))?;
        }
    }

    let mut statement = connection.prepare("INSERT INTO node (path, value) VALUES (?1, ?2)")?;
    for (leaf_path, leaf_value) in leaves {
        statement.execute((leaf_path, leaf_value))?;
    }

    Ok(())
}

/// Collect the leaves of `value` as `(path, JSON)` pairs.
fn flatten(path: &DbPath, value: &Value, leaves: &mut Vec<(String, String)>) -> Result<(), Error> {
    match value {
        Value::Null => Ok(()),
        Value::Object(map) => map
            .iter()
            .try_for_each(|(key, child)| flatten(&path.child(key)?, child, leaves)),
        leaf => {
            leaves.push((path.to_string(), serde_json::to_string(leaf)?));
            Ok(())
        }
    }
}

fn read_subtree(connection: &Connection, path: &DbPath) -> Result<Option<Value>, Error> {
    let path_text = path.to_string();
    let prefix = format!("{path_text}/");

    let rows: Vec<(String, String)> = if path.is_root() {
        connection
            .prepare("SELECT path, value FROM node ORDER BY path")?
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?
    } else {
        connection
            .prepare(
                "SELECT path, value FROM node
                WHERE path = ?1 OR substr(path, 1, length(?2)) = ?2
                ORDER BY path",
            )?
            .query_map((&path_text, &prefix), |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?
    };

    let mut tree: Option<Value> = None;

    for (leaf_path, raw_value) in rows {
        let leaf: Value = serde_json::from_str(&raw_value)?;

        let relative = if path.is_root() {
            leaf_path.as_str()
        } else if leaf_path == path_text {
            ""
        } else {
            &leaf_path[prefix.len()..]
        };

        if relative.is_empty() {
            return Ok(Some(leaf));
        }

        let segments: Vec<&str> = relative.split('/').collect();
        insert_leaf(tree.get_or_insert(Value::Null), &segments, leaf);
    }

    Ok(tree)
}

fn insert_leaf(node: &mut Value, segments: &[&str], leaf: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = leaf;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }

    if let Value::Object(children) = node {
        let child = children
            .entry(first.to_string())
            .or_insert(Value::Null);
        insert_leaf(child, rest, leaf);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        Error,
        remote::{DbPath, MemoryDatabase, RemoteDatabase, SqliteDatabase, create_node_table},
    };

    fn get_test_database() -> SqliteDatabase {
        let connection = Connection::open_in_memory().unwrap();
        create_node_table(&connection).expect("Could not create node table");
        SqliteDatabase::new(Arc::new(Mutex::new(connection)))
    }

    fn path(path: &str) -> DbPath {
        DbPath::parse(path).unwrap()
    }

    fn count_rows(database: &SqliteDatabase) -> i64 {
        database
            .connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM node", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn get_returns_what_was_set() {
        let database = get_test_database();
        let value = json!({ "description": "Gum", "note": "", "amount": 195, "createdAt": 0 });

        database
            .set(&path("users/a/expenses/1"), value.clone())
            .await
            .unwrap();

        let snapshot = database.get(&path("users/a/expenses/1")).await.unwrap();
        assert_eq!(snapshot.key(), Some("1"));
        assert_eq!(snapshot.val(), Some(&value));
    }

    #[tokio::test]
    async fn stores_one_row_per_leaf() {
        let database = get_test_database();

        database
            .set(&path("e/1"), json!({ "a": 1, "b": { "c": "x", "d": true } }))
            .await
            .unwrap();

        assert_eq!(count_rows(&database), 3);
    }

    #[tokio::test]
    async fn get_rebuilds_nested_objects() {
        let database = get_test_database();
        database
            .set(&path("users/a/expenses/1"), json!({ "amount": 1 }))
            .await
            .unwrap();
        database
            .set(&path("users/a/expenses/2"), json!({ "amount": 2 }))
            .await
            .unwrap();

        let snapshot = database.get(&path("users/a")).await.unwrap();

        assert_eq!(
            snapshot.val(),
            Some(&json!({ "expenses": { "1": { "amount": 1 }, "2": { "amount": 2 } } }))
        );
    }

    #[tokio::test]
    async fn get_does_not_match_sibling_prefixes() {
        let database = get_test_database();
        database.set(&path("users/a"), json!({ "x": 1 })).await.unwrap();
        database.set(&path("users/ab"), json!({ "x": 2 })).await.unwrap();

        let snapshot = database.get(&path("users/a")).await.unwrap();

        assert_eq!(snapshot.val(), Some(&json!({ "x": 1 })));
    }

    #[tokio::test]
    async fn get_root_returns_everything() {
        let database = get_test_database();
        database.set(&path("a"), json!(1)).await.unwrap();
        database.set(&path("b/c"), json!("two")).await.unwrap();

        let snapshot = database.get(&DbPath::root()).await.unwrap();

        assert_eq!(snapshot.key(), None);
        assert_eq!(snapshot.val(), Some(&json!({ "a": 1, "b": { "c": "two" } })));
    }

    #[tokio::test]
    async fn get_missing_path_is_empty() {
        let database = get_test_database();

        let snapshot = database.get(&path("users/a/expenses")).await.unwrap();

        assert!(!snapshot.exists());
    }

    #[tokio::test]
    async fn set_replaces_subtree() {
        let database = get_test_database();
        database
            .set(&path("a"), json!({ "b": 1, "c": 2 }))
            .await
            .unwrap();

        database.set(&path("a"), json!({ "d": 3 })).await.unwrap();

        let snapshot = database.get(&path("a")).await.unwrap();
        assert_eq!(snapshot.val(), Some(&json!({ "d": 3 })));
        assert_eq!(count_rows(&database), 1);
    }

    #[tokio::test]
    async fn set_below_a_leaf_replaces_the_leaf() {
        let database = get_test_database();
        database.set(&path("a"), json!(1)).await.unwrap();

        database.set(&path("a/b"), json!(2)).await.unwrap();

        let snapshot = database.get(&path("a")).await.unwrap();
        assert_eq!(snapshot.val(), Some(&json!({ "b": 2 })));
    }

    #[tokio::test]
    async fn removing_below_a_leaf_keeps_the_leaf() {
        let sqlite = get_test_database();
        let memory = MemoryDatabase::new();
        let databases: [&dyn RemoteDatabase; 2] = [&sqlite, &memory];

        for database in databases {
            database.set(&path("a"), json!(1)).await.unwrap();

            database.set(&path("a/b"), json!(null)).await.unwrap();
            database.set(&path("a/c"), json!({})).await.unwrap();
            database.remove(&path("a/d/e")).await.unwrap();

            let snapshot = database.get(&path("a")).await.unwrap();
            assert_eq!(snapshot.val(), Some(&json!(1)));
        }
    }

    #[tokio::test]
    async fn set_rejects_invalid_keys_without_writing() {
        let database = get_test_database();
        database.set(&path("a"), json!({ "b": 1 })).await.unwrap();

        let result = database.set(&path("a"), json!({ "b.c": 1 })).await;

        assert_eq!(result, Err(Error::InvalidPath("b.c".to_owned())));
        let snapshot = database.get(&path("a")).await.unwrap();
        assert_eq!(snapshot.val(), Some(&json!({ "b": 1 })));
    }

    #[tokio::test]
    async fn update_merges_children() {
        let database = get_test_database();
        database
            .set(&path("e/1"), json!({ "description": "Gum", "amount": 195 }))
            .await
            .unwrap();

        let fields = json!({ "amount": 10, "createdAt": 5000 })
            .as_object()
            .unwrap()
            .clone();
        database.update(&path("e/1"), fields).await.unwrap();

        let snapshot = database.get(&path("e/1")).await.unwrap();
        assert_eq!(
            snapshot.val(),
            Some(&json!({ "description": "Gum", "amount": 10, "createdAt": 5000 }))
        );
    }

    #[tokio::test]
    async fn remove_deletes_subtree_only() {
        let database = get_test_database();
        database
            .set(&path("e"), json!({ "1": { "amount": 1 }, "2": { "amount": 2 } }))
            .await
            .unwrap();

        database.remove(&path("e/1")).await.unwrap();

        let snapshot = database.get(&path("e")).await.unwrap();
        assert_eq!(snapshot.val(), Some(&json!({ "2": { "amount": 2 } })));
    }

    #[tokio::test]
    async fn push_stores_under_new_key() {
        let database = get_test_database();
        let parent = path("users/a/expenses");

        let key = database
            .push(&parent, json!({ "amount": 3000 }))
            .await
            .unwrap();

        let snapshot = database.get(&parent.child(&key).unwrap()).await.unwrap();
        assert_eq!(snapshot.val(), Some(&json!({ "amount": 3000 })));
    }
}
