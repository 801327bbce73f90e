//! An in-process remote database.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    Error,
    remote::{DbPath, RemoteDatabase, Snapshot, path::validate_keys},
};

/// A [RemoteDatabase] that keeps the whole tree in memory.
///
/// Nothing is persisted, dropping the database drops the data.
#[derive(Debug)]
pub struct MemoryDatabase {
    root: RwLock<Value>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Object(Map::new())),
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteDatabase for MemoryDatabase {
    async fn set(&self, path: &DbPath, value: Value) -> Result<(), Error> {
        validate_keys(&value)?;

        let mut root = self.root.write().await;
        write_value(&mut root, path.segments(), value);

        tracing::debug!("Set value at \"{path}\"");
        Ok(())
    }

    async fn update(&self, path: &DbPath, fields: Map<String, Value>) -> Result<(), Error> {
        let children = fields
            .into_iter()
            .map(|(key, value)| {
                validate_keys(&value)?;
                Ok((path.child(&key)?, value))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut root = self.root.write().await;
        for (child, value) in children {
            write_value(&mut root, child.segments(), value);
        }

        tracing::debug!("Updated value at \"{path}\"");
        Ok(())
    }

    async fn remove(&self, path: &DbPath) -> Result<(), Error> {
        let mut root = self.root.write().await;
        write_value(&mut root, path.segments(), Value::Null);

        tracing::debug!("Removed value at \"{path}\"");
        Ok(())
    }

    async fn get(&self, path: &DbPath) -> Result<Snapshot, Error> {
        let root = self.root.read().await;

        let value = path
            .segments()
            .iter()
            .try_fold(&*root, |node, segment| node.get(segment.as_str()));

        Ok(Snapshot::new(
            path.key().map(str::to_owned),
            value.cloned(),
        ))
    }
}

/// Write `value` at `segments` below `node`, creating parents on the way down
/// and pruning parents left empty on the way back up.
fn write_value(node: &mut Value, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = match prune(value) {
            Value::Null => Value::Object(Map::new()),
            value => value,
        };
        return;
    };

    let value = prune(value);
    if value.is_null() && node.get(first.as_str()).is_none() {
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }

    let Value::Object(children) = node else {
        return;
    };

    let child = children
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));

    if rest.is_empty() {
        *child = prune(value);
    } else {
        write_value(child, rest, value);
    }

    if is_empty(child) {
        children.remove(first.as_str());
    }
}

/// Drop nulls and empty objects from `value`, turning it into `null` if
/// nothing is left.
fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, prune(value)))
                .filter(|(_, value)| !value.is_null())
                .collect();

            if map.is_empty() {
                Value::Null
            } else {
                Value::Object(map)
            }
        }
        value => value,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
