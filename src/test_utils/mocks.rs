//! Test doubles for the store, the remote database and navigation.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    Error,
    expense::ExpenseAction,
    navigation::Navigator,
    remote::{DbPath, RemoteDatabase, Snapshot},
    store::Dispatch,
};

/// A store that records the actions dispatched to it instead of applying them.
#[derive(Debug, Default)]
pub(crate) struct MockStore {
    actions: Mutex<Vec<ExpenseAction>>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The actions dispatched so far, oldest first.
    pub(crate) fn actions(&self) -> Vec<ExpenseAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl Dispatch for MockStore {
    fn dispatch(&self, action: ExpenseAction) {
        self.actions.lock().unwrap().push(action);
    }
}

/// A database that is never reachable.
#[derive(Debug, Default)]
pub(crate) struct FailingDatabase;

impl FailingDatabase {
    fn error() -> Error {
        Error::RemoteUnavailable("the test database is offline".to_owned())
    }
}

#[async_trait]
impl RemoteDatabase for FailingDatabase {
    async fn set(&self, _path: &DbPath, _value: Value) -> Result<(), Error> {
        Err(Self::error())
    }

    async fn update(&self, _path: &DbPath, _fields: Map<String, Value>) -> Result<(), Error> {
        Err(Self::error())
    }

    async fn remove(&self, _path: &DbPath) -> Result<(), Error> {
        Err(Self::error())
    }

    async fn get(&self, _path: &DbPath) -> Result<Snapshot, Error> {
        Err(Self::error())
    }
}

/// A navigator that remembers where it was asked to go.
#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_owned());
    }
}
