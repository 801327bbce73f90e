#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod mocks;

pub(crate) use fixtures::{fixture_expenses, seed_database, test_uid};
pub(crate) use mocks::{FailingDatabase, MockStore, RecordingNavigator};
