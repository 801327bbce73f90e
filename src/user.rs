//! The ID of the user whose expenses are being tracked.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, remote::DbPath};

/// A newtype wrapper for user IDs.
///
/// User IDs name the part of the remote database that holds a user's data, so
/// they must be usable as a single path segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidUserId] if `id` is empty or
    /// cannot be used as a database path segment.
    pub fn new(id: &str) -> Result<Self, Error> {
        let id = id.trim();

        DbPath::root()
            .child(id)
            .map_err(|_| Error::InvalidUserId(id.to_owned()))?;

        Ok(Self(id.to_owned()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::new(s)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
