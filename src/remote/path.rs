//! Paths into the remote database tree.

use std::{fmt::Display, str::FromStr};

use serde_json::Value;

use crate::Error;

/// Characters that may not appear in a path segment.
const FORBIDDEN_CHARACTERS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// A validated path into the remote database, e.g. `users/abc/expenses`.
///
/// The empty path is the root of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DbPath {
    segments: Vec<String>,
}

impl DbPath {
    /// The root of the database.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path. Leading and trailing slashes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPath] if any segment is empty or contains one of
    /// `.`, `#`, `$`, `[` or `]`.
    pub fn parse(path: &str) -> Result<Self, Error> {
        let trimmed = path.trim_matches('/');

        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        trimmed
            .split('/')
            .try_fold(Self::root(), |path, segment| path.child(segment))
    }

    /// The path of the child `key` of this path.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPath] if `key` is not a valid segment.
    pub fn child(&self, key: &str) -> Result<Self, Error> {
        validate_segment(key)?;

        Ok(self.child_unchecked(key))
    }

    /// Append `key` without validating it.
    ///
    /// The caller should ensure `key` is a valid segment, an invalid one gives
    /// a path that other clients of the same database could not address.
    pub(crate) fn child_unchecked(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_owned());

        Self { segments }
    }

    /// The segments of the path from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every proper ancestor of this path, closest to the root first, not
    /// including the root itself.
    pub fn ancestors(&self) -> impl Iterator<Item = DbPath> + '_ {
        (1..self.segments.len()).map(|len| DbPath {
            segments: self.segments[..len].to_vec(),
        })
    }
}

impl Display for DbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for DbPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DbPath::parse(s)
    }
}

fn validate_segment(segment: &str) -> Result<(), Error> {
    if segment.is_empty()
        || segment.contains(FORBIDDEN_CHARACTERS)
        || segment.chars().any(char::is_control)
    {
        return Err(Error::InvalidPath(segment.to_owned()));
    }

    Ok(())
}

/// Check that every object key in `value` is a valid path segment.
pub(crate) fn validate_keys(value: &Value) -> Result<(), Error> {
    match value {
        Value::Object(map) => map.iter().try_for_each(|(key, child)| {
            validate_segment(key)?;
            validate_keys(child)
        }),
        _ => Ok(()),
    }
}
