#![forbid(unsafe_code)]

//! Item identity.
//!
//! [`ItemId`] is an opaque, caller-visible string. Ids are either supplied by
//! the host or issued by an [`IdGenerator`], which owns its counter so that
//! uniqueness can be tested in isolation and several generators never share
//! hidden state.

use std::fmt;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

/// Stable, unique identifier of one item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Issues ids of the form `{prefix}-{counter}-{millis}-{salt}`.
///
/// The counter alone guarantees uniqueness within one generator; the
/// timestamp and salt keep ids from different generators (or sessions) from
/// colliding in practice. Construct one per grid and pass it to whatever
/// creates items.
pub struct IdGenerator {
    prefix: String,
    counter: u64,
    salt: ahash::RandomState,
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("prefix", &self.prefix)
            .field("issued", &self.counter)
            .finish()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator with the `field` prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("field")
    }

    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
            salt: ahash::RandomState::new(),
        }
    }

    /// Number of ids issued so far.
    #[inline]
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> ItemId {
        self.counter = self.counter.saturating_add(1);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let salt = BuildHasher::hash_one(&self.salt, self.counter) % 10_000;
        ItemId(format!("{}-{}-{}-{}", self.prefix, self.counter, millis, salt))
    }
}
