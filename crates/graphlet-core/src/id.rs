//! Node and relationship identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parse a URL path segment.
    ///
    /// Any integer is accepted. Integers outside the id range give `None`,
    /// since no stored node can carry them.
    pub fn from_path(s: &str) -> Result<Option<Self>, Error> {
        parse_path_id(s).map(|id| id.map(Self))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub u64);

impl RelationshipId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parse a URL path segment, see [`NodeId::from_path`]
    pub fn from_path(s: &str) -> Result<Option<Self>, Error> {
        parse_path_id(s).map(|id| id.map(Self))
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_path_id(s: &str) -> Result<Option<u64>, Error> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidId(s.to_string()));
    }
    Ok(s.parse::<u64>().ok())
}

/// Source of fresh identifiers.
///
/// Identifiers track the creation time in milliseconds since the epoch, so they
/// sort in creation order. When two creations land in the same millisecond (or
/// the clock steps backwards) the next identifier is bumped one past the last
/// one handed out, which keeps every value unique for the life of the sequence.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier for something created at `now`
    pub fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    pub fn next_node_id(&mut self, now: DateTime<Utc>) -> NodeId {
        NodeId(self.next(now))
    }

    pub fn next_relationship_id(&mut self, now: DateTime<Utc>) -> RelationshipId {
        RelationshipId(self.next(now))
    }
}
