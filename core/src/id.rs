//! Identity types for scene entities.
//!
//! Node identifiers are 64-bit values that are:
//! - Unique within their session
//! - Never reused after deletion
//! - Opaque to external users

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
