//! The content-addressed identifier for one chunk.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An opaque, comparable token identifying a chunk's content.
///
/// The planner and swarm core never interpret the bytes of a hash: they only
/// compare, hash (as a map key) and order it. The chunker glue
/// (`packages/blob-store/src/chunking.rs`) is the only place that knows
/// hashes are `blake3` digests rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkHash(Arc<str>);

impl ChunkHash {
    #[must_use]
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChunkHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChunkHash {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkHash;

    #[test]
    fn it_should_be_equal_for_equal_content_regardless_of_allocation() {
        let a = ChunkHash::from("abc123".to_string());
        let b = ChunkHash::from("abc123");

        assert_eq!(a, b);
    }

    #[test]
    fn it_should_order_lexicographically() {
        let a = ChunkHash::from("aaa");
        let b = ChunkHash::from("bbb");

        assert!(a < b);
    }

    #[test]
    fn it_should_round_trip_through_json() {
        let hash = ChunkHash::from("deadbeef");

        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"deadbeef\"");

        let back: ChunkHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
