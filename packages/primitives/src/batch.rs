//! The immutable snapshot produced by the (out-of-scope) directory scanner.
use serde::{Deserialize, Serialize};

use crate::chunk_hash::ChunkHash;

/// One chunk of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub hash: ChunkHash,
    pub path: String,
    pub pos: u64,
    pub size: u64,
    pub cmpratio: f64,
}

/// File-level metadata carried alongside the chunk list, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub size: u64,
}

/// An immutable snapshot of a chunked directory tree.
///
/// The planner only cares about the *set* of hashes and their ordering (for
/// reproducible display); chunking, hashing and compression ratios are
/// produced entirely by the external scanner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Batch {
    pub chunks: Vec<ChunkRecord>,
    pub files: Vec<FileRecord>,
}

impl Batch {
    #[must_use]
    pub fn new(chunks: Vec<ChunkRecord>, files: Vec<FileRecord>) -> Self {
        Self { chunks, files }
    }

    /// The ordered universe of chunk hashes in this batch, in the order the
    /// scanner produced them.
    #[must_use]
    pub fn hashes(&self) -> Vec<ChunkHash> {
        self.chunks.iter().map(|chunk| chunk.hash.clone()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
