//! Chunk data model and exact reconstruction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::breaks::BreakDirection;

/// Errors raised when a chunk set's ordering cannot be established.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkSetError {
    #[error("duplicate chunk index {index}")]
    DuplicateIndex { index: usize },

    #[error("chunk indices are not contiguous: expected {expected}, found {found}")]
    IndexGap { expected: usize, found: usize },
}

/// Informational record of the boundary that opened a chunk.
///
/// Not required for reconstruction; kept so chunk files are debuggable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInfo {
    /// Markup of the tag that declared the break, truncated to 200 bytes.
    pub tag: String,
    /// Byte position of the boundary in the original document.
    pub position: usize,
    /// Which direction of the tag's declaration requested the boundary.
    pub direction: BreakDirection,
}

/// One content chunk of a split document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position in reconstruction order.
    pub index: usize,
    /// Exact substring of the original document, untouched.
    pub content: String,
    /// The boundary that opened this chunk; `None` for the first chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_before: Option<BreakInfo>,
}

/// Ordered sequence of chunks produced by one split.
///
/// Chunks are immutable once created; the set is persisted whole and read
/// back whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkSet {
    chunks: Vec<Chunk>,
}

impl ChunkSet {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Reassemble the original document.
    ///
    /// Chunks are ordered by `index` and concatenated with no separator, no
    /// trimming, no re-encoding. Fails before producing any output when the
    /// indices are duplicated or leave a gap, since order cannot then be
    /// unambiguously determined.
    pub fn reconstruct(&self) -> Result<String, ChunkSetError> {
        let mut ordered: Vec<&Chunk> = self.chunks.iter().collect();
        ordered.sort_by_key(|chunk| chunk.index);

        for (expected, chunk) in ordered.iter().enumerate() {
            if chunk.index == expected {
                continue;
            }
            // Sorted ascending: an index below its slot repeats an earlier
            // one, an index above it leaves a gap.
            if chunk.index < expected {
                return Err(ChunkSetError::DuplicateIndex { index: chunk.index });
            }
            return Err(ChunkSetError::IndexGap {
                expected,
                found: chunk.index,
            });
        }

        let total: usize = ordered.iter().map(|chunk| chunk.content.len()).sum();
        let mut document = String::with_capacity(total);
        for chunk in ordered {
            document.push_str(&chunk.content);
        }
        Ok(document)
    }
}
