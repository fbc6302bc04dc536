// Public API exports
pub mod breaks;
pub mod chunkfile;
pub mod chunkset;
pub mod cli;
pub mod splitter;

// Re-export main types for convenience
pub use breaks::{classify, BreakDecision, BreakDirection};

pub use chunkset::{BreakInfo, Chunk, ChunkSet, ChunkSetError};

pub use chunkfile::{ChunkFile, Metadata};

pub use splitter::{extract_head, split_document, StartTag};
