//! Document splitter.
//!
//! Walks the HTML source, classifies every start tag via [`crate::breaks`],
//! and partitions the text into chunks at the requested boundaries. Boundary
//! placement never falls inside a tag's angle brackets: a `break-before`
//! boundary sits at the tag's `<`, a `break-after` boundary immediately after
//! the tag's closing `>`. Splitting is a pure in-memory transformation whose
//! output always concatenates back to the input byte-for-byte.

mod scanner;


pub use scanner::{extract_head, start_tags, StartTag};

use crate::breaks::{self, BreakDirection};
use crate::chunkset::{BreakInfo, Chunk, ChunkSet};

/// Maximum bytes of a boundary tag's markup recorded in chunk metadata.
const BREAK_MARKUP_LIMIT: usize = 200;

/// One resolved chunk boundary: a byte position and the tag that asked for it.
#[derive(Debug, Clone)]
struct Boundary {
    position: usize,
    direction: BreakDirection,
    tag_start: usize,
    tag_end: usize,
}

/// Split an HTML document into an ordered chunk set at its declared
/// page-break points.
///
/// A document with no break points becomes exactly one chunk. Two boundaries
/// at the same position produce an empty chunk between them, which is kept;
/// an empty trailing chunk is not emitted.
pub fn split_document(source: &str) -> ChunkSet {
    let boundaries = find_boundaries(source);

    let mut chunks: Vec<Chunk> = Vec::with_capacity(boundaries.len() + 1);
    let mut last_pos = 0usize;
    let mut pending: Option<BreakInfo> = None;

    for boundary in &boundaries {
        chunks.push(Chunk {
            index: chunks.len(),
            content: source[last_pos..boundary.position].to_string(),
            break_before: pending.take(),
        });
        pending = Some(BreakInfo {
            tag: truncate_markup(&source[boundary.tag_start..boundary.tag_end]),
            position: boundary.position,
            direction: boundary.direction,
        });
        last_pos = boundary.position;
    }

    // The final buffer becomes the last chunk, unless it would be empty.
    if last_pos < source.len() || chunks.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            content: source[last_pos..].to_string(),
            break_before: pending,
        });
    }

    ChunkSet::new(chunks)
}

/// Collect every requested boundary in the document, in position order.
fn find_boundaries(source: &str) -> Vec<Boundary> {
    let mut boundaries = Vec::new();

    for tag in start_tags(source) {
        let decision = breaks::classify(&tag.attrs);
        if decision.before {
            boundaries.push(Boundary {
                position: tag.start,
                direction: BreakDirection::Before,
                tag_start: tag.start,
                tag_end: tag.end,
            });
        }
        if decision.after {
            boundaries.push(Boundary {
                position: tag.end,
                direction: BreakDirection::After,
                tag_start: tag.start,
                tag_end: tag.end,
            });
        }
    }

    // Scan order is already positional for before-boundaries, but an
    // after-boundary can coincide with the next tag's before-boundary; the
    // stable sort keeps the declaring tags in document order.
    boundaries.sort_by_key(|boundary| boundary.position);
    boundaries
}

/// Truncate a boundary tag's markup for metadata, on a char boundary.
fn truncate_markup(markup: &str) -> String {
    if markup.len() <= BREAK_MARKUP_LIMIT {
        return markup.to_string();
    }
    let mut end = BREAK_MARKUP_LIMIT;
    while !markup.is_char_boundary(end) {
        end -= 1;
    }
    markup[..end].to_string()
}
