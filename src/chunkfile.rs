//! Persisted chunk artifact.
//!
//! A split is stored as one JSON document: a metadata header plus the ordered
//! chunk list. The file is the interchange format between split and
//! reconstruct; everything is serialized fully in memory before anything
//! touches disk, so a failure never leaves a partial output behind.

use anyhow::{ensure, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::chunkset::ChunkSet;
use crate::splitter;

/// Top-level metadata of a chunk file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Path of the document that was split.
    pub original_file: String,
    /// Number of chunks; checked against the chunk list on read.
    pub total_chunks: usize,
    /// Size of the original document in bytes.
    pub file_size: usize,
    /// RFC 3339 timestamp of the split.
    pub created_at: String,
    /// Tool name and version that produced the file.
    pub generator: String,
    /// The document's `<head>...</head>` markup, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

/// A chunk set together with its metadata, as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFile {
    pub metadata: Metadata,
    pub chunks: ChunkSet,
}

impl ChunkFile {
    /// Build a chunk file for a freshly split document.
    pub fn new(original_file: &Path, source: &str, chunks: ChunkSet) -> Self {
        Self {
            metadata: Metadata {
                original_file: original_file.display().to_string(),
                total_chunks: chunks.len(),
                file_size: source.len(),
                created_at: Utc::now().to_rfc3339(),
                generator: format!("pagepack v{}", env!("CARGO_PKG_VERSION")),
                head: splitter::extract_head(source),
            },
            chunks,
        }
    }

    /// Write the chunk file as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize chunk file")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write chunk file: {}", path.display()))?;

        eprintln!(
            "[pagepack] Wrote {} chunks to {}",
            self.chunks.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a chunk file back from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read chunk file: {}", path.display()))?;
        let file: ChunkFile = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed chunk file: {}", path.display()))?;

        ensure!(
            file.metadata.total_chunks == file.chunks.len(),
            "Malformed chunk file {}: metadata reports {} chunks but {} are present",
            path.display(),
            file.metadata.total_chunks,
            file.chunks.len()
        );

        eprintln!(
            "[pagepack] Loaded {} chunks from {}",
            file.chunks.len(),
            path.display()
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split_document;

    const SOURCE: &str = "<html><head><title>T</title></head><body>\
        <p>A</p><div style=\"page-break-before: always\">B</div></body></html>";

    #[test]
    fn test_metadata_describes_split() {
        let file = ChunkFile::new(Path::new("doc.html"), SOURCE, split_document(SOURCE));

        assert_eq!(file.metadata.original_file, "doc.html");
        assert_eq!(file.metadata.total_chunks, file.chunks.len());
        assert_eq!(file.metadata.file_size, SOURCE.len());
        assert_eq!(
            file.metadata.head.as_deref(),
            Some("<head><title>T</title></head>")
        );
        assert!(file.metadata.generator.starts_with("pagepack v"));
    }

    #[test]
    fn test_save_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_chunks.json");

        let file = ChunkFile::new(Path::new("doc.html"), SOURCE, split_document(SOURCE));
        file.save(&path).unwrap();

        let loaded = ChunkFile::open(&path).unwrap();
        assert_eq!(loaded.chunks, file.chunks);
        assert_eq!(loaded.chunks.reconstruct().unwrap(), SOURCE);
    }

    #[test]
    fn test_open_missing_file_names_path() {
        let err = ChunkFile::open(Path::new("/nonexistent/doc_chunks.json")).unwrap_err();
        assert!(err.to_string().contains("doc_chunks.json"));
    }

    #[test]
    fn test_open_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ChunkFile::open(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed chunk file"));
    }

    #[test]
    fn test_permuted_stored_order_still_reconstructs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_chunks.json");
        fs::write(
            &path,
            r#"{
                "metadata": {
                    "original_file": "doc.html",
                    "total_chunks": 3,
                    "file_size": 3,
                    "created_at": "2025-01-01T00:00:00+00:00",
                    "generator": "pagepack v0.1.0"
                },
                "chunks": [
                    { "index": 2, "content": "C" },
                    { "index": 0, "content": "A" },
                    { "index": 1, "content": "B" }
                ]
            }"#,
        )
        .unwrap();

        let loaded = ChunkFile::open(&path).unwrap();
        assert_eq!(loaded.chunks.reconstruct().unwrap(), "ABC");
    }

    #[test]
    fn test_open_rejects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_chunks.json");

        let mut file = ChunkFile::new(Path::new("doc.html"), SOURCE, split_document(SOURCE));
        file.metadata.total_chunks += 1;
        file.save(&path).unwrap();

        let err = ChunkFile::open(&path).unwrap_err();
        assert!(err.to_string().contains("chunks"));
    }
}
