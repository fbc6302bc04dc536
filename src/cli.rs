//! Command-line interface: split, reconstruct, and round-trip test modes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chunkfile::ChunkFile;
use crate::splitter::split_document;

/// Split HTML files at CSS page-break points, or reconstruct them from chunks.
#[derive(Parser)]
#[command(name = "pagepack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTML/HTM input file, or a chunk file when --reconstruct is set
    pub input: PathBuf,

    /// Output filename (default: derived from the input stem)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reconstruct an HTML document from a chunk file
    #[arg(short, long)]
    pub reconstruct: bool,

    /// Split and reconstruct in memory, verifying an exact round-trip
    #[arg(long, conflicts_with = "reconstruct")]
    pub test: bool,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.reconstruct {
        reconstruct_command(&cli.input, cli.output.as_deref())
    } else if cli.test {
        test_command(&cli.input)
    } else {
        split_command(&cli.input, cli.output.as_deref())
    }
}

fn split_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension != "html" && extension != "htm" {
        bail!("Input file must be an HTML or HTM file: {}", input.display());
    }

    let source = read_document(input)?;
    let chunks = split_document(&source);
    let file = ChunkFile::new(input, &source, chunks);

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_chunks_name(input));
    file.save(&path)?;

    println!("Created chunk file: {}", path.display());
    Ok(())
}

fn reconstruct_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let file = ChunkFile::open(input)?;
    let document = file
        .chunks
        .reconstruct()
        .with_context(|| format!("Malformed chunk set in {}", input.display()))?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_reconstructed_name(input));
    fs::write(&path, &document)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    println!("Reconstructed HTML file: {}", path.display());
    Ok(())
}

fn test_command(input: &Path) -> Result<()> {
    let source = read_document(input)?;
    let chunks = split_document(&source);
    let count = chunks.len();
    let rebuilt = chunks
        .reconstruct()
        .context("Round-trip produced a malformed chunk set")?;

    if rebuilt != source {
        bail!(
            "Round-trip mismatch for {}: reconstructed {} bytes, expected {}",
            input.display(),
            rebuilt.len(),
            source.len()
        );
    }

    println!(
        "Round-trip OK: {} chunks, {} bytes match exactly",
        count,
        source.len()
    );
    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Default chunk-file name: `<stem>_chunks.json` next to the input.
fn default_chunks_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    input.with_file_name(format!("{stem}_chunks.json"))
}

/// Default reconstruction name: the input stem, minus a trailing `_chunks`,
/// plus `_reconstructed.html`.
fn default_reconstructed_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    let stem = stem.strip_suffix("_chunks").unwrap_or(stem);
    input.with_file_name(format!("{stem}_reconstructed.html"))
}
