use anyhow::{Context as AnyhowContext, Result};
use std::path::{Path, PathBuf};

/// Chunks from every file (one non-blank line each) followed by inline chunks.
pub fn collect(files: &[PathBuf], inline: &[String]) -> Result<Vec<String>> {
    let mut chunks = Vec::new();
    for path in files {
        let loaded = read_file(path)?;
        log::info!("Loaded {} chunks from {}", loaded.len(), path.display());
        chunks.extend(loaded);
    }
    chunks.extend(inline.iter().cloned());
    Ok(chunks)
}

fn read_file(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chunks file {}", path.display()))?;
    Ok(split_lines(&raw))
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}
