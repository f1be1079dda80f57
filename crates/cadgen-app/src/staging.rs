//! Persisting generated files for download.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadgen_core::GeneratedArtifact;

/// Write the artifact to `destination` without leaving a partial file behind.
///
/// The bytes go to a temporary file in the destination directory first,
/// which is then renamed into place.
pub fn stage_artifact(artifact: &GeneratedArtifact, destination: &Path) -> Result<PathBuf> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut staged = tempfile::Builder::new()
        .prefix(".cadgen-")
        .suffix(&format!(".{}", artifact.extension()))
        .tempfile_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    staged
        .write_all(&artifact.bytes)
        .context("Failed to write CAD data")?;
    staged
        .as_file()
        .sync_all()
        .context("Failed to flush CAD data")?;

    staged
        .persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move CAD file to {}", destination.display()))?;

    Ok(destination.to_path_buf())
}
