use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tally_ingest::SourceFormat;

pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Declared media type for an upload path, from its extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SourceFormat::ALL
        .into_iter()
        .find(|f| f.extension() == ext)
        .map(|f| f.media_type())
}

pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}
