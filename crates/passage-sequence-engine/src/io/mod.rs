use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::editing::BreakpointCollection;
use crate::models::{Command, Passage};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid passage file: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape with the breakpoints left raw, so damaged breakpoint data
/// degrades instead of failing the whole read
#[derive(Deserialize)]
struct RawPassage {
    commands: Vec<Command>,
    #[serde(default)]
    breakpoints: Option<serde_json::Value>,
}

/// Parse a passage from JSON text
pub fn parse_passage(json: &str) -> Result<Passage, IoError> {
    let raw: RawPassage = serde_json::from_str(json)?;
    Ok(Passage::new(
        raw.commands,
        BreakpointCollection::from_raw(raw.breakpoints),
    ))
}

/// Read a passage file
pub fn read_passage(path: &Path) -> Result<Passage, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_passage(&content)
}

/// Write a passage file as pretty JSON
pub fn write_passage(path: &Path, passage: &Passage) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(passage)?;
    fs::write(path, content)?;
    Ok(())
}
