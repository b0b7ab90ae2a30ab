use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::common::SCENE_EXT;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },
}

/// # Errors
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[must_use]
pub fn is_scene_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(SCENE_EXT)
}
