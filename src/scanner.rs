use jwalk::WalkDir;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// A regular file taking part in duplicate detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHandle {
    /// Absolute location of the file
    pub path: PathBuf,
    /// Location relative to the scanned root
    pub relative: PathBuf,
    pub size: u64,
}

impl FileHandle {
    /// Build a handle for `path`, recording it relative to `root`.
    ///
    /// Paths outside `root` keep their full path as the relative one.
    pub fn from_path(root: &Path, path: &Path) -> Result<Self> {
        let path = std::path::absolute(path).map_err(|e| Error::io(path, e))?;
        let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
        let metadata = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;

        let relative = path
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());

        Ok(FileHandle {
            path,
            relative,
            size: metadata.len(),
        })
    }
}

/// Scan a directory and return all regular files with their sizes, in path order
pub fn scan_directory(root: &Path) -> Result<Vec<FileHandle>> {
    let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
    if !root.is_dir() {
        return Err(Error::InvalidSource(root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false) // Don't follow symlinks to avoid infinite loops
    {
        let entry = entry.map_err(|e| Error::io(&root, io::Error::other(e.to_string())))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata().map_err(|e| Error::io(&path, io::Error::other(e.to_string())))?;
        let relative = match path.strip_prefix(&root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };

        files.push(FileHandle {
            path,
            relative,
            size: metadata.len(),
        });
    }

    log::debug!("scanned {} files under {}", files.len(), root.display());
    Ok(files)
}
