//! Deduplicated archives.
//!
//! An archive is a directory holding `readme.txt`, `index.txt` and a `data/`
//! tree with exactly one physical copy of every distinct file content.

pub mod index;
pub mod pack;
pub mod unpack;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use index::ArchiveIndex;
pub use pack::{PackSummary, pack, pack_with_progress};
pub use unpack::{UnpackSummary, unpack, unpack_with_progress};

pub const README_FILE: &str = "readme.txt";
pub const INDEX_FILE: &str = "index.txt";
pub const DATA_DIR: &str = "data";

/// Copy `from` to `to`, creating missing parent directories
fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let bytes = fs::copy(from, to).map_err(|e| Error::io(from, e))?;
    log::trace!("copied {} -> {} ({} bytes)", from.display(), to.display(), bytes);
    Ok(bytes)
}
