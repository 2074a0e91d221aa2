use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while detecting duplicates or reading and writing archives
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown hash algorithm '{0}' (expected one of: md5, sha1, sha256, sha512, blake3)")]
    UnknownAlgorithm(String),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("invalid source directory: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("invalid destination directory: {}", .0.display())]
    InvalidDestination(PathBuf),

    #[error("archive index not found: {}", .0.display())]
    MissingIndex(PathBuf),

    #[error("archive data directory not found: {}", .0.display())]
    MissingData(PathBuf),

    #[error("malformed archive index at line {line}: {reason}")]
    MalformedIndex { line: usize, reason: String },

    #[error("representative missing from archive data: {}", .0.display())]
    MissingRepresentative(PathBuf),

    #[error("path cannot be recorded in the archive index: {}", .0.display())]
    UnsupportedPath(PathBuf),

    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wrap an I/O error together with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
