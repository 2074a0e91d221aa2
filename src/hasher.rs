use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use sha2::Digest;

use crate::error::{Error, Result};

/// Default read size for hashing, also the length of the short digest prefix (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    #[value(name = "md5")]
    Md5,
    #[value(name = "sha1")]
    Sha1,
    #[value(name = "sha256")]
    Sha256,
    #[value(name = "sha512")]
    Sha512,
    #[value(name = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake3,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    fn state(self) -> DigestState {
        match self {
            HashAlgorithm::Md5 => DigestState::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => DigestState::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => DigestState::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha512 => DigestState::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Blake3 => DigestState::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Running digest for one of the supported algorithms
enum DigestState {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Md5(h) => h.update(data),
            DigestState::Sha1(h) => h.update(data),
            DigestState::Sha256(h) => h.update(data),
            DigestState::Sha512(h) => h.update(data),
            DigestState::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            DigestState::Md5(h) => hex::encode(h.finalize()),
            DigestState::Sha1(h) => hex::encode(h.finalize()),
            DigestState::Sha256(h) => hex::encode(h.finalize()),
            DigestState::Sha512(h) => hex::encode(h.finalize()),
            DigestState::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// Fill `buffer` from `reader`, stopping early only at end of file
fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Compute the hex digest of a file, reading it in chunks of `chunk_size` bytes.
///
/// With `short` set, only the first chunk is hashed. Files no larger than one chunk
/// therefore have identical short and full digests.
pub fn compute_digest(
    algorithm: HashAlgorithm,
    path: &Path,
    chunk_size: usize,
    short: bool,
) -> Result<String> {
    if chunk_size == 0 {
        return Err(Error::InvalidChunkSize);
    }

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = vec![0u8; chunk_size];
    let mut state = algorithm.state();

    loop {
        let bytes_read = read_chunk(&mut reader, &mut buffer).map_err(|e| Error::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        state.update(&buffer[..bytes_read]);
        if short {
            break;
        }
    }

    Ok(state.finalize_hex())
}

/// Digest of the first chunk only
pub fn short_digest(algorithm: HashAlgorithm, path: &Path) -> Result<String> {
    compute_digest(algorithm, path, DEFAULT_CHUNK_SIZE, true)
}

/// Digest of the entire file contents
pub fn full_digest(algorithm: HashAlgorithm, path: &Path) -> Result<String> {
    compute_digest(algorithm, path, DEFAULT_CHUNK_SIZE, false)
}
