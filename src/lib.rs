//! Duplicate file detection and deduplicated directory archives.
//!
//! Files are partitioned into equivalence classes by size, then by a digest of
//! their first chunk, then by a digest of their whole content. Packing writes one
//! physical copy per class plus an index from which every original path can be
//! restored.

pub mod archive;
pub mod error;
pub mod grouping;
pub mod hasher;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

pub use error::{Error, Result};
pub use grouping::{DetectionResult, EquivalenceClass, detect_duplicates};
pub use hasher::{HashAlgorithm, compute_digest};
pub use scanner::FileHandle;
