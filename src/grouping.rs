//! Staged duplicate detection.
//!
//! Files are refined through an ordered list of discriminators (size, short digest,
//! full digest). Each stage only looks at classes that still hold more than one
//! file, so a file with a unique size is never opened at all.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::hasher::{self, HashAlgorithm};
use crate::scanner::FileHandle;

/// Joins the values of successive discriminator stages into a class key
pub const KEY_SEPARATOR: char = '_';

/// A discriminator stage: maps a file to a comparable value
pub type Discriminator<'a> = dyn Fn(&FileHandle) -> Result<String> + Sync + 'a;

/// Files believed identical at the current refinement stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceClass {
    /// Concatenated discriminator values, e.g. `_5_<short>_<full>`
    pub key: String,
    pub files: Vec<FileHandle>,
}

impl EquivalenceClass {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The member stored physically when packing
    pub fn representative(&self) -> Option<&FileHandle> {
        self.files.first()
    }

    /// Member paths as seen from `root`, the directory the files were scanned under
    pub fn paths_under(&self, root: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|f| root.join(&f.relative)).collect()
    }
}

/// Outcome of duplicate detection
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    /// True iff every final class holds exactly one file
    pub is_unique: bool,
    /// Final classes in discovery order
    pub classes: Vec<EquivalenceClass>,
}

impl DetectionResult {
    /// Number of distinct contents
    pub fn unique_count(&self) -> usize {
        self.classes.len()
    }

    pub fn file_count(&self) -> usize {
        self.classes.iter().map(EquivalenceClass::len).sum()
    }

    /// Classes holding more than one file
    pub fn duplicates(&self) -> impl Iterator<Item = &EquivalenceClass> {
        self.classes.iter().filter(|class| class.len() > 1)
    }

    pub fn get(&self, key: &str) -> Option<&EquivalenceClass> {
        self.classes.iter().find(|class| class.key == key)
    }
}

/// Partition files by size, then short digest, then full digest
pub fn detect_duplicates(
    files: Vec<FileHandle>,
    algorithm: HashAlgorithm,
) -> Result<DetectionResult> {
    let size = |file: &FileHandle| -> Result<String> { Ok(file.size.to_string()) };
    let short = |file: &FileHandle| hasher::short_digest(algorithm, &file.path);
    let full = |file: &FileHandle| hasher::full_digest(algorithm, &file.path);

    let stages: [&Discriminator<'_>; 3] = [&size, &short, &full];
    detect_with(files, &stages)
}

/// Run the staged refinement with an arbitrary discriminator hierarchy.
///
/// Stops as soon as every class is a singleton. Classes left untouched by a stage
/// keep their position; classes produced by a stage are appended in discovery order.
pub fn detect_with(
    files: Vec<FileHandle>,
    stages: &[&Discriminator<'_>],
) -> Result<DetectionResult> {
    let mut classes = vec![EquivalenceClass {
        key: String::new(),
        files,
    }];

    for (stage, discriminator) in stages.iter().enumerate() {
        if classes.iter().all(|class| class.len() == 1) {
            break;
        }

        let (kept, pending): (Vec<_>, Vec<_>) =
            classes.into_iter().partition(|class| class.len() == 1);

        let mut refined: Vec<EquivalenceClass> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for class in pending {
            let values: Vec<String> = class
                .files
                .par_iter()
                .map(|file| discriminator(file))
                .collect::<Result<_>>()?;

            for (file, value) in class.files.into_iter().zip(values) {
                let key = format!("{}{}{}", class.key, KEY_SEPARATOR, value);
                match index.get(&key) {
                    Some(&i) => refined[i].files.push(file),
                    None => {
                        index.insert(key.clone(), refined.len());
                        refined.push(EquivalenceClass {
                            key,
                            files: vec![file],
                        });
                    }
                }
            }
        }

        log::debug!(
            "stage {}: {} settled, {} refined, {} still ambiguous",
            stage + 1,
            kept.len(),
            refined.len(),
            refined.iter().filter(|class| class.len() > 1).count()
        );

        classes = kept;
        classes.extend(refined);
    }

    let is_unique = classes.iter().all(|class| class.len() == 1);
    Ok(DetectionResult { is_unique, classes })
}
