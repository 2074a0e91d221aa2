use std::fs;
use std::path::Path;

use serde::Serialize;

use super::{ArchiveIndex, DATA_DIR, INDEX_FILE, README_FILE, copy_file};
use crate::error::{Error, Result};
use crate::grouping::{self, DetectionResult};
use crate::hasher::HashAlgorithm;
use crate::progress;
use crate::scanner;

/// What a pack run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PackSummary {
    /// Number of equivalence classes, i.e. physical files under `data/`
    pub classes: usize,
    /// Number of source files recorded in the index
    pub files: usize,
    pub bytes_copied: u64,
}

/// Pack `source` into a new archive at `destination`
pub fn pack(source: &Path, destination: &Path, algorithm: HashAlgorithm) -> Result<PackSummary> {
    pack_with_progress(source, destination, algorithm, false)
}

/// Pack `source` into a new archive at `destination`, optionally drawing a progress bar.
///
/// Nothing is written unless `source` is a directory and `destination` does not
/// exist yet. A failure after the destination was created removes it again.
pub fn pack_with_progress(
    source: &Path,
    destination: &Path,
    algorithm: HashAlgorithm,
    show_progress: bool,
) -> Result<PackSummary> {
    if !source.is_dir() {
        return Err(Error::InvalidSource(source.to_path_buf()));
    }
    if fs::symlink_metadata(destination).is_ok() {
        return Err(Error::DestinationExists(destination.to_path_buf()));
    }

    let files = scanner::scan_directory(source)?;
    let detection = grouping::detect_duplicates(files, algorithm)?;
    let index = ArchiveIndex::from_detection(&detection)?;

    fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;

    match write_archive(destination, &detection, &index, algorithm, show_progress) {
        Ok(summary) => {
            log::info!(
                "packed {} files as {} unique files ({} bytes) into {}",
                summary.files,
                summary.classes,
                summary.bytes_copied,
                destination.display()
            );
            Ok(summary)
        }
        Err(err) => {
            if let Err(cleanup) = fs::remove_dir_all(destination) {
                log::warn!(
                    "could not remove partial archive {}: {}",
                    destination.display(),
                    cleanup
                );
            }
            Err(err)
        }
    }
}

fn write_archive(
    destination: &Path,
    detection: &DetectionResult,
    index: &ArchiveIndex,
    algorithm: HashAlgorithm,
    show_progress: bool,
) -> Result<PackSummary> {
    let readme_path = destination.join(README_FILE);
    fs::write(&readme_path, readme(detection, algorithm)).map_err(|e| Error::io(&readme_path, e))?;

    let index_path = destination.join(INDEX_FILE);
    fs::write(&index_path, index.to_text()).map_err(|e| Error::io(&index_path, e))?;

    // data/ appears with the first representative; an empty source has none
    let data = destination.join(DATA_DIR);

    let bar = progress::copy_bar(detection.classes.len(), show_progress, "packing");
    let mut summary = PackSummary {
        classes: detection.unique_count(),
        files: detection.file_count(),
        bytes_copied: 0,
    };

    for class in &detection.classes {
        let Some(representative) = class.representative() else {
            continue;
        };
        summary.bytes_copied += copy_file(
            &representative.path,
            &data.join(&representative.relative),
        )?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(summary)
}

fn readme(detection: &DetectionResult, algorithm: HashAlgorithm) -> String {
    format!(
        "This directory is a deduplicated archive written by {name} {version}.\n\
         \n\
         hash algorithm: {algorithm}\n\
         original files: {files}\n\
         unique files:   {classes}\n\
         \n\
         {index} lists every original file, grouped into blocks of identical files\n\
         separated by blank lines. The first file of each block is stored under\n\
         {data}/ at its original relative path.\n\
         \n\
         Restore the original directory with:\n\
         \n\
         \x20   {name} unpack -i <this directory> -o <output directory>\n",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        files = detection.file_count(),
        classes = detection.unique_count(),
        index = INDEX_FILE,
        data = DATA_DIR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn count_files(dir: &Path) -> usize {
        scanner::scan_directory(dir).unwrap().len()
    }

    #[test]
    fn test_pack_stores_one_copy_per_class() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        create_file(&source, "test.txt", b"test1");
        create_file(&source, "test_.txt", b"test1");
        create_file(&source, "test2.txt", b"test2");
        let archive = temp.path().join("packed");

        let summary = pack(&source, &archive, HashAlgorithm::Md5).unwrap();

        assert_eq!(summary.classes, 2);
        assert_eq!(summary.files, 3);
        assert_eq!(summary.bytes_copied, 10);
        assert!(archive.join(README_FILE).is_file());
        assert_eq!(fs::read(archive.join("data/test.txt")).unwrap(), b"test1");
        assert!(!archive.join("data/test_.txt").exists());
        assert_eq!(fs::read(archive.join("data/test2.txt")).unwrap(), b"test2");

        let text = fs::read_to_string(archive.join(INDEX_FILE)).unwrap();
        assert_eq!(text, "test2.txt\n\ntest.txt\ntest_.txt");
    }

    #[test]
    fn test_pack_without_duplicates_copies_everything() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        create_file(&source, "a.txt", b"alpha");
        create_file(&source, "sub/b.txt", b"beta");
        create_file(&source, "sub/deeper/c.txt", b"gamma");
        let archive = temp.path().join("packed");

        let summary = pack(&source, &archive, HashAlgorithm::Sha256).unwrap();

        assert_eq!(summary.classes, 3);
        assert_eq!(count_files(&archive.join(DATA_DIR)), 3);
        assert!(archive.join("data/sub/deeper/c.txt").is_file());
    }

    #[test]
    fn test_pack_with_duplicates_stores_fewer_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        create_file(&source, "one.bin", b"same bytes");
        create_file(&source, "x/two.bin", b"same bytes");
        create_file(&source, "x/y/three.bin", b"same bytes");
        create_file(&source, "other.bin", b"different!");
        let archive = temp.path().join("packed");

        let summary = pack(&source, &archive, HashAlgorithm::Md5).unwrap();

        assert_eq!(summary.classes, 2);
        assert_eq!(count_files(&archive.join(DATA_DIR)), 2);
        assert_eq!(summary.bytes_copied, 20);
    }

    #[test]
    fn test_pack_empty_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir(&source).unwrap();
        let archive = temp.path().join("packed");

        let summary = pack(&source, &archive, HashAlgorithm::Md5).unwrap();

        assert_eq!(summary, PackSummary::default());
        assert!(archive.join(README_FILE).is_file());
        assert!(!archive.join(DATA_DIR).exists());
        assert_eq!(fs::read_to_string(archive.join(INDEX_FILE)).unwrap(), "");
    }

    #[test]
    fn test_pack_existing_destination_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        create_file(&source, "a.txt", b"alpha");
        let archive = temp.path().join("packed");
        fs::create_dir(&archive).unwrap();

        let err = pack(&source, &archive, HashAlgorithm::Md5).unwrap_err();

        assert!(matches!(err, Error::DestinationExists(_)));
        assert_eq!(fs::read_dir(&archive).unwrap().count(), 0);
    }

    #[test]
    fn test_pack_invalid_source_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("packed");

        let err = pack(&temp.path().join("missing"), &archive, HashAlgorithm::Md5).unwrap_err();

        assert!(matches!(err, Error::InvalidSource(_)));
        assert!(!archive.exists());
    }

    #[test]
    fn test_readme_mentions_algorithm() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        create_file(&source, "a.txt", b"alpha");
        let archive = temp.path().join("packed");

        pack(&source, &archive, HashAlgorithm::Sha512).unwrap();

        let readme = fs::read_to_string(archive.join(README_FILE)).unwrap();
        assert!(readme.contains("hash algorithm: sha512"));
    }
}
