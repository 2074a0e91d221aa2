use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{ArchiveIndex, DATA_DIR, INDEX_FILE, copy_file};
use crate::error::{Error, Result};
use crate::progress;

/// What an unpack run restored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnpackSummary {
    /// Number of files materialized in the destination
    pub restored: usize,
    /// Number of index blocks (distinct contents)
    pub classes: usize,
}

/// One index block resolved against the archive and destination
struct RestorePlan {
    representative: PathBuf,
    targets: Vec<PathBuf>,
}

/// Restore every file recorded in the archive at `archive` into `destination`
pub fn unpack(archive: &Path, destination: &Path) -> Result<UnpackSummary> {
    unpack_with_progress(archive, destination, false)
}

/// Restore every file recorded in the archive, optionally drawing a progress bar.
///
/// The archive is validated completely before anything is written: a missing
/// index or data directory, a malformed index, or a representative absent from
/// `data/` fails the whole run with nothing copied.
pub fn unpack_with_progress(
    archive: &Path,
    destination: &Path,
    show_progress: bool,
) -> Result<UnpackSummary> {
    let index_path = archive.join(INDEX_FILE);
    if !index_path.is_file() {
        return Err(Error::MissingIndex(index_path));
    }
    let data = archive.join(DATA_DIR);
    if !data.is_dir() {
        return Err(Error::MissingData(data));
    }
    if !destination.is_dir() {
        return Err(Error::InvalidDestination(destination.to_path_buf()));
    }

    let text = fs::read_to_string(&index_path).map_err(|e| Error::io(&index_path, e))?;
    let index = ArchiveIndex::parse(&text)?;
    let plans = plan(&index, &data, destination)?;

    let bar = progress::copy_bar(index.path_count(), show_progress, "restoring");
    let mut summary = UnpackSummary {
        restored: 0,
        classes: plans.len(),
    };
    for plan in &plans {
        for target in &plan.targets {
            copy_file(&plan.representative, target)?;
            summary.restored += 1;
            bar.inc(1);
        }
    }
    bar.finish_and_clear();

    log::info!(
        "restored {} files from {} unique files into {}",
        summary.restored,
        summary.classes,
        destination.display()
    );
    Ok(summary)
}

fn plan(index: &ArchiveIndex, data: &Path, destination: &Path) -> Result<Vec<RestorePlan>> {
    let mut plans = Vec::with_capacity(index.blocks.len());

    for relatives in index.relative_paths() {
        let Some(first) = relatives.first() else {
            continue;
        };

        let representative = data.join(first);
        if !representative.is_file() {
            return Err(Error::MissingRepresentative(representative));
        }

        plans.push(RestorePlan {
            representative,
            targets: relatives.iter().map(|r| destination.join(r)).collect(),
        });
    }

    Ok(plans)
}
