use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::grouping::DetectionResult;

/// Ordered list of path blocks, one block per equivalence class.
///
/// Serialized as one relative path per line with a blank line between blocks.
/// The first path of each block names the representative stored under `data/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    pub blocks: Vec<Vec<String>>,
}

impl ArchiveIndex {
    /// Build the index from detection output, in class order
    pub fn from_detection(result: &DetectionResult) -> Result<Self> {
        let blocks = result
            .classes
            .iter()
            .map(|class| {
                class
                    .files
                    .iter()
                    .map(|file| encode_path(&file.relative))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ArchiveIndex { blocks })
    }

    pub fn to_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line_number = i + 1;
            if line.is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                continue;
            }

            decode_path(line).map_err(|reason| Error::MalformedIndex {
                line: line_number,
                reason,
            })?;
            current.push(line.to_string());
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        Ok(ArchiveIndex { blocks })
    }

    /// Every block as relative paths. Lines are validated by `parse`, so this
    /// only splits on `/`.
    pub fn relative_paths(&self) -> Vec<Vec<PathBuf>> {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .iter()
                    .map(|entry| entry.split('/').collect::<PathBuf>())
                    .collect()
            })
            .collect()
    }

    /// Total number of recorded paths
    pub fn path_count(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }
}

/// Render a relative path as a `/`-separated index line
pub fn encode_path(relative: &Path) -> Result<String> {
    let unsupported = || Error::UnsupportedPath(relative.to_path_buf());

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(unsupported)?;
                if part.contains(['\n', '\r']) {
                    return Err(unsupported());
                }
                parts.push(part);
            }
            Component::CurDir => {}
            _ => return Err(unsupported()),
        }
    }

    if parts.is_empty() {
        return Err(unsupported());
    }
    Ok(parts.join("/"))
}

/// Turn an index line back into a relative path, refusing anything that could
/// escape the directory it is joined onto
pub fn decode_path(line: &str) -> std::result::Result<PathBuf, String> {
    if line.starts_with('/') {
        return Err(format!("absolute path '{line}'"));
    }

    let mut path = PathBuf::new();
    for part in line.split('/') {
        match part {
            "" => return Err(format!("empty path component in '{line}'")),
            "." | ".." => return Err(format!("relative component '{part}' in '{line}'")),
            _ => {}
        }
        let component = Path::new(part);
        if !matches!(
            component.components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        ) {
            return Err(format!("invalid path component '{part}' in '{line}'"));
        }
        path.push(part);
    }

    Ok(path)
}
