use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use crate::grouping::DetectionResult;
use crate::hasher::HashAlgorithm;

/// Result of analyzing a directory, ready for printing
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub algorithm: HashAlgorithm,
    pub total_files: usize,
    /// Number of distinct contents
    pub unique_files: usize,
    /// True when no file has a duplicate
    pub is_unique: bool,
    /// Every equivalence class, singletons included
    pub groups: Vec<Vec<PathBuf>>,
}

impl AnalysisReport {
    /// Paths are reported under `root` as given, not absolutized
    pub fn from_detection(
        result: &DetectionResult,
        algorithm: HashAlgorithm,
        root: &Path,
    ) -> Self {
        AnalysisReport {
            algorithm,
            total_files: result.file_count(),
            unique_files: result.unique_count(),
            is_unique: result.is_unique,
            groups: result.classes.iter().map(|class| class.paths_under(root)).collect(),
        }
    }

    /// Classes as blocks of paths separated by blank lines
    pub fn render_groups(&self) -> String {
        self.groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Summary line followed by every file that has duplicates
    pub fn render_verbose(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} number of unique files: {}",
            "[summary]".bold(),
            self.unique_files
        );
        let _ = writeln!(out, "total number of files: {}", self.total_files);

        if self.is_unique {
            let _ = writeln!(out, "{}", "No duplicates found.".green());
            return out;
        }

        for group in self.groups.iter().filter(|g| g.len() > 1) {
            let _ = writeln!(
                out,
                "{} file '{}' has duplicate(s) at",
                "[duplicate]".yellow(),
                group[0].display()
            );
            for path in &group[1..] {
                let _ = writeln!(out, "  '{}'", path.display());
            }
        }
        out
    }

    /// Output as human-readable text
    pub fn print_human(&self, verbose: bool) {
        if verbose {
            print!("{}", self.render_verbose());
        } else {
            let groups = self.render_groups();
            if !groups.is_empty() {
                println!("{}", groups);
            }
        }
    }

    /// Output as JSON
    pub fn print_json(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("error serializing report to JSON: {}", e),
        }
    }
}
