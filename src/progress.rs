use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a bar counting copied files, drawn on stderr.
///
/// Hidden when disabled or when stderr is not a terminal, so piped output and
/// tests never see it.
pub fn copy_bar(len: usize, enabled: bool, message: &'static str) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(message);
    bar
}
