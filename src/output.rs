//! Output filename derivation.
//!
//! Pure path math, no I/O: the stamped copy always lands next to the input,
//! named either `{rename}_{timecode}{ext}` (colons stripped) or
//! `{stem}_tc{ext}`.

use std::path::{Path, PathBuf};

use crate::config::ProcessingOptions;
use crate::timecode::Timecode;

/// Derive the destination path for the stamped copy of `input`.
pub fn derive_output_path(
    input: &Path,
    timecode: &Timecode,
    options: &ProcessingOptions,
) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let file_name = match &options.rename {
        Some(prefix) => format!("{prefix}_{}{ext}", timecode.compact()),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{stem}_tc{ext}")
        }
    };
    dir.join(file_name)
}
