//! Single-file processing pipeline.
//!
//! Stat the input, pick the timecode, derive the output name, run the remux.
//! One attempt per file; the caller decides whether a failure is fatal (CLI)
//! or isolated (watcher).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::config::ProcessingOptions;
use crate::error::{Error, Result};
use crate::output::derive_output_path;
use crate::remux::Remuxer;
use crate::timecode::{self, Timecode};

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    /// The timecode stamped into the file.
    pub timecode: Timecode,
    /// Where the stamped file ended up (the input path in destructive mode).
    pub output_path: PathBuf,
    /// The input's creation time as `hh:mm:ss.mmm`, for reporting.
    pub created_time: String,
}

/// Process one file under the given options.
pub async fn process(
    input: &Path,
    options: &ProcessingOptions,
    remuxer: &Remuxer,
) -> Result<ProcessingResult> {
    let meta = tokio::fs::metadata(input)
        .await
        .map_err(|e| Error::stat(input, e))?;
    // Birth time is not available on every platform/filesystem; fall back to
    // the modification time.
    let created = meta
        .created()
        .or_else(|_| meta.modified())
        .map_err(|e| Error::stat(input, e))?;
    let created_at = DateTime::<Local>::from(created);

    let created_time = timecode::format_created(created_at);
    let tc = timecode::compute(created_at, options)?;
    info!("File creation time: {created_time}");
    info!("Using video timecode: {tc}");

    let output = derive_output_path(input, &tc, options);
    let final_path = remuxer.apply(input, &output, &tc, options.destructive).await?;

    Ok(ProcessingResult {
        timecode: tc,
        output_path: final_path,
        created_time,
    })
}
