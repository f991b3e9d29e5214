//! Folder watching.
//!
//! One event loop per watched folder: notify add-events and an initial scan
//! feed the settle tracker; settled files that pass the extension filter are
//! processed one tokio task each; successful runs are filed into `original/`
//! and `tc/` subfolders. One file's failure never stops the loop.

pub mod settle;

pub use settle::FileSettleTracker;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{ProcessingOptions, WatchConfig};
use crate::error::{Error, Result};
use crate::pipeline;
use crate::remux::Remuxer;

/// Subfolder the original inputs are filed into.
const ORIGINAL_DIR: &str = "original";
/// Subfolder the stamped outputs are filed into.
const TC_DIR: &str = "tc";

/// Watch `folder` for arriving video files and process each one.
///
/// Pre-existing root-level files are treated as arrivals too. Runs until
/// `cancel` fires; per-file failures are logged and dropped.
pub async fn run(
    folder: PathBuf,
    options: ProcessingOptions,
    config: WatchConfig,
    remuxer: Arc<Remuxer>,
    cancel: CancellationToken,
) -> Result<()> {
    if !folder.is_dir() {
        return Err(Error::Watch(format!(
            "watch folder does not exist or is not a directory: {}",
            folder.display()
        )));
    }

    let (event_tx, mut event_rx) = mpsc::channel::<std::result::Result<Event, notify::Error>>(256);
    let mut watcher = notify::recommended_watcher(
        move |res: std::result::Result<Event, notify::Error>| {
            let relevant = match &res {
                Ok(event) => matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)),
                Err(_) => true,
            };
            if relevant {
                let _ = event_tx.blocking_send(res);
            }
        },
    )
    .map_err(|e| Error::Watch(format!("failed to create file watcher: {e}")))?;

    // Root level only; relocation into original/ and tc/ must not re-trigger.
    watcher
        .watch(&folder, RecursiveMode::NonRecursive)
        .map_err(|e| Error::Watch(format!("failed to watch {}: {e}", folder.display())))?;
    info!("Watching folder: {}", folder.display());

    let mut tracker = FileSettleTracker::new(Duration::from_millis(config.settle_threshold_ms));
    scan_existing(&folder, &mut tracker)?;

    let extensions: Vec<String> = config
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();
    let options = Arc::new(options);

    let mut in_flight: HashSet<PathBuf> = HashSet::new();
    let (done_tx, mut done_rx) = mpsc::channel::<PathBuf>(64);
    let mut poll = tokio::time::interval(Duration::from_millis(config.poll_interval_ms.max(1)));
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Watch loop stopping");
                return Ok(());
            }

            event = event_rx.recv(), if events_open => {
                match event {
                    Some(Ok(event)) => {
                        for path in event.paths {
                            if path.parent() == Some(folder.as_path()) {
                                tracker.insert(path);
                            }
                        }
                    }
                    Some(Err(e)) => warn!("Watcher error event: {e}"),
                    None => {
                        // Keep serving tracked and in-flight work; new
                        // arrivals will no longer be seen.
                        error!("Watcher event channel closed");
                        events_open = false;
                    }
                }
            }

            _ = poll.tick() => {
                for path in tracker.poll() {
                    if !admit(&path, &extensions, &in_flight) {
                        continue;
                    }
                    info!("New file detected: {}", path.display());
                    in_flight.insert(path.clone());
                    let folder = folder.clone();
                    let options = options.clone();
                    let remuxer = remuxer.clone();
                    let done_tx = done_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = process_one(&folder, &path, &options, &remuxer).await {
                            error!("Failed to process {}: {e}", path.display());
                        }
                        let _ = done_tx.send(path).await;
                    });
                }
            }

            Some(path) = done_rx.recv() => {
                in_flight.remove(&path);
                debug!("Finished handling {}", path.display());
            }
        }
    }
}

/// Enumerate pre-existing root-level files as if they had just arrived.
fn scan_existing(folder: &Path, tracker: &mut FileSettleTracker) -> Result<()> {
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            debug!("Initial scan found {}", path.display());
            tracker.insert(path);
        }
    }
    Ok(())
}

fn admit(path: &Path, extensions: &[String], in_flight: &HashSet<PathBuf>) -> bool {
    if in_flight.contains(path) {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !extensions.iter().any(|allowed| *allowed == ext) {
        debug!("Ignoring non-video file: {}", path.display());
        return false;
    }
    path.is_file()
}

/// Pipeline plus relocation for one settled file.
async fn process_one(
    folder: &Path,
    input: &Path,
    options: &ProcessingOptions,
    remuxer: &Remuxer,
) -> Result<()> {
    let result = pipeline::process(input, options, remuxer).await?;
    relocate(folder, input, &result.output_path).await?;
    info!(
        "Processed {} with timecode {}",
        input.display(),
        result.timecode
    );
    Ok(())
}

/// File the original into `original/` and the stamped output into `tc/`.
///
/// In destructive mode input and output are the same path; the single
/// remaining file goes to `tc/`.
async fn relocate(folder: &Path, input: &Path, output: &Path) -> Result<()> {
    let original_dir = folder.join(ORIGINAL_DIR);
    let tc_dir = folder.join(TC_DIR);
    // Concurrent first-time creation: "already exists" is success.
    for dir in [&original_dir, &tc_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::relocation(dir.clone(), format!("failed to create: {e}")))?;
    }

    if input != output {
        move_into(input, &original_dir).await?;
    }
    move_into(output, &tc_dir).await?;
    Ok(())
}

async fn move_into(file: &Path, dir: &Path) -> Result<()> {
    let name = file
        .file_name()
        .ok_or_else(|| Error::relocation(file, "path has no file name"))?;
    let dest = dir.join(name);
    tokio::fs::rename(file, &dest)
        .await
        .map_err(|e| Error::relocation_move(file, &dest, e))?;
    info!("Moved {} to {}", file.display(), dest.display());
    Ok(())
}
