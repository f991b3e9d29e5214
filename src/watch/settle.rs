//! Write-stability debounce.
//!
//! A freshly-dropped file may still be mid-copy when the first notify event
//! arrives. Each candidate is held here until its size/mtime snapshot has
//! stopped changing for the quiet period, so the pipeline only ever sees
//! completed writes.

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use tracing::debug;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    len: u64,
    mtime: Option<SystemTime>,
}

impl Snapshot {
    fn of(meta: &Metadata) -> Self {
        Self {
            len: meta.len(),
            mtime: meta.modified().ok(),
        }
    }
}

struct Pending {
    snapshot: Snapshot,
    unchanged_since: Instant,
}

/// Tracks candidate files until their writes have settled.
///
/// Owned exclusively by the watch loop; `insert` on every add-event,
/// `poll` on every tick.
pub struct FileSettleTracker {
    pending: HashMap<PathBuf, Pending>,
    threshold: Duration,
}

impl FileSettleTracker {
    pub fn new(threshold: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            threshold,
        }
    }

    /// Start (or restart) tracking a path. A repeat event for a tracked path
    /// leaves its snapshot clock alone; the next poll notices any change.
    pub fn insert(&mut self, path: PathBuf) {
        self.pending.entry(path).or_insert_with(|| Pending {
            snapshot: Snapshot {
                len: u64::MAX,
                mtime: None,
            },
            unchanged_since: Instant::now(),
        });
    }

    pub fn is_tracking(&self, path: &std::path::Path) -> bool {
        self.pending.contains_key(path)
    }

    /// Re-stat every pending path and drain the ones whose snapshot has held
    /// still for the quiet period. Paths that vanished or turned out to be
    /// directories are dropped silently.
    pub fn poll(&mut self) -> Vec<PathBuf> {
        let now = Instant::now();
        let mut settled = Vec::new();

        self.pending.retain(|path, entry| {
            let meta = match std::fs::metadata(path) {
                Ok(m) if m.is_file() => m,
                _ => {
                    debug!("Dropping vanished or non-file entry: {}", path.display());
                    return false;
                }
            };
            let snapshot = Snapshot::of(&meta);
            if snapshot != entry.snapshot {
                entry.snapshot = snapshot;
                entry.unchanged_since = now;
                return true;
            }
            if now.duration_since(entry.unchanged_since) >= self.threshold {
                settled.push(path.clone());
                return false;
            }
            true
        });

        settled
    }
}
