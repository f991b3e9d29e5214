//! Configuration types.
//!
//! All knobs are plain data constructed once at the CLI boundary and handed
//! down by reference. Every field defaults sensibly so an empty `{}` value
//! deserializes to the stock behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-invocation processing options shared by single-file and watch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Replace the original file with the stamped copy on success.
    pub destructive: bool,
    /// Filename prefix for the stamped copy; `None` keeps the input stem.
    pub rename: Option<String>,
    /// Operator-supplied start timecode (`hh:mm:ss:ff`); `None` derives it
    /// from the file's creation time.
    pub start: Option<String>,
    #[serde(default = "default_framerate")]
    pub framerate: u32,
}

fn default_framerate() -> u32 {
    24
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            destructive: false,
            rename: None,
            start: None,
            framerate: default_framerate(),
        }
    }
}

/// Folder-watch tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Extensions admitted to processing, compared case-insensitively and
    /// without the leading dot.
    pub extensions: Vec<String>,
    /// How long a file's size/mtime must hold still before it is processed.
    #[serde(default = "default_settle_threshold_ms")]
    pub settle_threshold_ms: u64,
    /// How often pending files are re-stat'ed for stability.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_extensions() -> Vec<String> {
    vec!["mov".into(), "mp4".into()]
}

fn default_settle_threshold_ms() -> u64 {
    2000
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            settle_threshold_ms: default_settle_threshold_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Explicit ffmpeg location; falls back to a PATH search when unset.
    pub ffmpeg_path: Option<PathBuf>,
}
