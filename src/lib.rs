//! tcstamp — stamp SMPTE timecode into video files.
//!
//! The timecode is derived from the file's creation time (or supplied by the
//! operator) and embedded as container metadata through a stream-copy ffmpeg
//! remux. Files can be processed one at a time or picked up automatically
//! from a watched folder.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod remux;
pub mod timecode;
pub mod watch;

pub use error::{Error, Result};
pub use timecode::Timecode;
