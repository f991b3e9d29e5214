//! ffmpeg invocation.
//!
//! The remux is a single ffmpeg run that stream-copies every stream and sets
//! the container timecode. stdout/stderr are inherited so ffmpeg's own
//! progress output reaches the operator; success is judged purely by exit
//! status.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use crate::timecode::Timecode;

/// Executes the timecode remux for one file at a time.
pub struct Remuxer {
    ffmpeg: Option<PathBuf>,
}

impl Remuxer {
    /// Resolve ffmpeg from the config override, falling back to a PATH
    /// search. A missing tool is recorded as absent and only surfaces when
    /// a remux is attempted.
    pub fn locate(tools: &ToolsConfig) -> Self {
        let ffmpeg = match tools.ffmpeg_path.as_deref() {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                warn!(
                    "Configured ffmpeg path does not exist, falling back to PATH: {}",
                    p.display()
                );
                which::which("ffmpeg").ok()
            }
            None => which::which("ffmpeg").ok(),
        };
        Self { ffmpeg }
    }

    /// Use an explicit program instead of discovery.
    pub fn with_program(program: PathBuf) -> Self {
        Self {
            ffmpeg: Some(program),
        }
    }

    fn require(&self) -> Result<&Path> {
        self.ffmpeg
            .as_deref()
            .ok_or_else(|| Error::tool("ffmpeg", "ffmpeg not found; is it installed and in PATH?"))
    }

    /// Remux `input` to `output` with the given timecode stamped in.
    ///
    /// With `destructive` set, a successful output replaces the original in
    /// place and the separately-named output path no longer exists. Returns
    /// the path holding the stamped file.
    pub async fn apply(
        &self,
        input: &Path,
        output: &Path,
        timecode: &Timecode,
        destructive: bool,
    ) -> Result<PathBuf> {
        let program = self.require()?;
        let args = build_args(input, output, timecode);
        info!("Executing: {} {}", program.display(), args.join(" "));

        let status = Command::new(program)
            .args(&args)
            .status()
            .await
            .map_err(|e| Error::tool("ffmpeg", format!("failed to launch: {e}")))?;
        if !status.success() {
            return Err(Error::tool("ffmpeg", format!("exited with status {status}")));
        }
        info!("Timecode {timecode} added to {}", output.display());

        if destructive {
            replace_original(input, output)?;
            info!("Replaced original file with the stamped copy");
            return Ok(input.to_path_buf());
        }
        Ok(output.to_path_buf())
    }
}

/// The exact argument vector: overwrite, container timecode, map all
/// streams, stream copy.
fn build_args(input: &Path, output: &Path, timecode: &Timecode) -> Vec<String> {
    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-timecode".to_string(),
        timecode.to_string(),
        "-map".to_string(),
        "0".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    debug!("ffmpeg args: {:?}", args);
    args
}

/// Move `output` over `input`.
///
/// Try rename first (same filesystem), fall back to copy+remove. The remove
/// must succeed too: a destructive run only counts as complete once the
/// separately-named output path is gone.
fn replace_original(input: &Path, output: &Path) -> Result<()> {
    if std::fs::rename(output, input).is_err() {
        std::fs::copy(output, input)?;
        std::fs::remove_file(output)?;
    }
    Ok(())
}
