use clap::Parser;
use std::path::PathBuf;

/// Stamp SMPTE timecode into video files, one-shot or folder-watched.
#[derive(Parser)]
#[command(name = "tcstamp", version, about)]
pub struct Cli {
    /// Video file to stamp (omit when using --watch)
    #[arg(required_unless_present = "watch")]
    pub input: Option<PathBuf>,

    /// Watch a folder and stamp every new video file that appears
    #[arg(short, long, value_name = "FOLDER", conflicts_with = "input")]
    pub watch: Option<PathBuf>,

    /// Replace the original file with the stamped copy
    #[arg(short, long)]
    pub destructive: bool,

    /// Filename prefix for the stamped copy (timecode is appended)
    #[arg(short, long, value_name = "PREFIX")]
    pub rename: Option<String>,

    /// Initial timecode in hh:mm:ss:ff format (default: file creation time)
    #[arg(short, long, value_name = "TIMECODE")]
    pub start: Option<String>,

    /// Frame rate as a positive integer
    #[arg(short, long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    pub framerate: u32,

    /// Explicit path to the ffmpeg binary (default: search PATH)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Print the result as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_single_file_invocation() {
        let cli = Cli::parse_from(["tcstamp", "clip.mov", "-d", "-r", "shoot", "-f", "30"]);
        assert_eq!(cli.input, Some(PathBuf::from("clip.mov")));
        assert!(cli.destructive);
        assert_eq!(cli.rename.as_deref(), Some("shoot"));
        assert_eq!(cli.framerate, 30);
        assert!(cli.watch.is_none());
    }

    #[test]
    fn parses_watch_invocation() {
        let cli = Cli::parse_from(["tcstamp", "--watch", "/media/incoming", "-s", "01:00:00:00"]);
        assert_eq!(cli.watch, Some(PathBuf::from("/media/incoming")));
        assert_eq!(cli.start.as_deref(), Some("01:00:00:00"));
        assert_eq!(cli.framerate, 24);
    }

    #[test]
    fn requires_input_or_watch() {
        assert!(Cli::try_parse_from(["tcstamp"]).is_err());
    }

    #[test]
    fn rejects_input_combined_with_watch() {
        assert!(Cli::try_parse_from(["tcstamp", "clip.mov", "--watch", "/media"]).is_err());
    }

    #[test]
    fn rejects_zero_framerate() {
        assert!(Cli::try_parse_from(["tcstamp", "clip.mov", "-f", "0"]).is_err());
    }
}
