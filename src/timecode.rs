//! SMPTE-style timecode values and derivation.
//!
//! A [`Timecode`] is the `hh:mm:ss:ff` value stamped into the container.
//! It is either parsed from an operator-supplied start string or derived
//! from the file's creation time: hours/minutes/seconds come straight from
//! the local wall clock and the frame field is the floor of
//! `ms_of_second / 1000 * framerate`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Timelike};

use crate::config::ProcessingOptions;
use crate::error::{Error, Result};

/// An `hh:mm:ss:ff` timecode.
///
/// Fields are stored as plain numbers; [`fmt::Display`] renders each as two
/// zero-padded digits. Parsing enforces the two-digit shape only, so values
/// like `99` survive a round trip (operator-supplied timecodes are passed to
/// ffmpeg verbatim).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    /// Parse a strict `hh:mm:ss:ff` string: four fields of exactly two ASCII
    /// digits separated by `:`, nothing more.
    pub fn parse(s: &str) -> Result<Self> {
        let mut fields = [0u32; 4];
        let mut parts = s.split(':');
        for field in &mut fields {
            let part = parts
                .next()
                .ok_or_else(Self::format_error)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Self::format_error());
            }
            *field = part.parse().map_err(|_| Self::format_error())?;
        }
        if parts.next().is_some() {
            return Err(Self::format_error());
        }
        Ok(Timecode {
            hours: fields[0],
            minutes: fields[1],
            seconds: fields[2],
            frames: fields[3],
        })
    }

    /// Derive a timecode from a local wall-clock timestamp.
    ///
    /// The frame field is `floor(ms / 1000 * framerate)`, clamped so it never
    /// reaches `framerate` even for out-of-range millisecond readings.
    pub fn from_wall_clock(at: DateTime<Local>, framerate: u32) -> Self {
        let millis = at.timestamp_subsec_millis();
        let frames = (u64::from(millis) * u64::from(framerate) / 1000) as u32;
        Timecode {
            hours: at.hour(),
            minutes: at.minute(),
            seconds: at.second(),
            frames: frames.min(framerate.saturating_sub(1)),
        }
    }

    /// The timecode with colons stripped, for use in filenames.
    pub fn compact(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }

    fn format_error() -> Error {
        Error::validation("start timecode must be in the format hh:mm:ss:ff")
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

impl FromStr for Timecode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Timecode::parse(s)
    }
}

impl serde::Serialize for Timecode {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pick the timecode for a file created at `created_at` under `options`.
///
/// An explicit `options.start` wins and is echoed back verbatim once its
/// shape and frame field check out; hours, minutes and seconds are
/// deliberately not range-checked. Without a start the timecode is derived
/// from the creation time.
pub fn compute(created_at: DateTime<Local>, options: &ProcessingOptions) -> Result<Timecode> {
    if options.framerate == 0 {
        return Err(Error::validation("frame rate must be a positive integer"));
    }
    match &options.start {
        Some(start) => {
            let tc = Timecode::parse(start)?;
            if tc.frames >= options.framerate {
                return Err(Error::validation(format!(
                    "frame number in start timecode must be less than the frame rate ({})",
                    options.framerate
                )));
            }
            Ok(tc)
        }
        None => Ok(Timecode::from_wall_clock(created_at, options.framerate)),
    }
}

/// Render a creation timestamp as `hh:mm:ss.mmm` for reporting.
pub fn format_created(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn local_time(h: u32, m: u32, s: u32, ms: i64) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 4, h, m, s)
            .single()
            .unwrap()
            + Duration::milliseconds(ms)
    }

    fn options(start: Option<&str>, framerate: u32) -> ProcessingOptions {
        ProcessingOptions {
            start: start.map(String::from),
            framerate,
            ..ProcessingOptions::default()
        }
    }

    #[test]
    fn display_pads_fields() {
        let tc = Timecode {
            hours: 1,
            minutes: 2,
            seconds: 3,
            frames: 4,
        };
        assert_eq!(tc.to_string(), "01:02:03:04");
    }

    #[test]
    fn compact_strips_colons() {
        let tc = Timecode::parse("01:02:03:04").unwrap();
        assert_eq!(tc.compact(), "01020304");
        assert!(!tc.compact().contains(':'));
    }

    #[test]
    fn parse_round_trips() {
        let tc = Timecode::parse("12:34:56:07").unwrap();
        assert_eq!(tc.hours, 12);
        assert_eq!(tc.minutes, 34);
        assert_eq!(tc.seconds, 56);
        assert_eq!(tc.frames, 7);
        assert_eq!(tc.to_string(), "12:34:56:07");
    }

    #[test]
    fn parse_via_from_str() {
        let tc: Timecode = "01:00:00:00".parse().unwrap();
        assert_eq!(tc.hours, 1);
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        for bad in [
            "",
            "01:02:03",
            "01:02:03:04:05",
            "1:02:03:04",
            "01:02:03:4",
            "01:02:03:004",
            "01-02-03-04",
            "aa:bb:cc:dd",
            " 01:02:03:04",
            "01:02:03:04 ",
        ] {
            let err = Timecode::parse(bad).unwrap_err();
            assert!(
                err.to_string().contains("hh:mm:ss:ff"),
                "expected format error for {bad:?}, got: {err}"
            );
        }
    }

    #[test]
    fn parse_keeps_out_of_range_clock_fields() {
        // Only the shape is checked; 99 hours survives.
        let tc = Timecode::parse("99:98:97:01").unwrap();
        assert_eq!(tc.hours, 99);
        assert_eq!(tc.to_string(), "99:98:97:01");
    }

    #[test]
    fn compute_echoes_valid_start() {
        let opts = options(Some("10:20:30:12"), 24);
        let tc = compute(local_time(0, 0, 0, 0), &opts).unwrap();
        assert_eq!(tc.to_string(), "10:20:30:12");
    }

    #[test]
    fn compute_accepts_lenient_start_clock_fields() {
        let opts = options(Some("99:00:00:00"), 24);
        let tc = compute(local_time(0, 0, 0, 0), &opts).unwrap();
        assert_eq!(tc.hours, 99);
    }

    #[test]
    fn compute_rejects_frames_at_framerate() {
        let opts = options(Some("00:00:00:24"), 24);
        let err = compute(local_time(0, 0, 0, 0), &opts).unwrap_err();
        assert!(err.to_string().contains("frame rate (24)"));
    }

    #[test]
    fn compute_accepts_frames_just_below_framerate() {
        let opts = options(Some("00:00:00:23"), 24);
        assert!(compute(local_time(0, 0, 0, 0), &opts).is_ok());
    }

    #[test]
    fn compute_rejects_zero_framerate() {
        let opts = options(None, 0);
        let err = compute(local_time(0, 0, 0, 0), &opts).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn derives_frames_from_milliseconds() {
        let tc = Timecode::from_wall_clock(local_time(13, 14, 15, 750), 24);
        assert_eq!(tc.to_string(), "13:14:15:18");

        let tc = Timecode::from_wall_clock(local_time(13, 14, 15, 750), 30);
        assert_eq!(tc.frames, 22);
    }

    #[test]
    fn derived_frames_stay_below_framerate() {
        for ms in (0..1000).step_by(37) {
            for framerate in [1, 24, 25, 30, 60] {
                let tc = Timecode::from_wall_clock(local_time(8, 0, 0, ms), framerate);
                assert!(
                    tc.frames < framerate,
                    "frames {} not below framerate {framerate} for ms {ms}",
                    tc.frames
                );
            }
        }
    }

    #[test]
    fn derives_zero_frames_at_second_boundary() {
        let tc = Timecode::from_wall_clock(local_time(23, 59, 59, 0), 24);
        assert_eq!(tc.to_string(), "23:59:59:00");
    }

    #[test]
    fn compute_derives_when_no_start() {
        let opts = options(None, 24);
        let tc = compute(local_time(9, 5, 3, 999), &opts).unwrap();
        assert_eq!(tc.hours, 9);
        assert_eq!(tc.minutes, 5);
        assert_eq!(tc.seconds, 3);
        assert_eq!(tc.frames, 23);
    }

    #[test]
    fn formats_created_time_with_millis() {
        assert_eq!(format_created(local_time(9, 5, 3, 7)), "09:05:03.007");
        assert_eq!(format_created(local_time(23, 59, 59, 999)), "23:59:59.999");
    }

    #[test]
    fn serializes_in_display_form() {
        let tc = Timecode::parse("01:02:03:04").unwrap();
        assert_eq!(serde_json::to_string(&tc).unwrap(), "\"01:02:03:04\"");
    }
}
