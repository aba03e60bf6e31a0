//! Match video recording through the simulator's movie facility.

use crate::error::{RefereeError, RefereeResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoResolution {
    P480,
    P720,
    P1080,
}

impl VideoResolution {
    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::P480 => (720, 480),
            Self::P720 => (1280, 720),
            Self::P1080 => (1920, 1080),
        }
    }
}

impl FromStr for VideoResolution {
    type Err = RefereeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "480p" => Ok(Self::P480),
            "720p" => Ok(Self::P720),
            "1080p" => Ok(Self::P1080),
            _ => Err(RefereeError::InvalidResolution(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    Mp4,
    X3d,
}

impl RecordingFormat {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::X3d => "html",
        }
    }
}

impl fmt::Display for RecordingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mp4 => "mp4",
            Self::X3d => "x3d",
        })
    }
}

/// The simulator side of recording.
pub trait MovieRecorder {
    fn movie_start_recording(&mut self, path: &Path, width: u32, height: u32) -> RefereeResult<()>;

    fn movie_stop_recording(&mut self) -> RefereeResult<()>;
}

pub struct VideoRecordAssistant {
    resolution: VideoResolution,
    format: RecordingFormat,
    output_dir: PathBuf,
    recording: Option<PathBuf>,
}

impl VideoRecordAssistant {
    pub fn new(resolution: &str, format: RecordingFormat, output_dir: impl Into<PathBuf>) -> RefereeResult<Self> {
        Ok(Self {
            resolution: resolution.parse()?,
            format,
            output_dir: output_dir.into(),
            recording: None,
        })
    }

    pub fn resolution(&self) -> VideoResolution {
        self.resolution
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// File name for a recording of the given match half.
    pub fn create_title(&self, match_id: u32, half_id: u32, blue: &str, yellow: &str) -> String {
        format!(
            "match-{match_id}-half-{half_id}-{}-vs-{}.{}",
            slug(blue),
            slug(yellow),
            self.format.file_suffix()
        )
    }

    pub fn start_recording(&mut self, recorder: &mut impl MovieRecorder, title: &str) -> RefereeResult<PathBuf> {
        let (width, height) = self.resolution.dimensions();
        let path = self.output_dir.join(title);
        recorder.movie_start_recording(&path, width, height)?;
        log::info!("recording {} to {}", self.format, path.display());
        self.recording = Some(path.clone());
        Ok(path)
    }

    /// Returns the finished file, or `None` when nothing was recording.
    pub fn stop_recording(&mut self, recorder: &mut impl MovieRecorder) -> RefereeResult<Option<PathBuf>> {
        let Some(path) = self.recording.take() else {
            return Ok(None);
        };
        recorder.movie_stop_recording()?;
        Ok(Some(path))
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
