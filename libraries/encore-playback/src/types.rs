//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A playable catalog item
///
/// The engine only looks at `id` and `duration_ms`; everything else is
/// display metadata carried through to the UI untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier from the catalog
    pub id: String,

    /// Total playable length in milliseconds
    pub duration_ms: u64,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Cover art reference (optional)
    #[serde(default)]
    pub cover: Option<String>,
}

impl Track {
    /// Create a track with only the fields the engine needs
    pub fn new(id: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            duration_ms,
            title: String::new(),
            artist: String::new(),
            album: None,
            cover: None,
        }
    }

    /// Attach display metadata
    #[must_use]
    pub fn with_metadata(mut self, title: impl Into<String>, artist: impl Into<String>) -> Self {
        self.title = title.into();
        self.artist = artist.into();
        self
    }

    /// A track is playable when its id is non-blank
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last queue entry
    #[default]
    Off,

    /// Loop the current track
    Track,

    /// Loop the whole queue
    Context,
}

impl RepeatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::Track => "track",
            RepeatMode::Context => "context",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(RepeatMode::Off),
            "track" | "one" => Ok(RepeatMode::Track),
            "context" | "all" => Ok(RepeatMode::Context),
            other => Err(format!("unknown repeat mode: {other}")),
        }
    }
}

/// Per-track transport state
///
/// ```text
/// Idle ──play──▶ Loading ──loaded──▶ Playing ⇄ Paused
///                   ▲                    │
///                   └──── next entry ◀── Ended ──(exhausted)──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// Nothing playing or loading
    #[default]
    Idle,

    /// Source requested, waiting for the device to confirm
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Current track reached its end
    Ended,
}

/// Token identifying one source load
///
/// Bumped on every track switch. Device notifications carry the token
/// they were produced for, so reports from an abandoned load can be told
/// apart from reports about the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The token for the next load
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.5)
    pub volume: f64,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Arrow-key seek step in milliseconds (default: 5000)
    pub seek_step_ms: u64,

    /// Arrow-key volume step (default: 0.1)
    pub volume_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            repeat: RepeatMode::Off,
            shuffle: false,
            seek_step_ms: 5000,
            volume_step: 0.1,
        }
    }
}
