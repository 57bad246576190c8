//! Read-only view of the playback state for rendering

use crate::format::{format_time, progress_percent};
use crate::state::PlaybackState;
use crate::types::{RepeatMode, Track, TransportState};
use serde::{Deserialize, Serialize};

/// Owned copy of the playback state plus display-ready labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub current_time_ms: f64,
    pub duration_ms: f64,
    pub volume: f64,
    pub queue: Vec<Track>,
    pub queue_index: usize,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub transport: TransportState,
    pub last_error: Option<String>,

    /// Position as `m:ss`
    pub elapsed_label: String,
    /// Duration as `m:ss`
    pub duration_label: String,
    /// Progress bar fill, 0-100
    pub progress_percent: f64,
}

impl PlaybackSnapshot {
    /// Whether queue entry `index` is the one playing
    pub fn is_highlighted(&self, index: usize) -> bool {
        match (&self.current_track, self.queue.get(index)) {
            (Some(current), Some(entry)) => index == self.queue_index && entry.id == current.id,
            _ => false,
        }
    }
}

impl From<&PlaybackState> for PlaybackSnapshot {
    fn from(state: &PlaybackState) -> Self {
        Self {
            current_track: state.current_track().cloned(),
            is_playing: state.is_playing(),
            current_time_ms: state.current_time_ms(),
            duration_ms: state.duration_ms(),
            volume: state.volume(),
            queue: state.queue().to_vec(),
            queue_index: state.queue_index(),
            repeat: state.repeat(),
            shuffle: state.shuffle(),
            transport: state.transport(),
            last_error: state.last_error().map(str::to_string),
            elapsed_label: format_time(state.current_time_ms()),
            duration_label: format_time(state.duration_ms()),
            progress_percent: progress_percent(state.current_time_ms(), state.duration_ms()),
        }
    }
}
