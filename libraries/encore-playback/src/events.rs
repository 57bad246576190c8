//! Playback Events
//!
//! One-shot notifications for UI synchronization. The engine buffers them
//! as transitions happen; the UI drains the buffer and re-renders.

use crate::types::{RepeatMode, TransportState};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport node or the playing flag changed
    StateChanged {
        /// The new transport state
        state: TransportState,
        /// Whether playback is logically active
        is_playing: bool,
    },

    /// A different track became current (or none)
    TrackChanged {
        /// ID of the new (current) track, `None` when cleared
        track_id: Option<String>,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position moved (device report or seek)
    PositionChanged {
        /// Current playback position
        position_ms: f64,
        /// Total track duration as currently known
        duration_ms: f64,
    },

    /// Device reported the authoritative duration
    DurationChanged {
        duration_ms: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f64,
    },

    /// Queue contents or cursor changed
    QueueChanged {
        /// New queue length
        length: usize,
        /// Cursor position
        index: usize,
    },

    RepeatChanged {
        mode: RepeatMode,
    },

    ShuffleChanged {
        enabled: bool,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Device failed; playback was stopped
    Error {
        /// Error message
        message: String,
    },
}
