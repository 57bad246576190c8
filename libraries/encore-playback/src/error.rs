//! Error types for playback management

use thiserror::Error;

/// Rejected engine commands
///
/// These never leave the engine in a partial state: a command that fails
/// validation is dropped before any field changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Track record failed validation (empty id)
    #[error("Invalid track: {0:?}")]
    InvalidTrack(String),

    /// Seek target is not a finite number
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),

    /// Volume is not a finite number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),
}

/// Failures reported by an [`AudioDevice`](crate::AudioDevice)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Source could not be fetched or decoded
    #[error("Failed to load source: {0}")]
    Load(String),

    /// Device refused to start playback
    #[error("Playback rejected: {0}")]
    Rejected(String),

    /// Any other transport failure
    #[error("Device error: {0}")]
    Other(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
