//! Audio device abstraction
//!
//! The engine never produces sound itself. It drives an [`AudioDevice`]
//! (a media element, a native output, a simulation) and reacts to the
//! notifications the device reports back.

use crate::error::DeviceError;
use crate::types::{LoadGeneration, Track};
use serde::{Deserialize, Serialize};

/// Transport control for whatever actually outputs audio
///
/// Calls are fire-and-forget from the engine's point of view: loading and
/// starting are allowed to complete later and report through
/// [`DeviceEvent`]s. Returning `Err` means the device rejected the request
/// outright. A rejected load or play is treated exactly like an asynchronous
/// [`DeviceEvent::Error`]; other rejections are only logged.
pub trait AudioDevice {
    /// Point the device at a new source
    ///
    /// Every notification about this source must carry `generation`.
    fn load_source(&mut self, track: &Track, generation: LoadGeneration) -> Result<(), DeviceError>;

    /// Start or resume output
    fn play(&mut self) -> Result<(), DeviceError>;

    /// Pause output, keeping position
    fn pause(&mut self) -> Result<(), DeviceError>;

    /// Stop output and release the source
    fn stop(&mut self) -> Result<(), DeviceError>;

    /// Jump to a position in the current source
    fn seek(&mut self, position_ms: f64) -> Result<(), DeviceError>;

    /// Set output level (0.0-1.0)
    fn set_volume(&mut self, volume: f64) -> Result<(), DeviceError>;

    /// Hand over buffered notifications, oldest first
    ///
    /// Push-style adapters that call
    /// [`PlaybackEngine::handle_device_event`](crate::PlaybackEngine::handle_device_event)
    /// directly can keep the default.
    fn drain_notifications(&mut self) -> Vec<DeviceEvent> {
        Vec::new()
    }
}

/// Notifications a device reports to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Source is ready and output has (re)started from the top
    Loaded { generation: LoadGeneration },

    /// Periodic position report
    Position {
        generation: LoadGeneration,
        position_ms: f64,
    },

    /// Duration became known or changed
    Duration {
        generation: LoadGeneration,
        duration_ms: f64,
    },

    /// Source played to its end
    Ended { generation: LoadGeneration },

    /// Load or playback failed
    Error {
        generation: LoadGeneration,
        reason: String,
    },
}

impl DeviceEvent {
    /// Load this notification belongs to
    pub fn generation(&self) -> LoadGeneration {
        match self {
            DeviceEvent::Loaded { generation }
            | DeviceEvent::Position { generation, .. }
            | DeviceEvent::Duration { generation, .. }
            | DeviceEvent::Ended { generation }
            | DeviceEvent::Error { generation, .. } => *generation,
        }
    }
}

/// A device call the reducer asks the engine to make
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Load {
        track: Track,
        generation: LoadGeneration,
    },
    Play,
    Pause,
    Stop,
    Seek(f64),
    SetVolume(f64),
}

impl DeviceCommand {
    /// Issue this command against a device
    pub fn apply<D: AudioDevice + ?Sized>(&self, device: &mut D) -> Result<(), DeviceError> {
        match self {
            DeviceCommand::Load { track, generation } => device.load_source(track, *generation),
            DeviceCommand::Play => device.play(),
            DeviceCommand::Pause => device.pause(),
            DeviceCommand::Stop => device.stop(),
            DeviceCommand::Seek(position_ms) => device.seek(*position_ms),
            DeviceCommand::SetVolume(volume) => device.set_volume(*volume),
        }
    }
}
