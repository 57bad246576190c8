//! Encore - Playback Engine
//!
//! Platform-agnostic playback state machine and queue engine for Encore.
//!
//! This crate provides:
//! - A single playback state aggregate with a pure transition function
//! - A play queue with wraparound navigation
//! - Repeat modes (Off, Track, Context) and shuffle on automatic advance
//! - Load generations, so late device reports for abandoned tracks are ignored
//! - Keyboard shortcut mapping and `m:ss` time formatting
//! - A timer-driven simulated device
//!
//! # Architecture
//!
//! `encore-playback` never produces sound and never blocks:
//! - No dependency on an audio backend
//! - No async runtime
//! - No file or network I/O
//!
//! Audio output is provided through the [`AudioDevice`] trait. The engine
//! issues commands to it and consumes the notifications it reports back.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use encore_playback::{PlaybackConfig, PlaybackEngine, SimulatedDevice, Track};
//! use std::time::Duration;
//!
//! let mut engine = PlaybackEngine::new(SimulatedDevice::new(), PlaybackConfig::default());
//!
//! engine.play_queue(vec![
//!     Track::new("blinding-lights", 200_000).with_metadata("Blinding Lights", "The Weeknd"),
//!     Track::new("levitating", 203_000).with_metadata("Levitating", "Dua Lipa"),
//! ]);
//! engine.pump_device();
//!
//! engine.device_mut().tick(Duration::from_secs(1));
//! engine.pump_device();
//!
//! let snapshot = engine.snapshot();
//! assert!(snapshot.is_playing);
//! assert_eq!(snapshot.elapsed_label, "0:01");
//! ```
//!
//! # Example: Repeat and Shuffle
//!
//! ```rust
//! use encore_playback::{PlaybackConfig, PlaybackEngine, RepeatMode, SimulatedDevice};
//!
//! let mut engine = PlaybackEngine::new(SimulatedDevice::new(), PlaybackConfig::default());
//! engine.set_repeat(RepeatMode::Context);
//! engine.set_shuffle(true);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use encore_playback::{AudioDevice, DeviceError, LoadGeneration, Track};
//!
//! struct MediaElement {
//!     // ... handle to the platform player
//! }
//!
//! impl AudioDevice for MediaElement {
//!     fn load_source(&mut self, track: &Track, generation: LoadGeneration) -> Result<(), DeviceError> {
//!         // Start fetching; report Loaded/Duration/Error tagged with `generation`
//!         Ok(())
//!     }
//!
//!     fn play(&mut self) -> Result<(), DeviceError> { Ok(()) }
//!     fn pause(&mut self) -> Result<(), DeviceError> { Ok(()) }
//!     fn stop(&mut self) -> Result<(), DeviceError> { Ok(()) }
//!     fn seek(&mut self, _position_ms: f64) -> Result<(), DeviceError> { Ok(()) }
//!     fn set_volume(&mut self, _volume: f64) -> Result<(), DeviceError> { Ok(()) }
//! }
//! ```

mod device;
mod engine;
mod error;
pub mod events;
pub mod format;
pub mod keyboard;
mod queue;
mod shuffle;
mod simulated;
mod snapshot;
mod state;
pub mod types;
mod volume;

// Public exports
pub use device::{AudioDevice, DeviceCommand, DeviceEvent};
pub use engine::PlaybackEngine;
pub use error::{DeviceError, PlaybackError, Result};
pub use events::PlaybackEvent;
pub use keyboard::{InputFocus, Key, Shortcut};
pub use queue::Queue;
pub use simulated::SimulatedDevice;
pub use snapshot::PlaybackSnapshot;
pub use state::{reduce, Action, Effects, PlaybackState};
pub use types::{LoadGeneration, PlaybackConfig, RepeatMode, Track, TransportState};
pub use volume::Volume;
