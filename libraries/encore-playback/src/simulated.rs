//! Timer-driven audio device
//!
//! Produces no sound. Position advances only when the owner calls
//! [`SimulatedDevice::tick`], which makes it suitable both for a terminal
//! front end on an interval timer and for deterministic tests.

use crate::device::{AudioDevice, DeviceEvent};
use crate::error::DeviceError;
use crate::types::{LoadGeneration, Track};
use std::collections::HashSet;
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone)]
struct LoadedSource {
    track_id: String,
    duration_ms: f64,
    generation: LoadGeneration,
}

/// [`AudioDevice`] backed by a manual clock
#[derive(Debug, Default)]
pub struct SimulatedDevice {
    source: Option<LoadedSource>,
    playing: bool,
    position_ms: f64,
    volume: f64,
    failing: HashSet<String>,
    notifications: Vec<DeviceEvent>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Make every load of `track_id` fail with an error notification
    pub fn fail_on_load(&mut self, track_id: impl Into<String>) {
        self.failing.insert(track_id.into());
    }

    /// Advance the clock by `elapsed`
    ///
    /// While playing, reports the new position and, on reaching the end of
    /// the source, reports `Ended` and stops.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        let Some(source) = &self.source else {
            return;
        };

        let generation = source.generation;
        let duration_ms = source.duration_ms;
        self.position_ms = (self.position_ms + elapsed.as_secs_f64() * 1000.0).min(duration_ms);

        self.notifications.push(DeviceEvent::Position {
            generation,
            position_ms: self.position_ms,
        });

        if self.position_ms >= duration_ms {
            trace!(%generation, "Simulated source ended");
            self.playing = false;
            self.notifications.push(DeviceEvent::Ended { generation });
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position_ms(&self) -> f64 {
        self.position_ms
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Id of the loaded source, if any
    pub fn loaded_track_id(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.track_id.as_str())
    }

    pub fn has_pending_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }
}

impl AudioDevice for SimulatedDevice {
    fn load_source(&mut self, track: &Track, generation: LoadGeneration) -> Result<(), DeviceError> {
        self.playing = false;
        self.position_ms = 0.0;

        if self.failing.contains(&track.id) {
            self.source = None;
            self.notifications.push(DeviceEvent::Error {
                generation,
                reason: format!("could not load source for '{}'", track.id),
            });
            return Ok(());
        }

        let duration_ms = track.duration_ms as f64;
        self.source = Some(LoadedSource {
            track_id: track.id.clone(),
            duration_ms,
            generation,
        });
        self.notifications.push(DeviceEvent::Loaded { generation });
        self.notifications.push(DeviceEvent::Duration {
            generation,
            duration_ms,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        // Without a source this stays silent until the next load
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        self.playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.source = None;
        self.playing = false;
        self.position_ms = 0.0;
        Ok(())
    }

    fn seek(&mut self, position_ms: f64) -> Result<(), DeviceError> {
        let Some(source) = &self.source else {
            return Err(DeviceError::Rejected("seek without a loaded source".to_string()));
        };
        self.position_ms = position_ms.clamp(0.0, source.duration_ms);
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), DeviceError> {
        self.volume = volume;
        Ok(())
    }

    fn drain_notifications(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(duration_ms: u64) -> SimulatedDevice {
        let mut device = SimulatedDevice::new();
        device
            .load_source(&Track::new("a", duration_ms), LoadGeneration::new(1))
            .unwrap();
        device.drain_notifications();
        device
    }

    #[test]
    fn load_reports_loaded_and_duration() {
        let mut device = SimulatedDevice::new();
        let gen = LoadGeneration::new(3);
        device.load_source(&Track::new("a", 4000), gen).unwrap();

        assert_eq!(
            device.drain_notifications(),
            vec![
                DeviceEvent::Loaded { generation: gen },
                DeviceEvent::Duration {
                    generation: gen,
                    duration_ms: 4000.0
                },
            ]
        );
        assert_eq!(device.loaded_track_id(), Some("a"));
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut device = loaded(4000);
        device.tick(Duration::from_secs(1));
        assert_eq!(device.position_ms(), 0.0);
        assert!(!device.has_pending_notifications());
    }

    #[test]
    fn tick_reports_position_then_end() {
        let mut device = loaded(1500);
        device.play().unwrap();

        device.tick(Duration::from_secs(1));
        assert_eq!(device.position_ms(), 1000.0);

        device.tick(Duration::from_secs(1));
        let events = device.drain_notifications();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            DeviceEvent::Position {
                generation: LoadGeneration::new(1),
                position_ms: 1500.0
            }
        );
        assert_eq!(
            events[2],
            DeviceEvent::Ended {
                generation: LoadGeneration::new(1)
            }
        );
        assert!(!device.is_playing());
    }

    #[test]
    fn failing_load_reports_error() {
        let mut device = SimulatedDevice::new();
        device.fail_on_load("broken");
        device
            .load_source(&Track::new("broken", 1000), LoadGeneration::new(2))
            .unwrap();

        let events = device.drain_notifications();
        assert!(matches!(events.as_slice(), [DeviceEvent::Error { .. }]));
        assert_eq!(device.loaded_track_id(), None);
    }

    #[test]
    fn seek_clamps_and_requires_source() {
        let mut device = loaded(3000);
        device.seek(9000.0).unwrap();
        assert_eq!(device.position_ms(), 3000.0);

        device.stop().unwrap();
        assert!(device.seek(0.0).is_err());
    }
}
