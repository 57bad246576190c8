//! Shared helpers for playback integration tests

#![allow(dead_code)]

use encore_playback::{
    AudioDevice, DeviceCommand, DeviceError, DeviceEvent, LoadGeneration, PlaybackConfig,
    PlaybackEngine, Track,
};

/// Device that records every call and never reports anything on its own
///
/// Tests feed notifications explicitly through `handle_device_event`.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<DeviceCommand>,
    pub reject_loads: bool,
}

impl RecordingDevice {
    /// Generation of the most recent load call
    pub fn last_generation(&self) -> Option<LoadGeneration> {
        self.calls.iter().rev().find_map(|call| match call {
            DeviceCommand::Load { generation, .. } => Some(*generation),
            _ => None,
        })
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCommand::Load { track, .. } => Some(track.id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl AudioDevice for RecordingDevice {
    fn load_source(&mut self, track: &Track, generation: LoadGeneration) -> Result<(), DeviceError> {
        if self.reject_loads {
            return Err(DeviceError::Load(format!("{}: unsupported format", track.id)));
        }
        self.calls.push(DeviceCommand::Load {
            track: track.clone(),
            generation,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.calls.push(DeviceCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DeviceError> {
        self.calls.push(DeviceCommand::Pause);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.calls.push(DeviceCommand::Stop);
        Ok(())
    }

    fn seek(&mut self, position_ms: f64) -> Result<(), DeviceError> {
        self.calls.push(DeviceCommand::Seek(position_ms));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), DeviceError> {
        self.calls.push(DeviceCommand::SetVolume(volume));
        Ok(())
    }
}

pub fn track(id: &str, duration_ms: u64) -> Track {
    Track::new(id, duration_ms).with_metadata(format!("Title {id}"), "Test Artist")
}

pub fn engine() -> PlaybackEngine<RecordingDevice> {
    PlaybackEngine::with_seed(RecordingDevice::default(), PlaybackConfig::default(), 7)
}

/// Confirm the current load the way a device would
pub fn confirm_load(engine: &mut PlaybackEngine<RecordingDevice>) {
    let generation = engine.state().generation();
    engine.handle_device_event(DeviceEvent::Loaded { generation });
}

pub fn end_current(engine: &mut PlaybackEngine<RecordingDevice>) {
    let generation = engine.state().generation();
    engine.handle_device_event(DeviceEvent::Ended { generation });
}
