//! Playback engine - core orchestration
//!
//! Owns the [`PlaybackState`], the [`AudioDevice`] and the pending UI
//! events. Every command and device notification goes through
//! [`reduce`]; the engine then carries out the returned device calls and
//! buffers the returned events.

use crate::{
    device::{AudioDevice, DeviceCommand, DeviceEvent},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    keyboard::{shortcut_for, InputFocus, Key, Shortcut},
    shuffle,
    snapshot::PlaybackSnapshot,
    state::{reduce, Action, Effects, PlaybackState},
    types::{PlaybackConfig, RepeatMode, Track},
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

/// Session-scoped playback engine
///
/// One instance per player session, handed to whoever drives it. Nothing
/// here is global, so independent engines can coexist (tests do this).
pub struct PlaybackEngine<D: AudioDevice> {
    state: PlaybackState,
    device: D,
    config: PlaybackConfig,

    // Shuffle picks on automatic advance
    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<D: AudioDevice> PlaybackEngine<D> {
    /// Create an engine driving `device`
    pub fn new(device: D, config: PlaybackConfig) -> Self {
        Self::with_rng(device, config, StdRng::from_entropy())
    }

    /// Create an engine with a deterministic shuffle order
    pub fn with_seed(device: D, config: PlaybackConfig, seed: u64) -> Self {
        Self::with_rng(device, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut device: D, config: PlaybackConfig, rng: StdRng) -> Self {
        let state = PlaybackState::new(&config);

        // Device starts at its own default level
        if let Err(err) = device.set_volume(state.volume()) {
            error!(%err, "Failed to apply initial volume");
        }

        Self {
            state,
            device,
            config,
            rng,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Load and start `track`
    ///
    /// The queue cursor moves to the track's first position in the queue;
    /// a track not in the queue plays detached and leaves the cursor alone.
    pub fn play(&mut self, track: Track) -> Result<()> {
        self.dispatch(Action::Play(track))
    }

    /// Pause playback (no-op when already paused)
    pub fn pause(&mut self) {
        self.submit(Action::Pause);
    }

    /// Flip between playing and paused
    pub fn toggle(&mut self) {
        self.submit(Action::Toggle);
    }

    /// Skip to the next queue entry, wrapping to the first
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.submit(Action::Next);
    }

    /// Go back one queue entry, wrapping to the last
    pub fn prev(&mut self) {
        self.submit(Action::Prev);
    }

    // ===== Seek =====

    /// Jump to `position_ms`, clamped to the current track
    ///
    /// Rejected without a loaded track; the state is left as it was.
    pub fn seek(&mut self, position_ms: f64) -> Result<()> {
        self.dispatch(Action::Seek(position_ms))
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_ms: f64) -> Result<()> {
        self.seek(self.state.current_time_ms() + delta_ms)
    }

    /// Seek to a fraction of the track (progress bar click, 0-100)
    pub fn seek_to_percent(&mut self, percent: f64) -> Result<()> {
        if percent.is_nan() {
            return Err(PlaybackError::InvalidSeekPosition(percent));
        }
        let target = percent.clamp(0.0, 100.0) / 100.0 * self.state.duration_ms();
        self.seek(target)
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0, clamped)
    pub fn set_volume(&mut self, level: f64) -> Result<()> {
        self.dispatch(Action::SetVolume(level))
    }

    /// Shift volume by `delta`, clamped
    pub fn step_volume(&mut self, delta: f64) {
        let level = Volume::new(self.state.volume()).stepped(delta).level();
        self.submit(Action::SetVolume(level));
    }

    // ===== Queue Management =====

    /// Append tracks without interrupting playback
    pub fn add_to_queue(&mut self, tracks: Vec<Track>) {
        self.submit(Action::AddToQueue(tracks));
    }

    /// Replace the queue and start playing its first entry
    pub fn play_queue(&mut self, tracks: Vec<Track>) {
        self.submit(Action::PlayQueue(tracks));
    }

    /// Empty the queue, unload the current track and stop the device
    pub fn clear_queue(&mut self) {
        self.submit(Action::ClearQueue);
    }

    // ===== Shuffle & Repeat =====

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.submit(Action::SetRepeat(mode));
    }

    /// Enable or disable shuffle for automatic advance
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.submit(Action::SetShuffle(enabled));
    }

    // ===== Device Notifications =====

    /// Apply one notification from the device
    ///
    /// Notifications for a load that has since been superseded are dropped.
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        let shuffle_pick = match event {
            DeviceEvent::Ended { .. } if self.state.shuffle() => shuffle::pick_next(
                self.state.queue().len(),
                self.state.queue_index(),
                &mut self.rng,
            ),
            _ => None,
        };

        self.submit(Action::from_device(event, shuffle_pick));
    }

    /// Pull buffered notifications from the device and apply them in order
    ///
    /// Returns how many notifications were processed.
    pub fn pump_device(&mut self) -> usize {
        let notifications = self.device.drain_notifications();
        let count = notifications.len();
        for event in notifications {
            self.handle_device_event(event);
        }
        count
    }

    // ===== Keyboard =====

    /// Apply the shortcut bound to `key`, if any
    ///
    /// Returns the shortcut that fired. Seeking without a track is ignored.
    pub fn handle_key(&mut self, key: &Key, focus: InputFocus) -> Option<Shortcut> {
        let shortcut = shortcut_for(key, focus)?;
        let seek_step = self.config.seek_step_ms as f64;

        match shortcut {
            Shortcut::TogglePlayback => self.toggle(),
            Shortcut::SeekBackward => {
                if let Err(err) = self.seek_by(-seek_step) {
                    debug!(%err, "Seek shortcut ignored");
                }
            }
            Shortcut::SeekForward => {
                if let Err(err) = self.seek_by(seek_step) {
                    debug!(%err, "Seek shortcut ignored");
                }
            }
            Shortcut::VolumeUp => self.step_volume(self.config.volume_step),
            Shortcut::VolumeDown => self.step_volume(-self.config.volume_step),
        }

        Some(shortcut)
    }

    // ===== State Queries =====

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Owned, display-ready copy of the current state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::from(&self.state)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ===== Events =====

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Private Helpers =====

    fn dispatch(&mut self, action: Action) -> Result<()> {
        let effects = reduce(&mut self.state, action)?;
        self.execute(effects);
        Ok(())
    }

    /// Dispatch an action whose rejection is not the caller's concern
    fn submit(&mut self, action: Action) {
        if let Err(err) = self.dispatch(action) {
            debug!(%err, "Command rejected");
        }
    }

    /// Publish events, then issue device calls in order
    ///
    /// A rejected load or play aborts the rest and fails the current load,
    /// the same way an asynchronous device error would. Any other rejected
    /// call is logged and the remaining commands still go out.
    fn execute(&mut self, effects: Effects) {
        self.pending_events.extend(effects.events);

        for command in effects.commands {
            if let Err(err) = command.apply(&mut self.device) {
                if !matches!(command, DeviceCommand::Load { .. } | DeviceCommand::Play) {
                    warn!(?command, %err, "Device rejected command");
                    continue;
                }
                error!(?command, %err, "Device rejected command");
                let failure = Action::DeviceFailed {
                    generation: self.state.generation(),
                    reason: err.to_string(),
                };
                match reduce(&mut self.state, failure) {
                    Ok(effects) => self.pending_events.extend(effects.events),
                    Err(err) => error!(%err, "Failed to record device failure"),
                }
                break;
            }
        }
    }
}
