//! Playback state and its transition function
//!
//! [`PlaybackState`] is only ever changed by [`reduce`]. The reducer does no
//! I/O: it describes the device calls to make and the UI events to publish
//! in the returned [`Effects`], and the engine carries them out.

use crate::device::{DeviceCommand, DeviceEvent};
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::queue::Queue;
use crate::types::{LoadGeneration, PlaybackConfig, RepeatMode, Track, TransportState};
use crate::volume::Volume;
use tracing::{debug, info, warn};

/// Everything the player knows about the current session
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    current_track: Option<Track>,
    is_playing: bool,
    current_time_ms: f64,
    duration_ms: f64,
    volume: Volume,
    queue: Queue,
    repeat: RepeatMode,
    shuffle: bool,
    transport: TransportState,
    generation: LoadGeneration,
    last_error: Option<String>,

    // A seek was accepted while the source was still loading
    seeked_while_loading: bool,
}

impl PlaybackState {
    /// Fresh session state with the configured initial settings
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            current_time_ms: 0.0,
            duration_ms: 0.0,
            volume: Volume::new(config.volume),
            queue: Queue::new(),
            repeat: config.repeat,
            shuffle: config.shuffle,
            transport: TransportState::Idle,
            generation: LoadGeneration::default(),
            last_error: None,
            seeked_while_loading: false,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether playback is logically active (the device may lag behind)
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time_ms(&self) -> f64 {
        self.current_time_ms
    }

    /// Duration of the current track; the catalog value until the device reports
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn queue_index(&self) -> usize {
        self.queue.index()
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    /// Token of the most recent load
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Reason for the last device failure, cleared by the next load
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when the current track is playing from outside the queue
    pub fn is_detached(&self) -> bool {
        self.current_track
            .as_ref()
            .is_some_and(|t| !self.queue.is_current(&t.id))
    }

    fn is_stale(&self, generation: LoadGeneration) -> bool {
        generation != self.generation || self.current_track.is_none()
    }

    fn state_changed(&self) -> PlaybackEvent {
        PlaybackEvent::StateChanged {
            state: self.transport,
            is_playing: self.is_playing,
        }
    }

    fn queue_changed(&self) -> PlaybackEvent {
        PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            index: self.queue.index(),
        }
    }

    fn position_changed(&self) -> PlaybackEvent {
        PlaybackEvent::PositionChanged {
            position_ms: self.current_time_ms,
            duration_ms: self.duration_ms,
        }
    }

    /// Switch to `track` and ask the device to load and start it
    ///
    /// `reset_position` is false for an explicit `play`, which keeps showing
    /// the old position until the device confirms the new source.
    fn load_track(&mut self, track: Track, reset_position: bool, fx: &mut Effects) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());

        self.generation = self.generation.next();
        self.duration_ms = track.duration_ms as f64;
        self.current_time_ms = if reset_position {
            0.0
        } else {
            self.current_time_ms.min(self.duration_ms)
        };
        self.is_playing = true;
        self.transport = TransportState::Loading;
        self.last_error = None;
        self.seeked_while_loading = false;

        info!(track_id = %track.id, generation = %self.generation, "Loading track");

        fx.emit(PlaybackEvent::TrackChanged {
            track_id: Some(track.id.clone()),
            previous_track_id,
        });
        fx.command(DeviceCommand::Load {
            track: track.clone(),
            generation: self.generation,
        });
        fx.command(DeviceCommand::Play);

        self.current_track = Some(track);
        fx.emit(self.state_changed());
    }

    /// Drop the current track and stop the device
    fn unload(&mut self, fx: &mut Effects) {
        let previous = self.current_track.take();

        self.generation = self.generation.next();
        self.is_playing = false;
        self.transport = TransportState::Idle;
        self.current_time_ms = 0.0;
        self.duration_ms = 0.0;
        self.seeked_while_loading = false;

        fx.command(DeviceCommand::Stop);
        if let Some(previous) = previous {
            fx.emit(PlaybackEvent::TrackChanged {
                track_id: None,
                previous_track_id: Some(previous.id),
            });
        }
        fx.emit(self.state_changed());
    }

    /// `next`/`prev`: wrap around the queue, or unload when it is empty
    fn step(&mut self, forward: bool, fx: &mut Effects) {
        let track = if forward {
            self.queue.advance()
        } else {
            self.queue.retreat()
        }
        .cloned();

        match track {
            Some(track) => {
                self.load_track(track, true, fx);
                fx.emit(self.queue_changed());
            }
            None if self.current_track.is_none() && !self.is_playing => {
                debug!("Skip on empty queue with nothing loaded");
            }
            None => self.unload(fx),
        }
    }

    fn pause(&mut self, fx: &mut Effects) {
        if !self.is_playing {
            debug!("Already paused");
            return;
        }

        self.is_playing = false;
        if self.transport == TransportState::Playing {
            self.transport = TransportState::Paused;
        }
        if self.current_track.is_some() {
            fx.command(DeviceCommand::Pause);
        }
        fx.emit(self.state_changed());
    }

    fn resume(&mut self, fx: &mut Effects) {
        match (self.current_track.clone(), self.transport) {
            (Some(track), TransportState::Idle | TransportState::Ended) => {
                // Source is gone (finished or failed); start it over
                self.load_track(track, true, fx);
            }
            (Some(_), TransportState::Paused) => {
                self.is_playing = true;
                self.transport = TransportState::Playing;
                fx.command(DeviceCommand::Play);
                fx.emit(self.state_changed());
            }
            (Some(_), TransportState::Loading | TransportState::Playing) => {
                self.is_playing = true;
                fx.command(DeviceCommand::Play);
                fx.emit(self.state_changed());
            }
            (None, _) => {
                self.is_playing = true;
                fx.emit(self.state_changed());
            }
        }
    }

    /// Point the cursor at the detached current track once it shows up in the queue
    fn reattach(&mut self) {
        let Some(id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
            return;
        };
        if self.queue.is_current(&id) {
            return;
        }
        if let Some(position) = self.queue.position_of(&id) {
            self.queue.select(position);
        }
    }

    fn track_ended(&mut self, shuffle_pick: Option<usize>, fx: &mut Effects) {
        let Some(track) = self.current_track.clone() else {
            return;
        };

        fx.emit(PlaybackEvent::TrackFinished {
            track_id: track.id.clone(),
        });
        self.transport = TransportState::Ended;
        fx.emit(self.state_changed());

        if self.repeat == RepeatMode::Track {
            self.current_time_ms = 0.0;
            self.is_playing = true;
            self.transport = TransportState::Playing;
            fx.command(DeviceCommand::Seek(0.0));
            fx.command(DeviceCommand::Play);
            fx.emit(self.state_changed());
            fx.emit(self.position_changed());
            return;
        }

        if self.shuffle {
            let pick = shuffle_pick.filter(|&i| i < self.queue.len());
            if let Some(next) = pick.and_then(|i| self.queue.select(i)).cloned() {
                self.load_track(next, true, fx);
                fx.emit(self.queue_changed());
                return;
            }
        }

        let attached = self.queue.is_current(&track.id);
        if attached && self.queue.is_last() && self.repeat == RepeatMode::Off {
            info!(track_id = %track.id, "Reached end of queue");
            self.is_playing = false;
            self.transport = TransportState::Idle;
            self.current_time_ms = self.duration_ms;
            fx.emit(self.state_changed());
            return;
        }

        self.step(true, fx);
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

/// Every input the state machine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ===== Commands =====
    Play(Track),
    Pause,
    Toggle,
    Next,
    Prev,
    Seek(f64),
    SetVolume(f64),
    AddToQueue(Vec<Track>),
    /// Replace the queue and start from its first entry
    PlayQueue(Vec<Track>),
    ClearQueue,
    SetRepeat(RepeatMode),
    SetShuffle(bool),

    // ===== Device notifications =====
    SourceLoaded {
        generation: LoadGeneration,
    },
    PositionReported {
        generation: LoadGeneration,
        position_ms: f64,
    },
    DurationReported {
        generation: LoadGeneration,
        duration_ms: f64,
    },
    /// `shuffle_pick` is the queue position to jump to when shuffle is on
    TrackEnded {
        generation: LoadGeneration,
        shuffle_pick: Option<usize>,
    },
    DeviceFailed {
        generation: LoadGeneration,
        reason: String,
    },
}

impl Action {
    /// Translate a device notification
    pub fn from_device(event: DeviceEvent, shuffle_pick: Option<usize>) -> Self {
        match event {
            DeviceEvent::Loaded { generation } => Action::SourceLoaded { generation },
            DeviceEvent::Position {
                generation,
                position_ms,
            } => Action::PositionReported {
                generation,
                position_ms,
            },
            DeviceEvent::Duration {
                generation,
                duration_ms,
            } => Action::DurationReported {
                generation,
                duration_ms,
            },
            DeviceEvent::Ended { generation } => Action::TrackEnded {
                generation,
                shuffle_pick,
            },
            DeviceEvent::Error { generation, reason } => Action::DeviceFailed { generation, reason },
        }
    }
}

/// Side effects of one transition, in the order they must happen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub commands: Vec<DeviceCommand>,
    pub events: Vec<PlaybackEvent>,
}

impl Effects {
    fn command(&mut self, command: DeviceCommand) {
        self.commands.push(command);
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty()
    }
}

/// Apply one action to the state
///
/// On `Err` the command was rejected and `state` is untouched.
pub fn reduce(state: &mut PlaybackState, action: Action) -> Result<Effects> {
    let mut fx = Effects::default();

    match action {
        Action::Play(track) => {
            if !track.is_valid() {
                warn!(track_id = %track.id, "Refusing to play track without id");
                return Err(PlaybackError::InvalidTrack(track.id));
            }
            let previous_index = state.queue.index();
            if let Some(position) = state.queue.position_of(&track.id) {
                state.queue.select(position);
            }
            state.load_track(track, false, &mut fx);
            if state.queue.index() != previous_index {
                fx.emit(state.queue_changed());
            }
        }

        Action::Pause => state.pause(&mut fx),

        Action::Toggle => {
            if state.is_playing {
                state.pause(&mut fx);
            } else {
                state.resume(&mut fx);
            }
        }

        Action::Next => state.step(true, &mut fx),

        Action::Prev => state.step(false, &mut fx),

        Action::Seek(target_ms) => {
            if target_ms.is_nan() {
                return Err(PlaybackError::InvalidSeekPosition(target_ms));
            }
            if state.current_track.is_none() {
                debug!(target_ms, "Seek ignored, no track loaded");
                return Err(PlaybackError::NoTrackLoaded);
            }
            let position = target_ms.min(state.duration_ms).max(0.0);
            state.current_time_ms = position;
            if state.transport == TransportState::Loading {
                state.seeked_while_loading = true;
            }
            fx.command(DeviceCommand::Seek(position));
            fx.emit(state.position_changed());
        }

        Action::SetVolume(level) => {
            if level.is_nan() {
                return Err(PlaybackError::InvalidVolume(level));
            }
            let volume = Volume::new(level);
            if volume != state.volume {
                state.volume = volume;
                fx.command(DeviceCommand::SetVolume(volume.level()));
                fx.emit(PlaybackEvent::VolumeChanged {
                    volume: volume.level(),
                });
            }
        }

        Action::AddToQueue(tracks) => {
            let tracks = valid_tracks(tracks);
            if tracks.is_empty() {
                debug!("Nothing to enqueue");
                return Ok(fx);
            }
            state.queue.append(tracks);
            state.reattach();
            fx.emit(state.queue_changed());
        }

        Action::PlayQueue(tracks) => {
            let tracks = valid_tracks(tracks);
            state.queue.replace(tracks);
            match state.queue.current().cloned() {
                Some(first) => state.load_track(first, true, &mut fx),
                None => state.unload(&mut fx),
            }
            fx.emit(state.queue_changed());
        }

        Action::ClearQueue => {
            state.queue.clear();
            state.unload(&mut fx);
            state.last_error = None;
            fx.emit(state.queue_changed());
        }

        Action::SetRepeat(mode) => {
            if state.repeat != mode {
                state.repeat = mode;
                fx.emit(PlaybackEvent::RepeatChanged { mode });
            }
        }

        Action::SetShuffle(enabled) => {
            if state.shuffle != enabled {
                state.shuffle = enabled;
                fx.emit(PlaybackEvent::ShuffleChanged { enabled });
            }
        }

        Action::SourceLoaded { generation } => {
            if state.is_stale(generation) || state.transport != TransportState::Loading {
                debug!(%generation, "Ignoring load confirmation");
                return Ok(fx);
            }
            // The device already honored a seek issued after the load
            if !state.seeked_while_loading {
                state.current_time_ms = 0.0;
            }
            state.seeked_while_loading = false;
            state.transport = if state.is_playing {
                TransportState::Playing
            } else {
                TransportState::Paused
            };
            fx.emit(state.state_changed());
            fx.emit(state.position_changed());
        }

        Action::PositionReported {
            generation,
            position_ms,
        } => {
            if state.is_stale(generation) || !position_ms.is_finite() {
                debug!(%generation, position_ms, "Ignoring position report");
                return Ok(fx);
            }
            state.current_time_ms = position_ms.max(0.0);
            fx.emit(state.position_changed());
        }

        Action::DurationReported {
            generation,
            duration_ms,
        } => {
            if state.is_stale(generation) || !duration_ms.is_finite() || duration_ms < 0.0 {
                debug!(%generation, duration_ms, "Ignoring duration report");
                return Ok(fx);
            }
            state.duration_ms = duration_ms;
            if duration_ms > 0.0 && state.current_time_ms > duration_ms {
                state.current_time_ms = duration_ms;
            }
            fx.emit(PlaybackEvent::DurationChanged { duration_ms });
        }

        Action::TrackEnded {
            generation,
            shuffle_pick,
        } => {
            if state.is_stale(generation) {
                debug!(%generation, "Ignoring end of abandoned track");
                return Ok(fx);
            }
            state.track_ended(shuffle_pick, &mut fx);
        }

        Action::DeviceFailed { generation, reason } => {
            if state.is_stale(generation) {
                debug!(%generation, %reason, "Ignoring error from abandoned load");
                return Ok(fx);
            }
            warn!(%generation, %reason, "Device failed, stopping playback");
            state.is_playing = false;
            state.transport = TransportState::Idle;
            state.last_error = Some(reason.clone());
            fx.emit(state.state_changed());
            fx.emit(PlaybackEvent::Error { message: reason });
        }
    }

    Ok(fx)
}

fn valid_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let total = tracks.len();
    let valid: Vec<Track> = tracks.into_iter().filter(Track::is_valid).collect();
    if valid.len() < total {
        warn!(dropped = total - valid.len(), "Dropped tracks without id");
    }
    valid
}
