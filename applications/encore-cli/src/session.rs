//! Player session
//!
//! Couples the engine with a simulated device, the catalog and the
//! simulated keyboard focus. The binary feeds it typed commands and clock
//! ticks; everything here is synchronous.

use crate::catalog::Catalog;
use crate::command::{Command, SeekTarget, HELP};
use crate::config::CliConfig;
use crate::error::Result;
use crate::render;
use encore_playback::{InputFocus, PlaybackEngine, PlaybackSnapshot, SimulatedDevice};
use std::time::Duration;
use tracing::debug;

// Bound for draining chained device notifications in one go
const MAX_PUMP_ROUNDS: usize = 16;

pub struct Session {
    engine: PlaybackEngine<SimulatedDevice>,
    catalog: Catalog,
    focus: InputFocus,
}

impl Session {
    pub fn new(config: &CliConfig, catalog: Catalog) -> Self {
        let device = SimulatedDevice::new();
        let playback = config.playback.clone();
        let engine = match config.player.seed {
            Some(seed) => PlaybackEngine::with_seed(device, playback, seed),
            None => PlaybackEngine::new(device, playback),
        };

        Self {
            engine,
            catalog,
            focus: InputFocus::Document,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<SimulatedDevice> {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn focus(&self) -> InputFocus {
        self.focus
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.engine.snapshot()
    }

    /// Run one command and return the text to show for it
    ///
    /// `Quit` is the caller's business and produces no output here.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        debug!(?command, "Executing command");

        let output = match command {
            Command::Play(id) => {
                let track = self.catalog.find(&id)?.clone();
                self.engine.play(track)?;
                String::new()
            }
            Command::PlayAll(ids) => {
                let tracks = if ids.is_empty() {
                    self.catalog.tracks().to_vec()
                } else {
                    self.catalog.resolve(&ids)?
                };
                self.engine.play_queue(tracks);
                String::new()
            }
            Command::Enqueue(ids) => {
                let tracks = self.catalog.resolve(&ids)?;
                let count = tracks.len();
                self.engine.add_to_queue(tracks);
                format!("Queued {count} track(s)")
            }
            Command::Pause => {
                self.engine.pause();
                String::new()
            }
            Command::Toggle => {
                self.engine.toggle();
                String::new()
            }
            Command::Next => {
                self.engine.next();
                String::new()
            }
            Command::Prev => {
                self.engine.prev();
                String::new()
            }
            Command::Seek(target) => {
                match target {
                    SeekTarget::Absolute(ms) => self.engine.seek(ms)?,
                    SeekTarget::Relative(delta) => self.engine.seek_by(delta)?,
                    SeekTarget::Percent(percent) => self.engine.seek_to_percent(percent)?,
                }
                render::status_line(&self.engine.snapshot())
            }
            Command::Volume(percent) => {
                self.engine.set_volume(percent / 100.0)?;
                format!("Volume {}%", (self.engine.state().volume() * 100.0).round())
            }
            Command::Clear => {
                self.engine.clear_queue();
                String::new()
            }
            Command::Repeat(mode) => {
                self.engine.set_repeat(mode);
                String::new()
            }
            Command::Shuffle(enabled) => {
                self.engine.set_shuffle(enabled);
                String::new()
            }
            Command::Key(key) => match self.engine.handle_key(&key, self.focus) {
                Some(shortcut) => format!("{shortcut:?}"),
                None => "(no shortcut)".to_string(),
            },
            Command::Focus(focus) => {
                self.focus = focus;
                format!("Focus: {focus:?}")
            }
            Command::Status => render::status_line(&self.engine.snapshot()),
            Command::Queue => render::queue_listing(&self.engine.snapshot()),
            Command::Tracks => render::catalog_listing(&self.catalog),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };

        self.settle();
        Ok(output)
    }

    /// Advance the simulated clock
    pub fn tick(&mut self, elapsed: Duration) {
        self.engine.device_mut().tick(elapsed);
        self.settle();
    }

    /// Apply device notifications until the device is quiet
    fn settle(&mut self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            if self.engine.pump_device() == 0 {
                break;
            }
        }
    }

    /// Announcements for everything that happened since the last call
    pub fn drain_messages(&mut self) -> Vec<String> {
        let snapshot = self.engine.snapshot();
        self.engine
            .drain_events()
            .iter()
            .filter_map(|event| render::event_line(event, &snapshot))
            .collect()
    }
}
