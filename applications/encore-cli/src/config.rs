/// CLI configuration
use crate::error::{CliError, Result};
use encore_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Simulated clock resolution in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Catalog file; the bundled catalog is used when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Fixed shuffle seed, for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            catalog: None,
            seed: None,
        }
    }
}

fn default_tick_ms() -> u64 {
    250
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. ENCORE_PLAYBACK__VOLUME=0.8
        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !(0.0..=1.0).contains(&playback.volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be within 0.0-1.0, got {}",
                playback.volume
            )));
        }

        if !(playback.volume_step.is_finite() && playback.volume_step > 0.0) {
            return Err(CliError::Config(
                "playback.volume_step must be a positive number".to_string(),
            ));
        }

        if playback.seek_step_ms == 0 {
            return Err(CliError::Config(
                "playback.seek_step_ms must be greater than 0".to_string(),
            ));
        }

        if self.player.tick_ms == 0 {
            return Err(CliError::Config(
                "player.tick_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.player.tick_ms)
    }
}
