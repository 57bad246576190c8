//! Volume level
//!
//! Linear 0.0-1.0 level, matching what a media element accepts.

use serde::{Deserialize, Serialize};

/// Volume level clamped to `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    /// Create a volume, clamping into range
    ///
    /// Callers are expected to reject NaN first; it maps to 0 here.
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            return Self(0.0);
        }
        Self(level.clamp(0.0, 1.0))
    }

    /// Current level (0.0-1.0)
    pub fn level(self) -> f64 {
        self.0
    }

    /// Level shifted by `delta`, clamped
    #[must_use]
    pub fn stepped(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    /// Level as a whole percentage, for display
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(0.5)
    }
}
