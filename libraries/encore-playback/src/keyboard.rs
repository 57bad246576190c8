//! Keyboard shortcuts
//!
//! Space toggles playback, left/right seek, up/down change volume.
//! Nothing fires while focus is inside a text input.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keys the player listens for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Anything else, by its code
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    /// Accepts DOM `KeyboardEvent.code` values and short aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            "Space" | "space" | " " => Key::Space,
            "ArrowLeft" | "left" => Key::ArrowLeft,
            "ArrowRight" | "right" => Key::ArrowRight,
            "ArrowUp" | "up" => Key::ArrowUp,
            "ArrowDown" | "down" => Key::ArrowDown,
            other => Key::Other(other.to_string()),
        };
        Ok(key)
    }
}

/// Where keyboard focus currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputFocus {
    /// Page body or a non-editable control
    #[default]
    Document,

    /// A text field; shortcuts must not steal keystrokes
    TextInput,
}

/// Player action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    TogglePlayback,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
}

/// Resolve a key press to a shortcut
pub fn shortcut_for(key: &Key, focus: InputFocus) -> Option<Shortcut> {
    if focus == InputFocus::TextInput {
        return None;
    }

    match key {
        Key::Space => Some(Shortcut::TogglePlayback),
        Key::ArrowLeft => Some(Shortcut::SeekBackward),
        Key::ArrowRight => Some(Shortcut::SeekForward),
        Key::ArrowUp => Some(Shortcut::VolumeUp),
        Key::ArrowDown => Some(Shortcut::VolumeDown),
        Key::Other(_) => None,
    }
}
