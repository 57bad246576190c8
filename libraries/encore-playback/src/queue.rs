//! Play queue
//!
//! Ordered list of tracks plus the index of the entry being played.
//! Insertion order is playback order; navigation wraps at both ends.

use crate::types::Track;

/// Play queue with a wrapping cursor
///
/// ```text
/// index ──┐
///         ▼
///   [ A ][ B ][ C ][ D ]
///    ▲                │
///    └──── advance ───┘
/// ```
///
/// `index` is always a valid position, or 0 when the queue is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Track>,
    index: usize,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tracks to the end, keeping the cursor where it is
    pub fn append(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    /// Replace every entry and rewind the cursor
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.index = 0;
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = 0;
    }

    /// First position holding a track with this id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Move the cursor to `index`
    ///
    /// Returns the track there, or `None` (cursor untouched) when out of range.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.index = index;
        self.tracks.get(index)
    }

    /// Step forward, wrapping from the last entry to the first
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.tracks.get(self.index)
    }

    /// Step back, wrapping from the first entry to the last
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = if self.index == 0 {
            self.tracks.len() - 1
        } else {
            self.index - 1
        };
        self.tracks.get(self.index)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    /// Whether the cursor sits on a track with this id
    pub fn is_current(&self, id: &str) -> bool {
        self.current().is_some_and(|t| t.id == id)
    }

    /// Whether the cursor sits on the final entry
    pub fn is_last(&self) -> bool {
        !self.tracks.is_empty() && self.index == self.tracks.len() - 1
    }

    /// Get track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All entries in playback order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Cursor position
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of tracks in queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
