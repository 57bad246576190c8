//! Track catalog
//!
//! JSON list of tracks the player can pick from, either a bare array or
//! an object with a `tracks` field. Entries use the camelCase track shape
//! (`id`, `durationMs`, `title`, `artist`, `album`, `cover`).

use crate::error::{CliError, Result};
use encore_playback::Track;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Track>),
    Wrapped { tracks: Vec<Track> },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Parse a catalog, dropping blank and duplicate ids
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: CatalogFile = serde_json::from_str(json)?;
        let entries = match parsed {
            CatalogFile::List(tracks) | CatalogFile::Wrapped { tracks } => tracks,
        };

        let mut seen = HashSet::new();
        let mut tracks = Vec::with_capacity(entries.len());
        for track in entries {
            if !track.is_valid() {
                warn!(title = %track.title, "Skipping catalog entry without id");
                continue;
            }
            if !seen.insert(track.id.clone()) {
                warn!(track_id = %track.id, "Skipping duplicate catalog entry");
                continue;
            }
            tracks.push(track);
        }

        if tracks.is_empty() {
            return Err(CliError::Catalog("catalog contains no playable tracks".to_string()));
        }
        Ok(Self { tracks })
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CliError::Catalog(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), tracks = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Catalog bundled with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn find(&self, id: &str) -> Result<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CliError::UnknownTrack(id.to_string()))
    }

    /// Look up several ids, in order
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<Track>> {
        ids.iter().map(|id| self.find(id).cloned()).collect()
    }
}
