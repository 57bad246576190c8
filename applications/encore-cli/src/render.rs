//! Plain-text rendering of the player state

use crate::catalog::Catalog;
use encore_playback::format::format_time;
use encore_playback::{PlaybackEvent, PlaybackSnapshot, Track, TransportState};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

fn track_label(track: &Track) -> String {
    match (track.title.is_empty(), track.artist.is_empty()) {
        (true, _) => track.id.clone(),
        (false, true) => track.title.clone(),
        (false, false) => format!("{} - {}", track.title, track.artist),
    }
}

/// Progress bar of `width` cells for a 0-100 percentage
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One-line now-playing status
pub fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let icon = match snapshot.transport {
        TransportState::Loading => "..",
        _ if snapshot.is_playing => ">",
        _ => "||",
    };
    let title = snapshot
        .current_track
        .as_ref()
        .map(track_label)
        .unwrap_or_else(|| "Nothing playing".to_string());

    let mut line = format!(
        "{icon} {title}  {} {} {}  vol {}%  repeat {}  shuffle {}",
        snapshot.elapsed_label,
        progress_bar(snapshot.progress_percent, BAR_WIDTH),
        snapshot.duration_label,
        (snapshot.volume * 100.0).round(),
        snapshot.repeat,
        if snapshot.shuffle { "on" } else { "off" },
    );
    if let Some(error) = &snapshot.last_error {
        let _ = write!(line, "  [error: {error}]");
    }
    line
}

/// Queue listing with the current entry marked
pub fn queue_listing(snapshot: &PlaybackSnapshot) -> String {
    if snapshot.queue.is_empty() {
        return "Queue is empty".to_string();
    }

    let mut out = String::new();
    for (index, track) in snapshot.queue.iter().enumerate() {
        let marker = if snapshot.is_highlighted(index) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  {}",
            index + 1,
            track_label(track),
            format_time(track.duration_ms as f64)
        );
    }
    out.trim_end().to_string()
}

pub fn catalog_listing(catalog: &Catalog) -> String {
    let mut out = String::new();
    for track in catalog.tracks() {
        let _ = writeln!(
            out,
            "{:>4}  {}  {}",
            track.id,
            track_label(track),
            format_time(track.duration_ms as f64)
        );
    }
    out.trim_end().to_string()
}

/// Human-readable line for events worth announcing
///
/// Position and duration updates are left to the status line.
pub fn event_line(event: &PlaybackEvent, snapshot: &PlaybackSnapshot) -> Option<String> {
    match event {
        PlaybackEvent::TrackChanged {
            track_id: Some(id), ..
        } => {
            let label = snapshot
                .current_track
                .as_ref()
                .filter(|t| &t.id == id)
                .map(track_label)
                .unwrap_or_else(|| id.clone());
            Some(format!("Now playing: {label}"))
        }
        PlaybackEvent::TrackChanged { track_id: None, .. } => Some("Stopped".to_string()),
        PlaybackEvent::TrackFinished { track_id } => Some(format!("Finished: {track_id}")),
        PlaybackEvent::RepeatChanged { mode } => Some(format!("Repeat: {mode}")),
        PlaybackEvent::ShuffleChanged { enabled } => {
            Some(format!("Shuffle: {}", if *enabled { "on" } else { "off" }))
        }
        PlaybackEvent::Error { message } => Some(format!("Playback error: {message}")),
        _ => None,
    }
}
