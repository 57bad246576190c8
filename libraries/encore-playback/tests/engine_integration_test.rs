//! Integration tests for the playback engine
//!
//! Real playback scenarios driven through the public API, with device
//! notifications fed in the order a device would deliver them.

mod common;

use common::{confirm_load, end_current, engine, track, RecordingDevice};
use encore_playback::{
    DeviceCommand, DeviceEvent, InputFocus, Key, PlaybackConfig, PlaybackEngine, PlaybackError,
    PlaybackEvent, RepeatMode, SimulatedDevice, TransportState,
};
use std::time::Duration;

// ===== Queue Advance =====

#[test]
fn ended_track_advances_to_next_entry() {
    let mut engine = engine();
    engine.add_to_queue(vec![track("a", 5000), track("b", 7000)]);

    engine.play(track("a", 5000)).unwrap();
    assert_eq!(engine.state().current_track().unwrap().id, "a");
    assert!(engine.state().is_playing());
    assert_eq!(engine.state().queue_index(), 0);

    confirm_load(&mut engine);
    end_current(&mut engine);

    let state = engine.state();
    assert_eq!(state.current_track().unwrap().id, "b");
    assert_eq!(state.queue_index(), 1);
    assert!(state.is_playing());
    assert_eq!(state.current_time_ms(), 0.0);
    assert_eq!(engine.device().loads(), vec!["a", "b"]);
}

#[test]
fn repeat_track_restarts_same_track() {
    let mut engine = engine();
    engine.set_repeat(RepeatMode::Track);
    engine.play(track("a", 5000)).unwrap();
    confirm_load(&mut engine);
    let generation = engine.state().generation();
    engine.handle_device_event(DeviceEvent::Position {
        generation,
        position_ms: 5000.0,
    });

    end_current(&mut engine);

    let state = engine.state();
    assert_eq!(state.current_track().unwrap().id, "a");
    assert_eq!(state.current_time_ms(), 0.0);
    assert!(state.is_playing());
    assert_eq!(state.generation(), generation);
    assert_eq!(
        engine.device().calls[engine.device().calls.len() - 2..],
        [DeviceCommand::Seek(0.0), DeviceCommand::Play]
    );
}

#[test]
fn next_and_prev_wrap_around() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000), track("b", 1000), track("c", 1000)]);

    engine.prev();
    assert_eq!(engine.state().queue_index(), 2);
    assert_eq!(engine.state().current_track().unwrap().id, "c");

    engine.next();
    assert_eq!(engine.state().queue_index(), 0);
    assert_eq!(engine.state().current_track().unwrap().id, "a");
}

#[test]
fn next_wraps_even_with_repeat_off() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000), track("b", 1000)]);
    engine.next();
    engine.next();
    assert_eq!(engine.state().current_track().unwrap().id, "a");
    assert!(engine.state().is_playing());
}

#[test]
fn queue_exhausted_without_repeat_goes_idle() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000), track("b", 2000)]);
    confirm_load(&mut engine);
    end_current(&mut engine);
    confirm_load(&mut engine);
    end_current(&mut engine);

    let state = engine.state();
    assert_eq!(state.transport(), TransportState::Idle);
    assert!(!state.is_playing());
    assert_eq!(state.current_track().unwrap().id, "b");
    assert_eq!(state.current_time_ms(), 2000.0);

    // Play button starts the retained track over
    engine.toggle();
    assert_eq!(engine.state().transport(), TransportState::Loading);
    assert_eq!(engine.state().current_time_ms(), 0.0);
    assert_eq!(engine.device().loads(), vec!["a", "b", "b"]);
}

#[test]
fn empty_queue_navigation_is_safe() {
    let mut engine = engine();
    engine.next();
    engine.prev();
    assert!(engine.state().current_track().is_none());
    assert!(!engine.state().is_playing());

    engine.play(track("solo", 1000)).unwrap();
    engine.next();
    assert!(engine.state().current_track().is_none());
    assert!(!engine.state().is_playing());
    assert_eq!(engine.device().calls.last(), Some(&DeviceCommand::Stop));
}

#[test]
fn clear_queue_resets_to_defaults() {
    let mut engine = engine();
    engine.add_to_queue(vec![track("a", 1000), track("b", 1000)]);
    engine.play(track("b", 1000)).unwrap();

    engine.clear_queue();

    let state = engine.state();
    assert!(state.queue().is_empty());
    assert_eq!(state.queue_index(), 0);
    assert!(state.current_track().is_none());
    assert!(!state.is_playing());
    assert_eq!(state.transport(), TransportState::Idle);
    assert_eq!(engine.device().calls.last(), Some(&DeviceCommand::Stop));
}

#[test]
fn add_to_queue_does_not_interrupt() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000)]);
    let loads_before = engine.device().loads().len();

    engine.add_to_queue(vec![track("b", 1000), track("c", 1000)]);

    assert_eq!(engine.state().queue().len(), 3);
    assert_eq!(engine.state().queue_index(), 0);
    assert_eq!(engine.state().current_track().unwrap().id, "a");
    assert_eq!(engine.device().loads().len(), loads_before);
}

// ===== Detached Playback =====

#[test]
fn play_outside_queue_keeps_cursor() {
    let mut engine = engine();
    engine.add_to_queue(vec![track("a", 1000), track("b", 1000), track("c", 1000)]);
    engine.play(track("b", 1000)).unwrap();

    engine.play(track("x", 1000)).unwrap();
    assert_eq!(engine.state().queue_index(), 1);
    assert!(engine.state().is_detached());

    engine.next();
    assert_eq!(engine.state().current_track().unwrap().id, "c");
    assert!(!engine.state().is_detached());
}

#[test]
fn play_picks_first_duplicate() {
    let mut engine = engine();
    engine.add_to_queue(vec![track("a", 1000), track("b", 1000), track("a", 1000)]);
    engine.play(track("a", 1000)).unwrap();
    assert_eq!(engine.state().queue_index(), 0);
}

// ===== Seek & Volume =====

#[test]
fn seek_clamps_to_track() {
    let mut engine = engine();
    engine.play(track("a", 5000)).unwrap();

    engine.seek(-100.0).unwrap();
    assert_eq!(engine.state().current_time_ms(), 0.0);

    engine.seek(9999.0).unwrap();
    assert_eq!(engine.state().current_time_ms(), 5000.0);
    assert_eq!(engine.device().calls.last(), Some(&DeviceCommand::Seek(5000.0)));
}

#[test]
fn seek_does_not_change_transport() {
    let mut engine = engine();
    engine.play(track("a", 5000)).unwrap();
    confirm_load(&mut engine);
    engine.pause();

    engine.seek(2500.0).unwrap();
    assert_eq!(engine.state().transport(), TransportState::Paused);
}

#[test]
fn seek_without_track_changes_nothing() {
    let mut engine = engine();
    let calls = engine.device().calls.len();

    assert_eq!(engine.seek(1000.0), Err(PlaybackError::NoTrackLoaded));
    assert_eq!(engine.state().current_time_ms(), 0.0);
    assert_eq!(engine.device().calls.len(), calls);
}

#[test]
fn volume_propagates_to_device() {
    let mut engine = engine();
    engine.set_volume(1.7).unwrap();
    assert_eq!(engine.state().volume(), 1.0);
    assert_eq!(engine.device().calls.last(), Some(&DeviceCommand::SetVolume(1.0)));

    engine.set_volume(-3.0).unwrap();
    assert_eq!(engine.state().volume(), 0.0);
}

// ===== Stale Notifications =====

#[test]
fn late_reports_from_previous_track_are_ignored() {
    let mut engine = engine();
    engine.play(track("slow", 300_000)).unwrap();
    let slow = engine.state().generation();

    engine.play(track("fast", 4000)).unwrap();
    confirm_load(&mut engine);

    engine.handle_device_event(DeviceEvent::Duration {
        generation: slow,
        duration_ms: 300_000.0,
    });
    engine.handle_device_event(DeviceEvent::Position {
        generation: slow,
        position_ms: 120_000.0,
    });
    engine.handle_device_event(DeviceEvent::Ended { generation: slow });

    let state = engine.state();
    assert_eq!(state.current_track().unwrap().id, "fast");
    assert_eq!(state.duration_ms(), 4000.0);
    assert_eq!(state.current_time_ms(), 0.0);
    assert_eq!(state.transport(), TransportState::Playing);
}

#[test]
fn device_duration_overrides_catalog() {
    let mut engine = engine();
    engine.play(track("a", 5000)).unwrap();
    let generation = engine.state().generation();

    engine.handle_device_event(DeviceEvent::Duration {
        generation,
        duration_ms: 5321.0,
    });
    assert_eq!(engine.state().duration_ms(), 5321.0);
}

// ===== Error Path =====

#[test]
fn device_error_stops_and_surfaces() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000), track("b", 1000)]);
    engine.drain_events();
    let generation = engine.state().generation();

    engine.handle_device_event(DeviceEvent::Error {
        generation,
        reason: "network error".to_string(),
    });

    let state = engine.state();
    assert!(!state.is_playing());
    assert_eq!(state.transport(), TransportState::Idle);
    assert_eq!(state.current_track().unwrap().id, "a");
    assert_eq!(state.queue().len(), 2);
    assert!(engine.drain_events().contains(&PlaybackEvent::Error {
        message: "network error".to_string()
    }));

    // Retry
    let current = engine.state().current_track().cloned().unwrap();
    engine.play(current).unwrap();
    assert!(engine.state().is_playing());
    assert!(engine.state().last_error().is_none());
}

#[test]
fn rejected_load_does_not_leave_optimistic_state() {
    let device = RecordingDevice {
        reject_loads: true,
        ..RecordingDevice::default()
    };
    let mut engine = PlaybackEngine::with_seed(device, PlaybackConfig::default(), 1);

    engine.play(track("a", 1000)).unwrap();

    let state = engine.state();
    assert!(!state.is_playing());
    assert_eq!(state.transport(), TransportState::Idle);
    assert!(state.last_error().unwrap().contains("unsupported format"));
    // Play never reached the device
    assert!(!engine.device().calls.contains(&DeviceCommand::Play));
}

// ===== Keyboard =====

#[test]
fn keyboard_shortcuts() {
    let mut engine = engine();
    engine.play(track("a", 60_000)).unwrap();
    confirm_load(&mut engine);

    engine.handle_key(&Key::ArrowLeft, InputFocus::Document);
    assert_eq!(engine.state().current_time_ms(), 0.0);

    engine.handle_key(&Key::ArrowRight, InputFocus::Document);
    engine.handle_key(&Key::ArrowRight, InputFocus::Document);
    assert_eq!(engine.state().current_time_ms(), 10_000.0);

    engine.handle_key(&Key::ArrowDown, InputFocus::Document);
    assert!((engine.state().volume() - 0.4).abs() < 1e-9);

    engine.handle_key(&Key::Space, InputFocus::Document);
    assert!(!engine.state().is_playing());
    assert_eq!(engine.state().transport(), TransportState::Paused);

    engine.handle_key(&Key::Space, InputFocus::TextInput);
    assert!(!engine.state().is_playing());
}

#[test]
fn volume_keys_stop_at_bounds() {
    let mut engine = engine();
    for _ in 0..20 {
        engine.handle_key(&Key::ArrowUp, InputFocus::Document);
    }
    assert_eq!(engine.state().volume(), 1.0);

    for _ in 0..20 {
        engine.handle_key(&Key::ArrowDown, InputFocus::Document);
    }
    assert_eq!(engine.state().volume(), 0.0);
}

#[test]
fn custom_steps_from_config() {
    let config = PlaybackConfig {
        seek_step_ms: 10_000,
        volume_step: 0.25,
        ..PlaybackConfig::default()
    };
    let mut engine = PlaybackEngine::with_seed(RecordingDevice::default(), config, 1);
    engine.play(track("a", 60_000)).unwrap();

    engine.handle_key(&Key::ArrowRight, InputFocus::Document);
    engine.handle_key(&Key::ArrowUp, InputFocus::Document);

    assert_eq!(engine.state().current_time_ms(), 10_000.0);
    assert_eq!(engine.state().volume(), 0.75);
}

// ===== Events =====

#[test]
fn play_emits_track_then_state() {
    let mut engine = engine();
    engine.play(track("a", 1000)).unwrap();

    let events = engine.drain_events();
    assert_eq!(
        events,
        vec![
            PlaybackEvent::TrackChanged {
                track_id: Some("a".to_string()),
                previous_track_id: None,
            },
            PlaybackEvent::StateChanged {
                state: TransportState::Loading,
                is_playing: true,
            },
        ]
    );
}

#[test]
fn ended_emits_track_finished() {
    let mut engine = engine();
    engine.play_queue(vec![track("a", 1000), track("b", 1000)]);
    confirm_load(&mut engine);
    engine.drain_events();

    end_current(&mut engine);

    let events = engine.drain_events();
    assert_eq!(
        events[0],
        PlaybackEvent::TrackFinished {
            track_id: "a".to_string()
        }
    );
}

// ===== Shuffle =====

#[test]
fn shuffle_never_repeats_current_on_advance() {
    let mut engine = engine();
    engine.set_shuffle(true);
    engine.play_queue((0..6).map(|i| track(&format!("t{i}"), 1000)).collect());

    for _ in 0..30 {
        let before = engine.state().queue_index();
        confirm_load(&mut engine);
        end_current(&mut engine);
        assert_ne!(engine.state().queue_index(), before);
        assert!(engine.state().is_playing());
    }
}

#[test]
fn same_seed_same_shuffle_order() {
    let order = |seed: u64| {
        let mut engine =
            PlaybackEngine::with_seed(RecordingDevice::default(), PlaybackConfig::default(), seed);
        engine.set_shuffle(true);
        engine.play_queue((0..8).map(|i| track(&format!("t{i}"), 1000)).collect());
        for _ in 0..10 {
            end_current(&mut engine);
        }
        engine.device().loads()
    };

    assert_eq!(order(99), order(99));
}

#[test]
fn manual_skip_ignores_shuffle() {
    let mut engine = engine();
    engine.set_shuffle(true);
    engine.play_queue(vec![track("a", 1000), track("b", 1000), track("c", 1000)]);

    engine.next();
    assert_eq!(engine.state().queue_index(), 1);
}

// ===== Simulated Device =====

#[test]
fn simulated_session_plays_through_queue() {
    let mut engine = PlaybackEngine::with_seed(SimulatedDevice::new(), PlaybackConfig::default(), 3);
    engine.play_queue(vec![track("a", 2000), track("b", 3000)]);
    engine.pump_device();
    assert_eq!(engine.state().transport(), TransportState::Playing);

    for _ in 0..2 {
        engine.device_mut().tick(Duration::from_secs(1));
        engine.pump_device();
    }
    assert_eq!(engine.state().current_track().unwrap().id, "b");
    assert_eq!(engine.device().loaded_track_id(), Some("b"));

    engine.pump_device();
    engine.device_mut().tick(Duration::from_millis(1500));
    engine.pump_device();
    assert_eq!(engine.snapshot().elapsed_label, "0:01");

    for _ in 0..3 {
        engine.device_mut().tick(Duration::from_secs(1));
        engine.pump_device();
    }
    assert!(!engine.state().is_playing());
    assert_eq!(engine.state().transport(), TransportState::Idle);
    assert_eq!(engine.snapshot().progress_percent, 100.0);
}

#[test]
fn simulated_seek_while_loading_stays_in_sync() {
    let mut engine = PlaybackEngine::with_seed(SimulatedDevice::new(), PlaybackConfig::default(), 3);
    engine.play(track("a", 60_000)).unwrap();
    engine.seek(30_000.0).unwrap();
    engine.pump_device();

    assert_eq!(engine.state().transport(), TransportState::Playing);
    assert_eq!(engine.state().current_time_ms(), 30_000.0);
    assert_eq!(engine.device().position_ms(), 30_000.0);

    engine.device_mut().tick(Duration::from_secs(1));
    engine.pump_device();
    assert_eq!(engine.state().current_time_ms(), 31_000.0);
    assert_eq!(engine.snapshot().elapsed_label, "0:31");
}

#[test]
fn simulated_load_failure_surfaces_error() {
    let mut device = SimulatedDevice::new();
    device.fail_on_load("broken");
    let mut engine = PlaybackEngine::with_seed(device, PlaybackConfig::default(), 3);

    engine.play(track("broken", 1000)).unwrap();
    engine.pump_device();

    let snapshot = engine.snapshot();
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.current_track.unwrap().id, "broken");
    assert!(snapshot.last_error.unwrap().contains("broken"));
}

#[test]
fn independent_engines_do_not_share_state() {
    let mut first = engine();
    let second = engine();

    first.play(track("a", 1000)).unwrap();

    assert!(first.state().is_playing());
    assert!(second.state().current_track().is_none());
}
