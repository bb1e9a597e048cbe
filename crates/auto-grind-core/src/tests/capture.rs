use crate::{
    Action, Button, CaptureBase, CaptureDecision, CaptureListener, Chord, ChordTable, DeviceKind,
    EngineConfig, KeyCode, Modifiers, PadButton, RawDevice, RawEvent, RawKind, Trigger,
    tests::support::{config, key_press, key_release, mouse_move, ms, recording_at, timestamps_ms},
};

use std::{sync::Arc, time::Instant};

fn listener(config: EngineConfig) -> CaptureListener {
    CaptureListener::new(config, Arc::new(ChordTable::defaults()))
}

/// WHAT: A fresh capture starts its timeline at the first event
/// WHY: Dead time between the hotkey and the first input is not replayed
#[test]
#[allow(clippy::unwrap_used)]
fn given_fresh_capture_when_events_arrive_then_first_at_zero_and_relative_after() {
    // Given: A fresh capture started well before the first input
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(CaptureBase::Fresh, t0);

    // When: Three key presses arrive at +500, +600, +800
    for offset in [500, 600, 800] {
        let decision = listener.on_raw_event(&key_press(t0 + ms(offset), KeyCode::KeyW));
        assert_eq!(decision, CaptureDecision::Captured);
    }
    let recording = listener.stop().unwrap();

    // Then: Timestamps are relative to the first one
    assert_eq!(timestamps_ms(&recording), vec![0, 100, 300]);
    assert_eq!(recording.append_count, 0);
    assert!(!listener.is_active());
}

/// WHAT: Events from a disabled device kind never reach the recording
/// WHY: Users opt out of capturing the mouse while keeping the keyboard
#[test]
#[allow(clippy::unwrap_used)]
fn given_mouse_disabled_when_mouse_moves_then_no_mouse_events_recorded() {
    // Given: Mouse capture disabled
    let t0 = Instant::now();
    let mut listener = listener(EngineConfig {
        enable_mouse: false,
        ..config()
    });
    listener.start(CaptureBase::Fresh, t0);

    // When: Mouse and keyboard input interleave
    let mut decisions = Vec::new();
    for i in 0..20u64 {
        decisions.push(listener.on_raw_event(&mouse_move(t0 + ms(i), i as f64, 2.0 * i as f64)));
    }
    listener.on_raw_event(&key_press(t0 + ms(30), KeyCode::KeyQ));
    let recording = listener.stop().unwrap();

    // Then: Only the key press is in the recording
    assert!(decisions.iter().all(|d| *d == CaptureDecision::Disabled));
    assert!(recording.events().iter().all(|e| e.device != DeviceKind::Mouse));
    assert_eq!(recording.len(), 1);
}

/// WHAT: Controller input is captured only when enabled
/// WHY: Gamepad capture is opt-in
#[test]
#[allow(clippy::unwrap_used)]
fn given_controller_enabled_when_pad_pressed_then_recorded_on_controller() {
    let t0 = Instant::now();
    let press = RawEvent {
        at: t0,
        device: RawDevice::Controller(1),
        kind: RawKind::PadPress(PadButton::South),
    };

    // Given: Default config with controllers off
    let mut off = listener(config());
    off.start(CaptureBase::Fresh, t0);
    assert_eq!(off.on_raw_event(&press), CaptureDecision::Disabled);

    // Given: Controllers on
    let mut on = listener(EngineConfig {
        enable_controller: true,
        ..config()
    });
    on.start(CaptureBase::Fresh, t0);
    assert_eq!(on.on_raw_event(&press), CaptureDecision::Captured);

    let recording = on.stop().unwrap();
    assert_eq!(recording.events()[0].device, DeviceKind::Controller(1));
    assert_eq!(
        recording.events()[0].action,
        Action::ButtonDown(Button::Pad(PadButton::South))
    );
}

/// WHAT: Hotkey chord presses stay out of the recording
/// WHY: Replaying the stop hotkey would stop the next capture
#[test]
#[allow(clippy::unwrap_used)]
fn given_capture_when_chord_pressed_then_chord_keys_not_recorded() {
    // Given: Shift is held when the capture starts (shift+Enter started it)
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.on_raw_event(&key_press(t0, KeyCode::ShiftLeft));
    listener.on_raw_event(&key_press(t0, KeyCode::Enter));
    listener.start(CaptureBase::Fresh, t0);

    // When: The chord keys are released, a key is typed, then Escape
    let decisions = [
        listener.on_raw_event(&key_release(t0 + ms(10), KeyCode::Enter)),
        listener.on_raw_event(&key_release(t0 + ms(20), KeyCode::ShiftLeft)),
        listener.on_raw_event(&key_press(t0 + ms(100), KeyCode::KeyD)),
        listener.on_raw_event(&key_release(t0 + ms(150), KeyCode::KeyD)),
        listener.on_raw_event(&key_press(t0 + ms(200), KeyCode::Escape)),
    ];
    let recording = listener.stop().unwrap();

    // Then: Releases of keys pressed before capture are orphans, Escape is
    // a chord and only the typed key is kept
    assert_eq!(
        decisions,
        [
            CaptureDecision::Orphan,
            CaptureDecision::Orphan,
            CaptureDecision::Captured,
            CaptureDecision::Captured,
            CaptureDecision::Chord,
        ]
    );
    assert_eq!(recording.len(), 2);
    assert_eq!(timestamps_ms(&recording), vec![0, 50]);
}

/// WHAT: A bare key bound only outside recording is captured as input
/// WHY: Keys must be filtered only where they act as hotkeys
#[test]
#[allow(clippy::unwrap_used)]
fn given_bare_key_bound_for_idle_when_pressed_while_recording_then_captured() {
    // Given: F9 starts playback, Escape stops recording
    let chords = ChordTable::new()
        .bind(Chord::new(Modifiers::NONE, KeyCode::F9), Trigger::StartPlay)
        .bind(Chord::new(Modifiers::NONE, KeyCode::Escape), Trigger::StopRecord);
    let mut listener = CaptureListener::new(config(), Arc::new(chords));
    let t0 = Instant::now();
    listener.start(CaptureBase::Fresh, t0);

    // When: Both keys are pressed during the capture
    let f9 = listener.on_raw_event(&key_press(t0 + ms(10), KeyCode::F9));
    let escape = listener.on_raw_event(&key_press(t0 + ms(20), KeyCode::Escape));

    // Then: F9 is recorded, Escape is not
    assert_eq!(f9, CaptureDecision::Captured);
    assert_eq!(escape, CaptureDecision::Chord);
    assert_eq!(listener.stop().unwrap().len(), 1);
}

/// WHAT: Modifiers are tracked while idle
/// WHY: The first chord must be recognised before any capture runs
#[test]
fn given_idle_listener_when_modifier_pressed_then_inactive_but_tracked() {
    let t0 = Instant::now();
    let mut listener = listener(config());

    let decision = listener.on_raw_event(&key_press(t0, KeyCode::ControlRight));

    assert_eq!(decision, CaptureDecision::Inactive);
    assert!(listener.modifiers().ctrl);

    listener.on_raw_event(&key_release(t0, KeyCode::ControlRight));
    assert!(!listener.modifiers().ctrl);
}

/// WHAT: Appending continues from the last timestamp plus the real gap
/// WHY: Pauses between segments are part of what gets replayed
#[test]
#[allow(clippy::unwrap_used)]
fn given_append_base_when_events_arrive_then_offset_by_gap_since_finalize() {
    // Given: A 300ms recording finalized at t0
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(
        CaptureBase::Append {
            recording: recording_at(&[0, 100, 300]),
            finalized_at: t0,
        },
        t0 + ms(400),
    );

    // When: Two events arrive 500ms and 550ms after finalize
    listener.on_raw_event(&key_press(t0 + ms(500), KeyCode::KeyB));
    listener.on_raw_event(&key_press(t0 + ms(550), KeyCode::KeyC));
    let recording = listener.stop().unwrap();

    // Then: They land at 300 + gap
    assert_eq!(timestamps_ms(&recording), vec![0, 100, 300, 800, 850]);
    assert_eq!(recording.append_count, 1);
}

/// WHAT: An append segment with no events does not count as a segment
/// WHY: The append counter reflects real segments only
#[test]
#[allow(clippy::unwrap_used)]
fn given_append_base_when_stopped_without_events_then_count_unchanged() {
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(
        CaptureBase::Append {
            recording: recording_at(&[0, 40]),
            finalized_at: t0,
        },
        t0,
    );

    let recording = listener.stop().unwrap();

    assert_eq!(recording.append_count, 0);
    assert_eq!(recording.len(), 2);
}

/// WHAT: Resuming from a prefix starts at the stop position
/// WHY: Stop-and-record keeps what was replayed and continues in time
#[test]
#[allow(clippy::unwrap_used)]
fn given_resume_base_when_events_arrive_then_continue_from_elapsed() {
    // Given: Two events replayed and playback stopped at 250ms
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(
        CaptureBase::Resume {
            prefix: recording_at(&[0, 100]),
            elapsed: ms(250),
        },
        t0,
    );

    // When: An event arrives 50ms later
    listener.on_raw_event(&key_press(t0 + ms(50), KeyCode::KeyE));
    let recording = listener.stop().unwrap();

    // Then: It lands at 300ms
    assert_eq!(timestamps_ms(&recording), vec![0, 100, 300]);
}

/// WHAT: Buttons held by the base recording can be released
/// WHY: A replayed press cut short by stop-and-record needs its release
#[test]
#[allow(clippy::unwrap_used)]
fn given_base_with_held_key_when_release_arrives_then_captured() {
    // Given: A prefix that pressed KeyA and never released it
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(
        CaptureBase::Resume {
            prefix: recording_at(&[0]),
            elapsed: ms(10),
        },
        t0,
    );

    // When: KeyA is released
    let decision = listener.on_raw_event(&key_release(t0 + ms(5), KeyCode::KeyA));

    // Then: The release is part of the recording
    assert_eq!(decision, CaptureDecision::Captured);
    assert_eq!(listener.stop().unwrap().len(), 2);
}

/// WHAT: Malformed input is dropped and capture goes on
/// WHY: One bad hook event must not end a recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_malformed_event_when_capturing_then_dropped_and_capture_continues() {
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(CaptureBase::Fresh, t0);

    let bad = listener.on_raw_event(&mouse_move(t0, f64::INFINITY, 0.0));
    let good = listener.on_raw_event(&mouse_move(t0 + ms(1), 4.0, 4.0));

    assert_eq!(bad, CaptureDecision::Malformed);
    assert_eq!(good, CaptureDecision::Captured);
    assert_eq!(listener.stop().unwrap().len(), 1);
}

/// WHAT: Discard drops the in-progress capture
/// WHY: Nothing from a discarded capture may be kept
#[test]
fn given_active_capture_when_discarded_then_stop_returns_none() {
    let t0 = Instant::now();
    let mut listener = listener(config());
    listener.start(CaptureBase::Fresh, t0);
    listener.on_raw_event(&key_press(t0, KeyCode::KeyZ));

    listener.discard();

    assert!(listener.stop().is_none());
    assert_eq!(
        listener.on_raw_event(&key_press(t0, KeyCode::KeyZ)),
        CaptureDecision::Inactive
    );
}
