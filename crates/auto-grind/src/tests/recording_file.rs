use crate::{AppError, RecordingFile};

use auto_grind_core::{
    Action, Axis, Button, DeviceKind, Event, KeyCode, MouseButton, PadButton, Recording,
};

use std::{fs, path::PathBuf, time::Duration};

use uuid::Uuid;

#[allow(clippy::unwrap_used)]
fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("auto-grind-recordings-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn event(ms: u64, device: DeviceKind, action: Action) -> Event {
    Event {
        timestamp: Duration::from_millis(ms),
        device,
        action,
    }
}

fn mixed_recording() -> Recording {
    let mut recording = Recording::new();
    recording.append_count = 2;
    recording.push(event(0, DeviceKind::Keyboard, Action::ButtonDown(Button::Key(KeyCode::KeyW))));
    recording.push(event(16, DeviceKind::Mouse, Action::Move { x: 512.25, y: 300.125 }));
    recording.push(event(
        33,
        DeviceKind::Mouse,
        Action::ButtonDown(Button::Mouse(MouseButton::Other(9))),
    ));
    recording.push(event(
        40,
        DeviceKind::Mouse,
        Action::AxisChange {
            axis: Axis::WheelY,
            value: -3.0,
        },
    ));
    recording.push(event(
        41,
        DeviceKind::Controller(2),
        Action::AxisChange {
            axis: Axis::LeftStickX,
            value: -0.731_201_171_875,
        },
    ));
    recording.push(event(
        41,
        DeviceKind::Controller(2),
        Action::ButtonUp(Button::Pad(PadButton::DPadLeft)),
    ));
    recording.push(event(
        1_250,
        DeviceKind::Keyboard,
        Action::ButtonUp(Button::Key(KeyCode::Other(0x1_0003))),
    ));
    recording
}

/// WHAT: A saved recording loads back event for event
/// WHY: Replaying a saved file must reproduce what was recorded exactly
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_saved_and_loaded_then_identical() {
    // Given: A recording touching every device kind
    let dir = temp_dir();
    let store = RecordingFile::new(&dir);
    let recording = mixed_recording();

    // When: Saving and loading it
    let path = store.save(&recording).unwrap();
    let loaded = RecordingFile::load(&path).unwrap();

    // Then: Events, timestamps and metadata all match
    assert_eq!(loaded, recording);
    assert!(path.starts_with(&dir));
    assert!(!path.with_extension("toml.tmp").exists());

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: The newest recording file is found, other files ignored
/// WHY: Start-up loads the last saved recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recordings_dir_when_finding_latest_then_recording_file_returned() {
    // Given: An empty directory, then one with a recording and stray files
    let dir = temp_dir();
    let store = RecordingFile::new(&dir);
    assert!(store.latest().unwrap().is_none());

    fs::write(dir.join("notes.toml"), "x = 1\n").unwrap();
    fs::write(dir.join("recording-1-abc.toml.tmp"), "").unwrap();
    let saved = store.save(&mixed_recording()).unwrap();

    // When: Looking for the latest
    let latest = store.latest().unwrap();

    // Then: Only the recording file qualifies
    assert_eq!(latest, Some(saved));

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: Files from an unknown format version are rejected
/// WHY: Guessing at a newer layout could replay garbage
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_format_version_when_loading_then_persistence_error() {
    let dir = temp_dir();
    let store = RecordingFile::new(&dir);
    let path = store.save(&mixed_recording()).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replace("format_version = 1", "format_version = 99")).unwrap();

    let result = RecordingFile::load(&path);

    assert!(matches!(result, Err(AppError::PersistenceError { .. })));
    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: Corrupt files produce an error, not a panic
/// WHY: A half-copied file must not take the app down
#[test]
#[allow(clippy::unwrap_used)]
fn given_corrupt_file_when_loading_then_persistence_error() {
    let dir = temp_dir();
    let path = dir.join("recording-0-broken.toml");
    fs::write(&path, "format_version = 1\nrecording = [").unwrap();

    assert!(matches!(
        RecordingFile::load(&path),
        Err(AppError::PersistenceError { .. })
    ));
    assert!(matches!(
        RecordingFile::load(&dir.join("missing.toml")),
        Err(AppError::PersistenceError { .. })
    ));

    fs::remove_dir_all(&dir).unwrap();
}
