use crate::{
    Action, Axis, Button, CoreError, DeviceKind, KeyCode, PadButton, RawDevice, RawEvent, RawKind,
    denormalize, normalize,
    tests::support::{mouse_move, ms},
};

use std::time::Instant;

/// WHAT: Pointer coordinates are divided by the screen scale
/// WHY: Capture and replay must agree across display scaling
#[test]
#[allow(clippy::unwrap_used)]
fn given_scaled_display_when_normalizing_move_then_coordinates_divided_by_scale() {
    // Given: A raw move at physical (250, 500) on a 125% display
    let raw = mouse_move(Instant::now(), 250.0, 500.0);

    // When: Normalizing
    let event = normalize(&raw, 1.25, ms(40)).unwrap();

    // Then: Coordinates are scale independent and the timestamp is kept
    assert_eq!(event.device, DeviceKind::Mouse);
    assert_eq!(event.action, Action::Move { x: 200.0, y: 400.0 });
    assert_eq!(event.timestamp, ms(40));
}

/// WHAT: Denormalizing reverses normalization
/// WHY: Playback must land the pointer where it was captured
#[test]
#[allow(clippy::unwrap_used)]
fn given_normalized_move_when_denormalizing_then_physical_coordinates_restored() {
    // Given: A move normalized at scale 1.5
    let event = normalize(&mouse_move(Instant::now(), 300.0, 150.0), 1.5, ms(0)).unwrap();

    // When: Denormalizing with the same scale
    let action = denormalize(&event.action, 1.5);

    // Then: Physical coordinates come back
    assert_eq!(action, Action::Move { x: 300.0, y: 150.0 });
}

/// WHAT: Non-pointer actions are untouched by denormalization
/// WHY: Only coordinates depend on display scaling
#[test]
fn given_key_action_when_denormalizing_then_unchanged() {
    let action = Action::ButtonDown(Button::Key(KeyCode::Space));

    assert_eq!(denormalize(&action, 2.0), action);
}

/// WHAT: Controller indices outside 1..=4 are malformed
/// WHY: Unknown device ids must be rejected, not guessed
#[test]
fn given_unknown_controller_id_when_normalizing_then_malformed_input_error() {
    // Given: Events from controller 0 and controller 5
    for index in [0, 5, 300] {
        let raw = RawEvent {
            at: Instant::now(),
            device: RawDevice::Controller(index),
            kind: RawKind::PadPress(PadButton::South),
        };

        // When: Normalizing
        let result = normalize(&raw, 1.0, ms(0));

        // Then: MalformedInput is returned
        assert!(matches!(result, Err(CoreError::MalformedInput { .. })));
    }
}

/// WHAT: Valid controller events keep their index and axis value
/// WHY: Replays must address the same pad and axis
#[test]
#[allow(clippy::unwrap_used)]
fn given_controller_axis_when_normalizing_then_axis_change_on_same_controller() {
    let raw = RawEvent {
        at: Instant::now(),
        device: RawDevice::Controller(2),
        kind: RawKind::PadAxis {
            axis: Axis::LeftStickX,
            value: -0.5,
        },
    };

    let event = normalize(&raw, 1.0, ms(5)).unwrap();

    assert_eq!(event.device, DeviceKind::Controller(2));
    assert_eq!(
        event.action,
        Action::AxisChange {
            axis: Axis::LeftStickX,
            value: -0.5
        }
    );
}

/// WHAT: Payloads reported by the wrong device are malformed
/// WHY: A keyboard cannot press a gamepad button
#[test]
fn given_device_kind_mismatch_when_normalizing_then_malformed_input_error() {
    let raw = RawEvent {
        at: Instant::now(),
        device: RawDevice::Keyboard,
        kind: RawKind::PadPress(PadButton::Start),
    };

    assert!(matches!(
        normalize(&raw, 1.0, ms(0)),
        Err(CoreError::MalformedInput { .. })
    ));
}

/// WHAT: Wheel deltas must use wheel axes
/// WHY: Stick axes on the mouse would replay to the wrong device
#[test]
fn given_wheel_on_stick_axis_when_normalizing_then_malformed_input_error() {
    let raw = RawEvent {
        at: Instant::now(),
        device: RawDevice::Mouse,
        kind: RawKind::Wheel {
            axis: Axis::RightStickY,
            delta: 1.0,
        },
    };

    assert!(matches!(
        normalize(&raw, 1.0, ms(0)),
        Err(CoreError::MalformedInput { .. })
    ));
}

/// WHAT: Non-finite coordinates and bad scales are rejected
/// WHY: NaN positions cannot be replayed
#[test]
fn given_nan_position_or_zero_scale_when_normalizing_then_malformed_input_error() {
    let nan = mouse_move(Instant::now(), f64::NAN, 1.0);
    let fine = mouse_move(Instant::now(), 1.0, 1.0);

    assert!(normalize(&nan, 1.0, ms(0)).is_err());
    assert!(normalize(&fine, 0.0, ms(0)).is_err());
    assert!(normalize(&fine, -1.0, ms(0)).is_err());
}

/// WHAT: Key names resolve case-insensitively, with short forms
/// WHY: Hand-written chords should not need exact code names
#[test]
fn given_key_names_when_looking_up_then_codes_resolved() {
    assert_eq!(KeyCode::from_name("KeyS"), Some(KeyCode::KeyS));
    assert_eq!(KeyCode::from_name("keys"), Some(KeyCode::KeyS));
    assert_eq!(KeyCode::from_name("s"), Some(KeyCode::KeyS));
    assert_eq!(KeyCode::from_name("7"), Some(KeyCode::Digit7));
    assert_eq!(KeyCode::from_name("esc"), Some(KeyCode::Escape));
    assert_eq!(KeyCode::from_name("Return"), Some(KeyCode::Enter));
    assert_eq!(KeyCode::from_name("NotAKey"), None);
    assert_eq!(KeyCode::Other(99).name(), None);
    assert_eq!(KeyCode::Enter.to_string(), "Enter");
}
