use crate::{
    CoreError, CoreResult,
    event::{
        Action, Axis, Button, DeviceKind, Event, KeyCode, MAX_CONTROLLERS, MouseButton, PadButton,
    },
};

use std::{panic::Location, time::Duration, time::Instant};

use error_location::ErrorLocation;

/// Device notification exactly as an input hook reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// When the hook observed the event.
    pub at: Instant,
    /// Reporting device, not yet validated.
    pub device: RawDevice,
    /// What the device reported.
    pub kind: RawKind,
}

/// Device identity as reported by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDevice {
    /// The system pointer.
    Mouse,
    /// The system keyboard.
    Keyboard,
    /// Gamepad slot, 1-based. Only `1..=4` are valid.
    Controller(u32),
}

/// Raw notification payload.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum RawKind {
    KeyPress(KeyCode),
    KeyRelease(KeyCode),
    ButtonPress(MouseButton),
    ButtonRelease(MouseButton),
    /// Pointer position in physical screen pixels.
    MouseMove { x: f64, y: f64 },
    /// Scroll delta on [`Axis::WheelX`] or [`Axis::WheelY`].
    Wheel { axis: Axis, delta: f64 },
    PadPress(PadButton),
    PadRelease(PadButton),
    /// Stick or trigger position on a gamepad axis.
    PadAxis { axis: Axis, value: f64 },
}

impl RawEvent {
    /// Build a raw event observed right now.
    pub fn now(device: RawDevice, kind: RawKind) -> Self {
        Self {
            at: Instant::now(),
            device,
            kind,
        }
    }

    /// Keyboard key carried by this event with its pressed state.
    pub fn key(&self) -> Option<(KeyCode, bool)> {
        match self.kind {
            RawKind::KeyPress(key) => Some((key, true)),
            RawKind::KeyRelease(key) => Some((key, false)),
            _ => None,
        }
    }
}

/// Convert a raw notification into a device-neutral [`Event`].
///
/// Pointer coordinates are divided by `screen_scale` so capture and replay
/// agree across display scaling. Deterministic and free of I/O.
///
/// # Errors
///
/// Returns [`CoreError::MalformedInput`] for an unknown controller index, a
/// payload that does not belong to the reporting device, a non-finite value,
/// or a non-positive `screen_scale`.
#[track_caller]
pub fn normalize(raw: &RawEvent, screen_scale: f64, timestamp: Duration) -> CoreResult<Event> {
    let device = match raw.device {
        RawDevice::Mouse => DeviceKind::Mouse,
        RawDevice::Keyboard => DeviceKind::Keyboard,
        RawDevice::Controller(index) => match u8::try_from(index) {
            Ok(i) if (1..=MAX_CONTROLLERS).contains(&i) => DeviceKind::Controller(i),
            _ => return Err(malformed(format!("unknown controller id {index}"))),
        },
    };

    let action = match (&device, &raw.kind) {
        (DeviceKind::Keyboard, RawKind::KeyPress(key)) => Action::ButtonDown(Button::Key(*key)),
        (DeviceKind::Keyboard, RawKind::KeyRelease(key)) => Action::ButtonUp(Button::Key(*key)),
        (DeviceKind::Mouse, RawKind::ButtonPress(b)) => Action::ButtonDown(Button::Mouse(*b)),
        (DeviceKind::Mouse, RawKind::ButtonRelease(b)) => Action::ButtonUp(Button::Mouse(*b)),
        (DeviceKind::Mouse, RawKind::MouseMove { x, y }) => {
            if !(screen_scale.is_finite() && screen_scale > 0.0) {
                return Err(malformed(format!("invalid screen scale {screen_scale}")));
            }
            if !(x.is_finite() && y.is_finite()) {
                return Err(malformed(format!("non-finite pointer position ({x}, {y})")));
            }
            Action::Move {
                x: x / screen_scale,
                y: y / screen_scale,
            }
        }
        (DeviceKind::Mouse, RawKind::Wheel { axis, delta }) if !axis.is_pad() => {
            finite(*delta)?;
            Action::AxisChange {
                axis: *axis,
                value: *delta,
            }
        }
        (DeviceKind::Controller(_), RawKind::PadPress(b)) => Action::ButtonDown(Button::Pad(*b)),
        (DeviceKind::Controller(_), RawKind::PadRelease(b)) => Action::ButtonUp(Button::Pad(*b)),
        (DeviceKind::Controller(_), RawKind::PadAxis { axis, value }) if axis.is_pad() => {
            finite(*value)?;
            Action::AxisChange {
                axis: *axis,
                value: *value,
            }
        }
        (device, kind) => {
            return Err(malformed(format!("{kind:?} is not valid for {device:?}")));
        }
    };

    Ok(Event {
        timestamp,
        device,
        action,
    })
}

/// Inverse of the coordinate normalization applied by [`normalize`].
pub fn denormalize(action: &Action, screen_scale: f64) -> Action {
    match action {
        Action::Move { x, y } => Action::Move {
            x: x * screen_scale,
            y: y * screen_scale,
        },
        other => other.clone(),
    }
}

#[track_caller]
fn finite(value: f64) -> CoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(malformed(format!("non-finite axis value {value}")))
    }
}

#[track_caller]
fn malformed(reason: String) -> CoreError {
    CoreError::MalformedInput {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
