use crate::event::{KeyCode, MouseButton, PadButton};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Highest controller index a recording may address.
pub const MAX_CONTROLLERS: u8 = 4;

/// One captured input occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Offset since the start of the recording.
    pub timestamp: Duration,
    /// Device that produced the event.
    pub device: DeviceKind,
    /// What happened on the device.
    pub action: Action,
}

/// Device family an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// The system pointer.
    Mouse,
    /// The system keyboard.
    Keyboard,
    /// Gamepad with a 1-based index in `1..=4`.
    Controller(u8),
}

/// Polymorphic device action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A key or button went down.
    ButtonDown(Button),
    /// A key or button came up.
    ButtonUp(Button),
    /// Pointer moved to normalized coordinates.
    Move {
        /// Horizontal position divided by the screen scale.
        x: f64,
        /// Vertical position divided by the screen scale.
        y: f64,
    },
    /// An analog axis changed.
    AxisChange {
        /// Which axis.
        axis: Axis,
        /// New value, or scroll delta for the wheel axes.
        value: f64,
    },
}

/// Anything that can be pressed and released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Keyboard key.
    Key(KeyCode),
    /// Mouse button.
    Mouse(MouseButton),
    /// Gamepad button.
    Pad(PadButton),
}

/// Analog inputs.
///
/// Wheel axes carry scroll deltas; stick axes range over `[-1, 1]`;
/// trigger axes over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Axis {
    WheelX,
    WheelY,
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl Axis {
    /// Whether the axis belongs to a gamepad rather than the mouse wheel.
    pub fn is_pad(&self) -> bool {
        !matches!(self, Axis::WheelX | Axis::WheelY)
    }
}
