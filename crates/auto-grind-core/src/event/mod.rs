mod key;
mod model;
mod raw;

pub use {
    key::{KeyCode, Modifier, Modifiers, MouseButton, PadButton},
    model::{Action, Axis, Button, DeviceKind, Event, MAX_CONTROLLERS},
    raw::{RawDevice, RawEvent, RawKind, denormalize, normalize},
};
