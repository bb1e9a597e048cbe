//! Emulated devices backed by enigo.
//!
//! Mouse and keyboard actions are synthesized through the OS input APIs.
//! Controllers replay through ViGEmBus on Windows. Elsewhere there is no
//! gamepad emulation driver, so controller slots only report failures.

use crate::{
    InputGuard,
    keymap::{key_to_enigo, mouse_button_to_enigo},
};

use auto_grind_core::{
    Action, Axis, Button, DeviceSinks, InputSink, MAX_CONTROLLERS, SinkError, SinkFactory,
};

use enigo::{Coordinate, Direction, Mouse};
use tracing::{info, instrument};

/// Opens enigo-backed sinks on the playback thread.
#[derive(Debug, Default)]
pub struct EnigoSinkFactory;

impl SinkFactory for EnigoSinkFactory {
    #[instrument(skip(self))]
    fn open(&self) -> Result<DeviceSinks, SinkError> {
        let mouse = InputGuard::new().map_err(|e| SinkError(e.to_string()))?;
        let keyboard = InputGuard::new().map_err(|e| SinkError(e.to_string()))?;

        let sinks = (1..=MAX_CONTROLLERS).fold(
            DeviceSinks::new(
                Box::new(MouseSink { guard: mouse }),
                Box::new(KeyboardSink { guard: keyboard }),
            ),
            |sinks, index| sinks.with_controller(index, controller_sink(index)),
        );

        info!("Emulated devices opened");
        Ok(sinks)
    }
}

#[cfg(windows)]
fn controller_sink(index: u8) -> Box<dyn InputSink> {
    Box::new(crate::virtual_pad::ViGEmControllerSink::new(index))
}

#[cfg(not(windows))]
fn controller_sink(_index: u8) -> Box<dyn InputSink> {
    Box::new(UnavailableControllerSink)
}

/// Pointer, buttons and wheel.
pub struct MouseSink {
    guard: InputGuard,
}

impl InputSink for MouseSink {
    fn emit(&mut self, action: &Action) -> Result<(), SinkError> {
        match action {
            Action::Move { x, y } => self
                .guard
                .enigo_mut()
                .move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs)
                .map_err(|e| SinkError(e.to_string())),
            Action::ButtonDown(Button::Mouse(button)) => {
                let button = mouse_button_to_enigo(*button)
                    .ok_or_else(|| SinkError(format!("Unsupported mouse button {:?}", button)))?;
                self.guard
                    .button(button, Direction::Press)
                    .map_err(|e| SinkError(e.to_string()))
            }
            Action::ButtonUp(Button::Mouse(button)) => {
                let button = mouse_button_to_enigo(*button)
                    .ok_or_else(|| SinkError(format!("Unsupported mouse button {:?}", button)))?;
                self.guard
                    .button(button, Direction::Release)
                    .map_err(|e| SinkError(e.to_string()))
            }
            Action::AxisChange { axis, value } => {
                // rdev reports upward scroll as positive, enigo scrolls down.
                let (axis, length) = match axis {
                    Axis::WheelY => (enigo::Axis::Vertical, -value.round() as i32),
                    Axis::WheelX => (enigo::Axis::Horizontal, value.round() as i32),
                    other => return Err(SinkError(format!("{:?} is not a mouse axis", other))),
                };
                self.guard
                    .enigo_mut()
                    .scroll(length, axis)
                    .map_err(|e| SinkError(e.to_string()))
            }
            other => Err(SinkError(format!("Not a mouse action: {:?}", other))),
        }
    }
}

/// Keyboard keys, typed by physical position on a US layout.
pub struct KeyboardSink {
    guard: InputGuard,
}

impl InputSink for KeyboardSink {
    fn emit(&mut self, action: &Action) -> Result<(), SinkError> {
        let (key, direction) = match action {
            Action::ButtonDown(Button::Key(key)) => (*key, Direction::Press),
            Action::ButtonUp(Button::Key(key)) => (*key, Direction::Release),
            other => return Err(SinkError(format!("Not a keyboard action: {:?}", other))),
        };

        let enigo_key = key_to_enigo(key)
            .ok_or_else(|| SinkError(format!("Key {} cannot be emulated", key)))?;
        self.guard
            .key(enigo_key, direction)
            .map_err(|e| SinkError(e.to_string()))
    }
}

/// Stand-in for a gamepad slot with no emulation driver.
#[cfg(not(windows))]
pub struct UnavailableControllerSink;

#[cfg(not(windows))]
impl InputSink for UnavailableControllerSink {
    fn emit(&mut self, _action: &Action) -> Result<(), SinkError> {
        Err(SinkError(
            "No gamepad emulation driver is available".to_string(),
        ))
    }

    fn replaces_physical_device(&self) -> bool {
        false
    }
}
