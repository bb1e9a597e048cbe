use crate::{AppError, AppResult};

use std::panic::Location;

use enigo::{Button, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use error_location::ErrorLocation;
use tracing::debug;

/// RAII guard that guarantees emulated keys and buttons are released when
/// dropped.
///
/// Playback can be cancelled between a press and its release. Without the
/// guard the target application would be left with a stuck key.
///
/// Owns the `Enigo` instance so all synthetic input goes through it. On drop,
/// releases everything still held with best-effort semantics -- if a release
/// fails, the OS resets the state on the next physical press by the user.
pub struct InputGuard {
    enigo: Enigo,
    keys: Vec<Key>,
    buttons: Vec<Button>,
}

impl InputGuard {
    /// Open a new emulation connection with nothing held.
    #[track_caller]
    pub(crate) fn new() -> AppResult<Self> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| AppError::InputHookFailed {
                reason: format!("Failed to create Enigo: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            enigo,
            keys: Vec::new(),
            buttons: Vec::new(),
        })
    }

    /// Press or release `key`, remembering what is held.
    pub(crate) fn key(&mut self, key: Key, direction: Direction) -> enigo::InputResult<()> {
        self.enigo.key(key, direction)?;
        match direction {
            Direction::Press => {
                if !self.keys.contains(&key) {
                    self.keys.push(key);
                }
            }
            Direction::Release => self.keys.retain(|k| *k != key),
            Direction::Click => {}
        }
        Ok(())
    }

    /// Press or release mouse `button`, remembering what is held.
    pub(crate) fn button(&mut self, button: Button, direction: Direction) -> enigo::InputResult<()> {
        self.enigo.button(button, direction)?;
        match direction {
            Direction::Press => {
                if !self.buttons.contains(&button) {
                    self.buttons.push(button);
                }
            }
            Direction::Release => self.buttons.retain(|b| *b != button),
            Direction::Click => {}
        }
        Ok(())
    }

    /// Access the underlying Enigo for input that holds no state.
    pub(crate) fn enigo_mut(&mut self) -> &mut Enigo {
        &mut self.enigo
    }

    /// Keys and buttons currently held down.
    pub(crate) fn held(&self) -> usize {
        self.keys.len() + self.buttons.len()
    }
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        if self.held() > 0 {
            debug!(held = self.held(), "Releasing held emulated input");
        }
        for key in self.keys.drain(..).rev() {
            let _ = self.enigo.key(key, Direction::Release);
        }
        for button in self.buttons.drain(..).rev() {
            let _ = self.enigo.button(button, Direction::Release);
        }
    }
}
