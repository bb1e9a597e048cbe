//! OS input hooks.
//!
//! Keyboard and mouse come from a global rdev listener, gamepads from a gilrs
//! poll loop. Both run on their own threads and forward [`RawEvent`]s to the
//! app with `try_send`: a full queue drops the event rather than stalling
//! the OS hook.

use crate::{
    AppCommand, AppError, AppResult,
    keymap::{
        key_from_rdev, mouse_button_from_rdev, pad_axis_from_gilrs, pad_button_from_gilrs,
        trigger_axis_from_gilrs,
    },
};

use auto_grind_core::{Axis, RawDevice, RawEvent, RawKind};

use std::{panic::Location, thread, time::Duration};

use error_location::ErrorLocation;
use gilrs::{GamepadId, Gilrs};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, trace, warn};

/// Raw events for one rdev notification. Wheel notifications can carry
/// both axes at once.
pub(crate) fn raw_events_from_rdev(event_type: &rdev::EventType) -> Vec<RawEvent> {
    use rdev::EventType;

    match event_type {
        EventType::KeyPress(key) => vec![RawEvent::now(
            RawDevice::Keyboard,
            RawKind::KeyPress(key_from_rdev(*key)),
        )],
        EventType::KeyRelease(key) => vec![RawEvent::now(
            RawDevice::Keyboard,
            RawKind::KeyRelease(key_from_rdev(*key)),
        )],
        EventType::ButtonPress(button) => vec![RawEvent::now(
            RawDevice::Mouse,
            RawKind::ButtonPress(mouse_button_from_rdev(*button)),
        )],
        EventType::ButtonRelease(button) => vec![RawEvent::now(
            RawDevice::Mouse,
            RawKind::ButtonRelease(mouse_button_from_rdev(*button)),
        )],
        EventType::MouseMove { x, y } => vec![RawEvent::now(
            RawDevice::Mouse,
            RawKind::MouseMove { x: *x, y: *y },
        )],
        EventType::Wheel { delta_x, delta_y } => [(Axis::WheelX, *delta_x), (Axis::WheelY, *delta_y)]
            .into_iter()
            .filter(|(_, delta)| *delta != 0)
            .map(|(axis, delta)| {
                RawEvent::now(
                    RawDevice::Mouse,
                    RawKind::Wheel {
                        axis,
                        delta: delta as f64,
                    },
                )
            })
            .collect(),
    }
}

/// Start the global keyboard and mouse listener.
///
/// rdev offers no way to stop its listener, so the thread lives until the
/// process exits. It stops forwarding once the app side of the channel is
/// closed.
#[track_caller]
#[instrument(skip(command_tx))]
pub(crate) fn spawn_keyboard_mouse_hook(command_tx: mpsc::Sender<AppCommand>) -> AppResult<()> {
    thread::Builder::new()
        .name("input-hook".to_string())
        .spawn(move || {
            info!("Keyboard and mouse hook started");
            let result = rdev::listen(move |event| {
                for raw in raw_events_from_rdev(&event.event_type) {
                    forward(&command_tx, raw);
                }
            });
            if let Err(e) = result {
                error!(error = ?e, "Keyboard and mouse hook failed");
            }
        })
        .map_err(|e| AppError::InputHookFailed {
            reason: format!("Failed to spawn input hook thread: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}

/// Start polling gamepads every `interval` until shutdown.
#[track_caller]
#[instrument(skip(command_tx, shutdown_rx))]
pub(crate) fn spawn_controller_poller(
    interval: Duration,
    command_tx: mpsc::Sender<AppCommand>,
    shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    thread::Builder::new()
        .name("controller-poller".to_string())
        .spawn(move || {
            let mut gilrs = match Gilrs::new() {
                Ok(gilrs) => gilrs,
                Err(e) => {
                    error!(error = %e, "Gamepad backend unavailable, controllers not captured");
                    return;
                }
            };

            let mut slots = ControllerSlots::default();
            for (id, gamepad) in gilrs.gamepads() {
                let slot = slots.slot(id);
                info!(slot, name = gamepad.name(), "Gamepad connected");
            }

            while !*shutdown_rx.borrow() {
                while let Some(event) = gilrs.next_event() {
                    if let Some(raw) = slots.raw_event(event.id, &event.event) {
                        forward(&command_tx, raw);
                    }
                }
                thread::sleep(interval);
            }
            debug!("Controller poller stopped");
        })
        .map_err(|e| AppError::InputHookFailed {
            reason: format!("Failed to spawn controller poller thread: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}

fn forward(command_tx: &mpsc::Sender<AppCommand>, raw: RawEvent) {
    match command_tx.try_send(AppCommand::Input(raw)) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => trace!("Input queue full, event dropped"),
        Err(mpsc::error::TrySendError::Closed(_)) => {}
    }
}

/// Assigns 1-based controller slots in order of first appearance.
///
/// A fifth pad gets slot 5, which the engine rejects as malformed input.
#[derive(Debug, Default)]
pub(crate) struct ControllerSlots {
    ids: Vec<GamepadId>,
}

impl ControllerSlots {
    /// Slot for `id`, assigning the next free one on first sight.
    pub(crate) fn slot(&mut self, id: GamepadId) -> u32 {
        let index = match self.ids.iter().position(|known| *known == id) {
            Some(index) => index,
            None => {
                self.ids.push(id);
                self.ids.len() - 1
            }
        };
        u32::try_from(index + 1).unwrap_or(u32::MAX)
    }

    fn raw_event(&mut self, id: GamepadId, event: &gilrs::EventType) -> Option<RawEvent> {
        use gilrs::EventType;

        let kind = match *event {
            EventType::ButtonPressed(button, _) => RawKind::PadPress(pad_button_from_gilrs(button)?),
            EventType::ButtonReleased(button, _) => {
                RawKind::PadRelease(pad_button_from_gilrs(button)?)
            }
            EventType::ButtonChanged(button, value, _) => RawKind::PadAxis {
                axis: trigger_axis_from_gilrs(button)?,
                value: f64::from(value),
            },
            EventType::AxisChanged(axis, value, _) => RawKind::PadAxis {
                axis: pad_axis_from_gilrs(axis)?,
                value: f64::from(value),
            },
            EventType::Connected => {
                let slot = self.slot(id);
                info!(slot, "Gamepad connected");
                return None;
            }
            EventType::Disconnected => {
                warn!(slot = self.slot(id), "Gamepad disconnected");
                return None;
            }
            _ => return None,
        };

        Some(RawEvent::now(RawDevice::Controller(self.slot(id)), kind))
    }
}
