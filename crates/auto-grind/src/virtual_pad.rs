//! Virtual Xbox 360 controllers.
//!
//! On Windows each controller slot replays through a ViGEmBus target that
//! is plugged in on its first event. The bus adds a new pad next to the
//! physical one instead of taking its place, so the identity warning still
//! applies. Without the driver every emission fails and playback carries on
//! with the other devices.

#![cfg_attr(not(windows), allow(dead_code))]

use crate::keymap::{pad_button_bits, stick_value, trigger_value};

use auto_grind_core::{Action, Axis, Button, SinkError};

/// Full input report of one Xbox 360 pad, in XInput units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadReport {
    /// Pressed buttons as XInput `wButtons` bits.
    pub buttons: u16,
    /// Left trigger, 0 to 255.
    pub left_trigger: u8,
    /// Right trigger, 0 to 255.
    pub right_trigger: u8,
    /// Left stick X.
    pub thumb_lx: i16,
    /// Left stick Y, up is positive.
    pub thumb_ly: i16,
    /// Right stick X.
    pub thumb_rx: i16,
    /// Right stick Y, up is positive.
    pub thumb_ry: i16,
}

impl PadReport {
    /// Fold one controller action into the report.
    ///
    /// Returns whether anything changed, so unchanged reports need not be
    /// sent to the driver.
    pub fn apply(&mut self, action: &Action) -> Result<bool, SinkError> {
        let before = *self;
        match action {
            Action::ButtonDown(Button::Pad(button)) => self.buttons |= pad_button_bits(*button),
            Action::ButtonUp(Button::Pad(button)) => self.buttons &= !pad_button_bits(*button),
            Action::AxisChange { axis, value } => match axis {
                Axis::LeftStickX => self.thumb_lx = stick_value(*value),
                Axis::LeftStickY => self.thumb_ly = stick_value(*value),
                Axis::RightStickX => self.thumb_rx = stick_value(*value),
                Axis::RightStickY => self.thumb_ry = stick_value(*value),
                Axis::LeftTrigger => self.left_trigger = trigger_value(*value),
                Axis::RightTrigger => self.right_trigger = trigger_value(*value),
                Axis::WheelX | Axis::WheelY => {
                    return Err(SinkError(format!("{:?} is not a gamepad axis", axis)));
                }
            },
            other => return Err(SinkError(format!("Not a gamepad action: {:?}", other))),
        }
        Ok(*self != before)
    }
}

#[cfg(windows)]
pub use vigem::ViGEmControllerSink;

#[cfg(windows)]
mod vigem {
    use super::PadReport;

    use auto_grind_core::{Action, InputSink, SinkError};

    use tracing::{debug, info, warn};
    use vigem_client::{Client, TargetId, XButtons, XGamepad, Xbox360Wired};

    enum Target {
        NotPlugged,
        Ready(Xbox360Wired<Client>),
        Failed(String),
    }

    /// One controller slot backed by a ViGEmBus Xbox 360 target.
    pub struct ViGEmControllerSink {
        slot: u8,
        target: Target,
        report: PadReport,
    }

    impl ViGEmControllerSink {
        /// Sink for `slot`; nothing is plugged in until the first event.
        pub fn new(slot: u8) -> Self {
            Self {
                slot,
                target: Target::NotPlugged,
                report: PadReport::default(),
            }
        }

        fn target(&mut self) -> Result<&mut Xbox360Wired<Client>, SinkError> {
            if let Target::NotPlugged = self.target {
                self.target = match plug_in() {
                    Ok(target) => {
                        info!(slot = self.slot, "Virtual controller plugged in");
                        Target::Ready(target)
                    }
                    Err(reason) => {
                        warn!(slot = self.slot, %reason, "Virtual controller unavailable");
                        Target::Failed(reason)
                    }
                };
            }
            match &mut self.target {
                Target::Ready(target) => Ok(target),
                Target::Failed(reason) => Err(SinkError(reason.clone())),
                Target::NotPlugged => Err(SinkError("Virtual controller not plugged in".into())),
            }
        }
    }

    fn plug_in() -> Result<Xbox360Wired<Client>, String> {
        let client =
            Client::connect().map_err(|e| format!("Failed to connect to ViGEmBus: {:?}", e))?;
        let mut target = Xbox360Wired::new(client, TargetId::XBOX360_WIRED);
        target
            .plugin()
            .map_err(|e| format!("Failed to plug in virtual controller: {:?}", e))?;
        target
            .wait_ready()
            .map_err(|e| format!("Virtual controller never became ready: {:?}", e))?;
        Ok(target)
    }

    fn gamepad(report: &PadReport) -> XGamepad {
        XGamepad {
            buttons: XButtons {
                raw: report.buttons,
            },
            left_trigger: report.left_trigger,
            right_trigger: report.right_trigger,
            thumb_lx: report.thumb_lx,
            thumb_ly: report.thumb_ly,
            thumb_rx: report.thumb_rx,
            thumb_ry: report.thumb_ry,
        }
    }

    impl InputSink for ViGEmControllerSink {
        fn emit(&mut self, action: &Action) -> Result<(), SinkError> {
            let mut report = self.report;
            if !report.apply(action)? {
                return Ok(());
            }
            self.target()?
                .update(&gamepad(&report))
                .map_err(|e| SinkError(format!("Controller update failed: {:?}", e)))?;
            self.report = report;
            Ok(())
        }

        fn replaces_physical_device(&self) -> bool {
            false
        }
    }

    impl Drop for ViGEmControllerSink {
        fn drop(&mut self) {
            if let Target::Ready(target) = &mut self.target {
                if self.report != PadReport::default() {
                    debug!(slot = self.slot, "Releasing virtual controller input");
                    let _ = target.update(&XGamepad::default());
                }
            }
        }
    }
}
