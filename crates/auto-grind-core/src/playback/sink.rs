//! Emulated-device surface consumed by the playback engine.

use crate::{
    event::{Action, DeviceKind, MAX_CONTROLLERS},
    playback::{PlaybackReport, PlaybackWarning},
};

use std::fmt;

/// Error reported by a sink that could not emit an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError(pub String);

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SinkError {}

/// Virtual input device driven by synthetic commands.
pub trait InputSink {
    /// Emit one denormalized action.
    fn emit(&mut self, action: &Action) -> Result<(), SinkError>;

    /// Whether the target sees this sink as the physical device it stands in
    /// for. Emulated gamepads are often enumerated as an extra controller
    /// instead, in which case replayed input may drive the wrong player.
    fn replaces_physical_device(&self) -> bool {
        true
    }
}

/// One sink per device kind.
pub struct DeviceSinks {
    mouse: Box<dyn InputSink>,
    keyboard: Box<dyn InputSink>,
    controllers: [Option<Box<dyn InputSink>>; MAX_CONTROLLERS as usize],
}

impl DeviceSinks {
    /// Sinks for mouse and keyboard, with no controllers attached.
    pub fn new(mouse: Box<dyn InputSink>, keyboard: Box<dyn InputSink>) -> Self {
        Self {
            mouse,
            keyboard,
            controllers: std::array::from_fn(|_| None),
        }
    }

    /// Attach a sink for the 1-based controller `index`. Out-of-range
    /// indices are ignored.
    pub fn with_controller(mut self, index: u8, sink: Box<dyn InputSink>) -> Self {
        if let Some(slot) = usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.controllers.get_mut(i))
        {
            *slot = Some(sink);
        }
        self
    }

    /// Sink events from `device` go to.
    pub fn sink_for(&mut self, device: DeviceKind) -> Option<&mut Box<dyn InputSink>> {
        match device {
            DeviceKind::Mouse => Some(&mut self.mouse),
            DeviceKind::Keyboard => Some(&mut self.keyboard),
            DeviceKind::Controller(index) => usize::from(index)
                .checked_sub(1)
                .and_then(|i| self.controllers.get_mut(i))
                .and_then(Option::as_mut),
        }
    }

    /// Whether controller `index` has a sink that overrides the physical pad.
    pub fn controller_replaces_physical(&self, index: u8) -> bool {
        usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.controllers.get(i))
            .and_then(Option::as_ref)
            .is_some_and(|sink| sink.replaces_physical_device())
    }
}

/// Opens the sinks for one playback run.
///
/// Called on the playback thread, since platform input handles are often
/// not `Send`.
pub trait SinkFactory: Send + Sync {
    /// Open a fresh set of sinks.
    fn open(&self) -> Result<DeviceSinks, SinkError>;
}

/// Receives playback notices on the playback thread.
pub trait PlaybackObserver: Send + Sync {
    /// A non-fatal warning the user should see.
    fn warning(&self, _warning: &PlaybackWarning) {}

    /// Playback ended, either at the last event or by cancellation.
    fn finished(&self, report: &PlaybackReport);
}
