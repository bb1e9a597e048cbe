//! Auto-grind Core Library
//!
//! Input capture, timing and playback engine. Records mouse, keyboard and
//! gamepad input into a device-neutral timeline and replays it against
//! emulated devices with the same relative timing. A hotkey-driven
//! [`Session`] governs the transitions between idle, recording and playing.
//!
//! The crate makes no OS calls: hosts feed [`RawEvent`]s from their input
//! hooks and provide [`InputSink`]s for their emulated devices.
//!
//! # Example
//!
//! ```no_run
//! use auto_grind_core::{
//!     ChordTable, DeviceSinks, EngineConfig, PlaybackObserver, PlaybackReport, Session,
//!     SinkError, SinkFactory, Trigger,
//! };
//!
//! use std::sync::Arc;
//!
//! struct NoDevices;
//!
//! impl SinkFactory for NoDevices {
//!     fn open(&self) -> Result<DeviceSinks, SinkError> {
//!         Err(SinkError("no emulated devices".to_string()))
//!     }
//! }
//!
//! struct Log;
//!
//! impl PlaybackObserver for Log {
//!     fn finished(&self, report: &PlaybackReport) {
//!         println!("played {} events", report.emitted);
//!     }
//! }
//!
//! let mut session = Session::new(
//!     EngineConfig::default(),
//!     ChordTable::defaults(),
//!     Arc::new(NoDevices),
//!     Arc::new(Log),
//! );
//! session.handle(Trigger::StartRecord)?;
//! // ... feed every RawEvent from the hooks with session.on_raw_event(&raw) ...
//! session.handle(Trigger::StopRecord)?;
//! # Ok::<(), auto_grind_core::CoreError>(())
//! ```

mod capture;
mod config;
mod error;
mod event;
mod playback;
mod recording;
mod session;

pub use {
    capture::{CaptureBase, CaptureDecision, CaptureListener},
    config::EngineConfig,
    error::{CoreError, Result as CoreResult},
    event::{
        Action, Axis, Button, DeviceKind, Event, KeyCode, MAX_CONTROLLERS, Modifier, Modifiers,
        MouseButton, PadButton, RawDevice, RawEvent, RawKind, denormalize, normalize,
    },
    playback::{
        CancelToken, DeviceSinks, InputSink, PlaybackEngine, PlaybackHandle, PlaybackObserver,
        PlaybackRejected, PlaybackReport, PlaybackResult, PlaybackWarning, SinkError, SinkFactory,
        WaitOutcome,
    },
    recording::{Recording, RecordingStore},
    session::{
        Chord, ChordParseError, ChordTable, InputOutcome, Outcome, Session, SessionState, Trigger,
    },
};

#[cfg(test)]
mod tests;
