use crate::event::DeviceKind;

use error_location::ErrorLocation;
use thiserror::Error;

/// Engine errors with source location tracking.
///
/// None of these are fatal: capture drops the offending event, playback moves
/// on to the next event, and refused transitions leave the session where it was.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Raw device event could not be turned into an [`Event`](crate::Event).
    #[error("Malformed input: {reason} {location}")]
    MalformedInput {
        /// Why the raw event was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Append, playback or save requested with no finalized recording.
    #[error("No finalized recording available {location}")]
    NoPriorRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An emulated device sink rejected a synthetic event.
    #[error("Device emission failed on {device:?}: {reason} {location}")]
    DeviceEmission {
        /// Device the event was addressed to.
        device: DeviceKind,
        /// Description reported by the sink.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The playback thread could not be spawned or joined.
    #[error("Playback thread error: {reason} {location}")]
    PlaybackThread {
        /// Description of the thread failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
