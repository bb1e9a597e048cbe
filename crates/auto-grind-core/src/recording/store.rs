use crate::recording::Recording;

use std::time::Instant;

use tracing::{debug, info};

/// Holds the last finalized recording between sessions.
///
/// The in-progress recording lives in the capture listener and the one being
/// replayed lives on the playback thread; the store only owns a recording
/// while neither of them does.
#[derive(Debug, Default)]
pub struct RecordingStore {
    finalized: Option<Finalized>,
}

#[derive(Debug)]
struct Finalized {
    recording: Recording,
    finalized_at: Instant,
}

impl RecordingStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `recording` as the latest finalized one, replacing any previous.
    pub fn finalize(&mut self, recording: Recording, finalized_at: Instant) {
        info!(
            event_count = recording.len(),
            duration_ms = recording.duration().as_millis(),
            append_count = recording.append_count,
            "Recording finalized"
        );
        self.finalized = Some(Finalized {
            recording,
            finalized_at,
        });
    }

    /// Put back a recording that was lent out by [`RecordingStore::take`].
    pub fn restore(&mut self, recording: Recording, finalized_at: Instant) {
        debug!(event_count = recording.len(), "Recording returned to store");
        self.finalized = Some(Finalized {
            recording,
            finalized_at,
        });
    }

    /// Keep a recording loaded from disk, treating now as its finalize time.
    pub fn install(&mut self, recording: Recording) {
        debug!(event_count = recording.len(), "Recording installed");
        self.finalized = Some(Finalized {
            recording,
            finalized_at: Instant::now(),
        });
    }

    /// The latest finalized recording and when it was finalized.
    pub fn latest(&self) -> Option<(&Recording, Instant)> {
        self.finalized
            .as_ref()
            .map(|f| (&f.recording, f.finalized_at))
    }

    /// Move the latest recording out, e.g. into the playback thread.
    ///
    /// Returns the finalize instant too so it can be put back unchanged.
    pub fn take(&mut self) -> Option<(Recording, Instant)> {
        self.finalized
            .take()
            .map(|f| (f.recording, f.finalized_at))
    }

    /// Hand the latest recording to persistence, releasing the store's copy.
    pub fn take_for_save(&mut self) -> Option<Recording> {
        self.take().map(|(recording, _)| recording)
    }

    /// Whether a finalized recording is available.
    pub fn has_recording(&self) -> bool {
        self.finalized.is_some()
    }
}
