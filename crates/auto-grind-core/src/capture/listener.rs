use crate::{
    EngineConfig,
    event::{Action, Button, Modifiers, RawDevice, RawEvent, RawKind, normalize},
    recording::Recording,
    session::{ChordTable, SessionState},
};

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument, trace, warn};

/// What a new capture builds on.
#[derive(Debug)]
pub enum CaptureBase {
    /// Start an empty recording; the first captured event lands at zero.
    Fresh,
    /// Extend a finalized recording. The new segment continues from its last
    /// timestamp plus the real time elapsed since `finalized_at`.
    Append {
        /// Copy of the finalized recording to extend.
        recording: Recording,
        /// When that recording was finalized.
        finalized_at: Instant,
    },
    /// Continue a replay that was cut short: `prefix` holds the events that
    /// were already emitted and capture resumes at `elapsed`.
    Resume {
        /// Events emitted before playback stopped.
        prefix: Recording,
        /// Playback position when it stopped.
        elapsed: Duration,
    },
}

/// Fate of one raw event handed to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDecision {
    /// Appended to the recording.
    Captured,
    /// No capture is running.
    Inactive,
    /// Part of a hotkey chord.
    Chord,
    /// The device kind is disabled in the configuration.
    Disabled,
    /// Release of a button pressed before this capture started.
    Orphan,
    /// Rejected by normalization.
    Malformed,
}

/// Turns raw device notifications into events on the in-progress recording.
///
/// Modifier state is tracked even while idle so the chord that starts a
/// capture is recognised from its first key.
pub struct CaptureListener {
    config: EngineConfig,
    chords: Arc<ChordTable>,
    modifiers: Modifiers,
    active: Option<ActiveCapture>,
}

struct ActiveCapture {
    recording: Recording,
    /// Timestamp the segment starts from.
    offset: Duration,
    /// Instant matching `offset`; `None` until the first event of a fresh capture.
    origin: Option<Instant>,
    appending: bool,
    segment_events: usize,
    pressed: HashSet<Button>,
    dropped: usize,
}

impl CaptureListener {
    /// Listener filtering by `config` and ignoring the keys of `chords`.
    pub fn new(config: EngineConfig, chords: Arc<ChordTable>) -> Self {
        Self {
            config,
            chords,
            modifiers: Modifiers::NONE,
            active: None,
        }
    }

    /// Bind a recording and begin capturing. Replaces any running capture.
    #[instrument(skip(self, base))]
    pub fn start(&mut self, base: CaptureBase, now: Instant) {
        if self.active.is_some() {
            warn!("Capture restarted while active, previous capture dropped");
        }

        let capture = match base {
            CaptureBase::Fresh => ActiveCapture::new(Recording::new(), Duration::ZERO, None, false),
            CaptureBase::Append {
                recording,
                finalized_at,
            } => {
                let offset = recording.duration();
                ActiveCapture::new(recording, offset, Some(finalized_at), true)
            }
            CaptureBase::Resume { prefix, elapsed } if prefix.is_empty() => {
                debug!(elapsed_ms = elapsed.as_millis(), "Nothing replayed yet, starting fresh");
                ActiveCapture::new(Recording::new(), Duration::ZERO, None, false)
            }
            CaptureBase::Resume { prefix, elapsed } => {
                let offset = elapsed.max(prefix.duration());
                ActiveCapture::new(prefix, offset, Some(now), false)
            }
        };

        info!(
            base_events = capture.recording.len(),
            offset_ms = capture.offset.as_millis(),
            appending = capture.appending,
            "Capture started"
        );
        self.active = Some(capture);
    }

    /// Feed one raw notification from a device hook.
    pub fn on_raw_event(&mut self, raw: &RawEvent) -> CaptureDecision {
        if let Some((key, pressed)) = raw.key() {
            if let Some(modifier) = key.modifier() {
                self.modifiers.set(modifier, pressed);
            }
        }

        let Some(capture) = self.active.as_mut() else {
            return CaptureDecision::Inactive;
        };

        if let RawKind::KeyPress(key) = raw.kind {
            let state = if capture.appending {
                SessionState::RecordingAppend
            } else {
                SessionState::Recording
            };
            if self.chords.is_hotkey_in(self.modifiers, key, state) {
                trace!(key = %key, "Chord key ignored");
                return CaptureDecision::Chord;
            }
        }

        let enabled = match raw.device {
            RawDevice::Mouse => self.config.enable_mouse,
            RawDevice::Keyboard => self.config.enable_keyboard,
            RawDevice::Controller(_) => self.config.enable_controller,
        };
        if !enabled {
            return CaptureDecision::Disabled;
        }

        let origin = capture.origin.unwrap_or(raw.at);
        let timestamp = capture.offset + raw.at.saturating_duration_since(origin);

        let event = match normalize(raw, self.config.screen_scale, timestamp) {
            Ok(event) => event,
            Err(e) => {
                capture.dropped += 1;
                warn!(error = %e, "Dropping malformed input");
                return CaptureDecision::Malformed;
            }
        };

        match event.action {
            Action::ButtonDown(button) => {
                capture.pressed.insert(button);
            }
            Action::ButtonUp(button) => {
                if !capture.pressed.remove(&button) {
                    trace!(?button, "Release without captured press ignored");
                    return CaptureDecision::Orphan;
                }
            }
            _ => {}
        }

        capture.origin = Some(origin);
        capture.segment_events += 1;
        capture.recording.push(event);
        CaptureDecision::Captured
    }

    /// Finalize the capture and return the now-immutable recording.
    ///
    /// Returns `None` when no capture was running.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> Option<Recording> {
        let capture = self.active.take()?;
        let mut recording = capture.recording;
        if capture.appending && capture.segment_events > 0 {
            recording.append_count += 1;
        }

        info!(
            event_count = recording.len(),
            segment_events = capture.segment_events,
            dropped = capture.dropped,
            "Capture stopped"
        );
        Some(recording)
    }

    /// Drop the running capture without keeping anything.
    #[instrument(skip(self))]
    pub fn discard(&mut self) {
        if let Some(capture) = self.active.take() {
            info!(segment_events = capture.segment_events, "Capture discarded");
        }
    }

    /// Whether a capture is running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Modifier keys currently held, as seen by the hooks.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl ActiveCapture {
    fn new(recording: Recording, offset: Duration, origin: Option<Instant>, appending: bool) -> Self {
        let pressed = held_buttons(&recording);
        Self {
            recording,
            offset,
            origin,
            appending,
            segment_events: 0,
            pressed,
            dropped: 0,
        }
    }
}

/// Buttons a recording leaves pressed at its end.
fn held_buttons(recording: &Recording) -> HashSet<Button> {
    let mut held = HashSet::new();
    for event in recording.events() {
        match event.action {
            Action::ButtonDown(b) => {
                held.insert(b);
            }
            Action::ButtonUp(b) => {
                held.remove(&b);
            }
            _ => {}
        }
    }
    held
}
