use crate::{
    CoreError, CoreResult, EngineConfig,
    capture::{CaptureBase, CaptureDecision, CaptureListener},
    event::{RawEvent, RawKind},
    playback::{PlaybackEngine, PlaybackHandle, PlaybackObserver, PlaybackReport, SinkFactory},
    recording::{Recording, RecordingStore},
    session::{Chord, ChordTable, SessionState, Trigger},
};

use std::{panic::Location, sync::Arc, time::Instant};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Result of handing a trigger to the session.
#[derive(Debug)]
pub enum Outcome {
    /// Not valid for the current state; nothing changed.
    Ignored,
    /// The state changed.
    Transitioned {
        /// State before the trigger.
        from: SessionState,
        /// State after the trigger.
        to: SessionState,
    },
    /// The last recording was released for persistence.
    Save(Recording),
}

/// What the session did with one raw input event.
#[derive(Debug)]
pub enum InputOutcome {
    /// Handed to the capture listener only.
    Capture(CaptureDecision),
    /// The event fired a trigger: a bare hotkey chord, or a take-over press
    /// during playback. A take-over press is also the first captured event.
    Trigger(CoreResult<Outcome>),
}

/// The hotkey state machine.
///
/// Owns the recording store, the capture listener and the running playback,
/// and guarantees at most one of capture and playback is active. Create one
/// per process and drive it from a single control loop.
pub struct Session {
    state: SessionState,
    chords: Arc<ChordTable>,
    store: RecordingStore,
    capture: CaptureListener,
    engine: PlaybackEngine,
    observer: Arc<dyn PlaybackObserver>,
    playback: Option<ActivePlayback>,
    take_over: bool,
}

struct ActivePlayback {
    handle: PlaybackHandle,
    finalized_at: Instant,
}

impl Session {
    /// Build the session in [`SessionState::Idle`] with an empty store.
    pub fn new(
        config: EngineConfig,
        chords: ChordTable,
        sinks: Arc<dyn SinkFactory>,
        observer: Arc<dyn PlaybackObserver>,
    ) -> Self {
        let chords = Arc::new(chords);
        info!(
            interval_ms = config.interval.as_millis(),
            screen_scale = config.screen_scale,
            "Session initialized"
        );
        Self {
            state: SessionState::Idle,
            take_over: config.take_over,
            engine: PlaybackEngine::new(config.screen_scale, sinks),
            capture: CaptureListener::new(config, Arc::clone(&chords)),
            chords,
            store: RecordingStore::new(),
            observer,
            playback: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Chord bindings in use.
    pub fn chords(&self) -> &ChordTable {
        &self.chords
    }

    /// The last finalized recording, if the store holds one.
    pub fn last_recording(&self) -> Option<&Recording> {
        self.store.latest().map(|(recording, _)| recording)
    }

    /// Events handled by the running playback.
    pub fn playback_progress(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.handle.progress())
    }

    /// Resolve a hotkey chord against the current state and apply it.
    pub fn handle_chord(&mut self, chord: &Chord) -> CoreResult<Outcome> {
        match self.chords.resolve(chord, self.state) {
            Some(trigger) => self.handle(trigger),
            None => {
                debug!(chord = %chord, state = %self.state, "Chord not valid in state");
                Ok(Outcome::Ignored)
            }
        }
    }

    /// Apply `trigger` at the current instant.
    pub fn handle(&mut self, trigger: Trigger) -> CoreResult<Outcome> {
        self.handle_at(trigger, Instant::now())
    }

    /// Apply `trigger` as if it happened at `now`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoPriorRecording`] when append, playback or save is
    /// requested with nothing finalized; the state stays [`SessionState::Idle`].
    #[track_caller]
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn handle_at(&mut self, trigger: Trigger, now: Instant) -> CoreResult<Outcome> {
        if !self.state.accepts(trigger) {
            debug!("Trigger ignored");
            return Ok(Outcome::Ignored);
        }

        let from = self.state;
        let to = match trigger {
            Trigger::StartRecord => {
                self.capture.start(CaptureBase::Fresh, now);
                SessionState::Recording
            }
            Trigger::StartRecordAppend => {
                let (recording, finalized_at) = self
                    .store
                    .latest()
                    .map(|(r, at)| (r.clone(), at))
                    .ok_or_else(no_prior_recording)?;
                self.capture.start(
                    CaptureBase::Append {
                        recording,
                        finalized_at,
                    },
                    now,
                );
                SessionState::RecordingAppend
            }
            Trigger::StartPlay => {
                let (recording, finalized_at) = self.store.take().ok_or_else(no_prior_recording)?;
                match self.engine.play(recording, Arc::clone(&self.observer)) {
                    Ok(handle) => {
                        self.playback = Some(ActivePlayback {
                            handle,
                            finalized_at,
                        });
                    }
                    Err(rejected) => {
                        self.store.restore(rejected.recording, finalized_at);
                        return Err(rejected.error);
                    }
                }
                SessionState::Playing
            }
            Trigger::StopRecord => {
                match self.capture.stop() {
                    Some(recording) if !recording.is_empty() => {
                        self.store.finalize(recording, now);
                    }
                    _ => info!("Nothing captured, previous recording kept"),
                }
                SessionState::Idle
            }
            Trigger::Discard => {
                self.capture.discard();
                SessionState::Idle
            }
            Trigger::StopPlay => {
                self.stop_playback();
                SessionState::Idle
            }
            Trigger::StopAndRecord => {
                let base = match self.stop_playback() {
                    Some(report) => {
                        let prefix = self
                            .store
                            .latest()
                            .map(|(r, _)| r.prefix(report.position()))
                            .unwrap_or_default();
                        CaptureBase::Resume {
                            prefix,
                            elapsed: report.elapsed,
                        }
                    }
                    None => CaptureBase::Fresh,
                };
                self.capture.start(base, now);
                SessionState::Recording
            }
            Trigger::Save => {
                let recording = self.store.take_for_save().ok_or_else(no_prior_recording)?;
                info!(event_count = recording.len(), "Recording released for saving");
                return Ok(Outcome::Save(recording));
            }
        };

        self.state = to;
        info!(from = %from, to = %to, "Session transition");
        Ok(Outcome::Transitioned { from, to })
    }

    /// Handle one raw device event from the input hooks.
    ///
    /// The event always reaches the capture listener, which tracks modifiers
    /// and records it while a capture runs. A key press then fires the bare
    /// chord valid in the current state, if there is one. While playing with
    /// take-over enabled, any other key press that is neither a hotkey nor
    /// the replay's own output stops the replay and resumes recording from
    /// there, starting with that press.
    pub fn on_raw_event(&mut self, raw: &RawEvent) -> InputOutcome {
        let decision = self.capture.on_raw_event(raw);

        let RawKind::KeyPress(key) = raw.kind else {
            return InputOutcome::Capture(decision);
        };
        let held = self.capture.modifiers();

        let chord = Chord::new(held, key);
        if chord.is_bare() {
            if let Some(trigger) = self.chords.resolve(&chord, self.state) {
                debug!(chord = %chord, ?trigger, "Hotkey matched on input stream");
                return InputOutcome::Trigger(self.handle_at(trigger, raw.at));
            }
        }

        if self.take_over
            && self.state == SessionState::Playing
            && !self.chords.is_chord(held, key)
            && !self.is_echo(raw)
        {
            info!(key = %key, "Key press during playback, taking over");
            let outcome = self.handle_at(Trigger::StopAndRecord, raw.at);
            if outcome.is_ok() {
                self.capture.on_raw_event(raw);
            }
            return InputOutcome::Trigger(outcome);
        }

        InputOutcome::Capture(decision)
    }

    fn is_echo(&self, raw: &RawEvent) -> bool {
        let RawKind::KeyPress(key) = raw.kind else {
            return false;
        };
        self.playback
            .as_ref()
            .is_some_and(|p| p.handle.is_echo(key, raw.at))
    }

    /// Handle the end of a playback run that was not stopped by a trigger.
    ///
    /// Safe to call at any time; returns the report when a finished run was
    /// collected and the session moved back to [`SessionState::Idle`].
    pub fn on_playback_finished(&mut self) -> Option<PlaybackReport> {
        if !self
            .playback
            .as_ref()
            .is_some_and(|p| p.handle.is_finished())
        {
            return None;
        }
        let report = self.collect_playback(false);
        if self.state == SessionState::Playing {
            info!(from = %self.state, to = %SessionState::Idle, "Playback finished");
            self.state = SessionState::Idle;
        }
        report
    }

    /// Put back a recording read from disk as the latest one.
    ///
    /// Refused unless idle, so it never races a capture or playback.
    pub fn load(&mut self, recording: Recording) -> bool {
        if self.state != SessionState::Idle {
            warn!(state = %self.state, "Recording load ignored outside idle");
            return false;
        }
        self.store.install(recording);
        true
    }

    /// Stop whatever is running. Call once before exit.
    #[instrument(skip(self))]
    pub fn teardown(mut self) {
        self.capture.discard();
        self.stop_playback();
        info!("Session torn down");
    }

    fn stop_playback(&mut self) -> Option<PlaybackReport> {
        self.collect_playback(true)
    }

    /// Join the playback thread and return the recording to the store.
    fn collect_playback(&mut self, cancel: bool) -> Option<PlaybackReport> {
        let active = self.playback.take()?;
        let result = if cancel {
            active.handle.stop()
        } else {
            active.handle.join()
        };
        match result {
            Ok(result) => {
                self.store.restore(result.recording, active.finalized_at);
                Some(result.report)
            }
            Err(e) => {
                error!(error = %e, "Playback thread lost, recording dropped");
                None
            }
        }
    }
}

#[track_caller]
fn no_prior_recording() -> CoreError {
    CoreError::NoPriorRecording {
        location: ErrorLocation::from(Location::caller()),
    }
}
