use crate::{
    CoreError, CoreResult,
    event::{Action, Button, DeviceKind, KeyCode, denormalize},
    playback::{
        CancelToken, DeviceSinks, PlaybackObserver, SinkFactory, WaitOutcome, echo::EchoLog,
    },
    recording::Recording,
};

use std::{
    collections::BTreeSet,
    fmt,
    panic::Location,
    sync::{
        Arc, mpsc,
        atomic::{AtomicUsize, Ordering},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Non-fatal condition surfaced to the user; never blocks playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackWarning {
    /// The emulated controller may show up as an additional pad rather than
    /// taking over the physical one, so its input can miss the intended
    /// player. Platform and driver constraint, not an engine fault.
    DeviceIdentityMismatch {
        /// 1-based controller index used by the recording.
        controller: u8,
    },
}

impl fmt::Display for PlaybackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackWarning::DeviceIdentityMismatch { controller } => write!(
                f,
                "Controller {controller} is replayed through an emulated pad that the game \
                 may treat as a second controller"
            ),
        }
    }
}

/// Outcome of one playback run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackReport {
    /// Events a sink accepted.
    pub emitted: usize,
    /// Events a sink rejected or had no sink.
    pub failed: usize,
    /// Time from playback start to the end of the run.
    pub elapsed: Duration,
    /// Whether the run was cut short by `stop`.
    pub cancelled: bool,
    /// Warnings raised before the first event.
    pub warnings: Vec<PlaybackWarning>,
}

impl PlaybackReport {
    /// Events already handled, emitted or failed. Everything before this
    /// index reached the sinks and stays done.
    pub fn position(&self) -> usize {
        self.emitted + self.failed
    }
}

/// Recording handed back by a finished run, with its report.
#[derive(Debug)]
pub struct PlaybackResult {
    /// The recording that was replayed.
    pub recording: Recording,
    /// What happened.
    pub report: PlaybackReport,
}

/// Playback could not start; the recording is handed back untouched.
#[derive(Debug)]
pub struct PlaybackRejected {
    /// Why playback did not start.
    pub error: CoreError,
    /// The recording that was to be replayed.
    pub recording: Recording,
}

/// Replays recordings against emulated devices with timing fidelity.
pub struct PlaybackEngine {
    screen_scale: f64,
    sinks: Arc<dyn SinkFactory>,
}

impl PlaybackEngine {
    /// Engine denormalizing pointer moves with `screen_scale`.
    pub fn new(screen_scale: f64, sinks: Arc<dyn SinkFactory>) -> Self {
        Self {
            screen_scale,
            sinks,
        }
    }

    /// Start replaying `recording` on a dedicated thread.
    ///
    /// Event `i` is emitted no earlier than `t_i` after the start. Deadlines
    /// are absolute, so emission time does not accumulate drift.
    ///
    /// # Errors
    ///
    /// Returns the recording inside [`PlaybackRejected`] when the thread
    /// cannot be spawned.
    #[track_caller]
    #[instrument(skip_all, fields(event_count = recording.len()))]
    pub fn play(
        &self,
        recording: Recording,
        observer: Arc<dyn PlaybackObserver>,
    ) -> Result<PlaybackHandle, PlaybackRejected> {
        let cancel = CancelToken::new();
        let progress = Arc::new(AtomicUsize::new(0));
        let echoes = EchoLog::default();
        let (recording_tx, recording_rx) = mpsc::channel::<Recording>();

        let run = PlaybackRun {
            sinks: Arc::clone(&self.sinks),
            screen_scale: self.screen_scale,
            cancel: cancel.clone(),
            progress: Arc::clone(&progress),
            echoes: echoes.clone(),
            observer,
        };

        // The recording is sent after the spawn so a failed spawn does not
        // take it down with the closure.
        let spawned = std::thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let recording = recording_rx.recv().unwrap_or_default();
                run.run(recording)
            });

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                return Err(PlaybackRejected {
                    error: CoreError::PlaybackThread {
                        reason: format!("Failed to spawn playback thread: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    },
                    recording,
                });
            }
        };

        if let Err(mpsc::SendError(recording)) = recording_tx.send(recording) {
            return Err(PlaybackRejected {
                error: CoreError::PlaybackThread {
                    reason: "Playback thread exited before receiving the recording".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                recording,
            });
        }

        info!("Playback started");

        Ok(PlaybackHandle {
            cancel,
            progress,
            echoes,
            thread,
        })
    }
}

/// Control over a running playback.
pub struct PlaybackHandle {
    cancel: CancelToken,
    progress: Arc<AtomicUsize>,
    echoes: EchoLog,
    thread: JoinHandle<PlaybackResult>,
}

impl PlaybackHandle {
    /// Cancel at the next suspension point and wait for the thread.
    ///
    /// Events already emitted are not undone.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(self) -> CoreResult<PlaybackResult> {
        self.cancel.cancel();
        self.join()
    }

    /// Wait for the run to end and take the recording back.
    #[track_caller]
    pub fn join(self) -> CoreResult<PlaybackResult> {
        self.thread.join().map_err(|_| CoreError::PlaybackThread {
            reason: "Playback thread panicked".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Whether the run has ended.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Events handled so far.
    pub fn progress(&self) -> usize {
        self.progress.load(Ordering::Acquire)
    }

    /// Whether a press of `key` an input hook saw at `seen` is this replay's
    /// own emission coming back through the hook.
    pub fn is_echo(&self, key: KeyCode, seen: Instant) -> bool {
        self.echoes.take(key, seen)
    }
}

struct PlaybackRun {
    sinks: Arc<dyn SinkFactory>,
    screen_scale: f64,
    cancel: CancelToken,
    progress: Arc<AtomicUsize>,
    echoes: EchoLog,
    observer: Arc<dyn PlaybackObserver>,
}

impl PlaybackRun {
    fn run(self, recording: Recording) -> PlaybackResult {
        let started_at = Instant::now();
        let mut report = PlaybackReport::default();

        let mut sinks = match self.sinks.open() {
            Ok(sinks) => sinks,
            Err(e) => {
                error!(error = %e, "Failed to open emulated devices, playback aborted");
                report.elapsed = started_at.elapsed();
                self.observer.finished(&report);
                return PlaybackResult { recording, report };
            }
        };

        report.warnings = identity_warnings(&recording, &sinks);
        for warning in &report.warnings {
            warn!(%warning, "Device identity mismatch");
            self.observer.warning(warning);
        }

        for event in recording.events() {
            if self.cancel.wait_until(started_at + event.timestamp) == WaitOutcome::Cancelled {
                report.cancelled = true;
                break;
            }

            let action = denormalize(&event.action, self.screen_scale);
            if let Action::ButtonDown(Button::Key(key)) = action {
                self.echoes.push(Instant::now(), key);
            }
            let emitted = match sinks.sink_for(event.device) {
                Some(sink) => sink.emit(&action).map_err(|e| e.0),
                None => Err("no sink attached".to_string()),
            };

            match emitted {
                Ok(()) => report.emitted += 1,
                Err(reason) => {
                    report.failed += 1;
                    let e = emission_error(event.device, reason);
                    warn!(error = %e, "Emission failed, continuing with next event");
                }
            }
            self.progress.store(report.position(), Ordering::Release);
        }

        report.elapsed = started_at.elapsed();
        info!(
            emitted = report.emitted,
            failed = report.failed,
            cancelled = report.cancelled,
            elapsed_ms = report.elapsed.as_millis(),
            "Playback ended"
        );
        self.observer.finished(&report);

        PlaybackResult { recording, report }
    }
}

#[track_caller]
fn emission_error(device: DeviceKind, reason: String) -> CoreError {
    CoreError::DeviceEmission {
        device,
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Warnings for every controller the recording drives whose sink will not
/// stand in for the physical pad.
fn identity_warnings(recording: &Recording, sinks: &DeviceSinks) -> Vec<PlaybackWarning> {
    let controllers: BTreeSet<u8> = recording
        .events()
        .iter()
        .filter_map(|e| match e.device {
            DeviceKind::Controller(index) => Some(index),
            _ => None,
        })
        .collect();

    debug!(controllers = ?controllers, "Controllers used by recording");

    controllers
        .into_iter()
        .filter(|index| !sinks.controller_replaces_physical(*index))
        .map(|controller| PlaybackWarning::DeviceIdentityMismatch { controller })
        .collect()
}
