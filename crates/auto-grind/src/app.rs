use crate::{AppCommand, AppResult, Notifier, RecordingFile, TrayCommand, TrayIconState};

use auto_grind_core::{
    Chord, CoreResult, InputOutcome, Outcome, PlaybackObserver, PlaybackReport, PlaybackWarning, Recording, Session,
    SessionState,
};

use std::time::Duration;

use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::{MenuEvent, MenuId};

/// How often the control loop checks for a playback run that ended on its
/// own, in case its notice was dropped.
const PLAYBACK_POLL: Duration = Duration::from_millis(100);

/// Forwards playback notices from the playback thread into the control loop.
///
/// Uses `try_send`: the control loop may be blocked joining the playback
/// thread, and a blocking send from that thread would never return.
pub struct ChannelObserver {
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
}

impl PlaybackObserver for ChannelObserver {
    fn warning(&self, warning: &PlaybackWarning) {
        if self
            .command_tx
            .try_send(AppCommand::PlaybackWarning(warning.clone()))
            .is_err()
        {
            warn!(%warning, "Playback warning not delivered");
        }
    }

    fn finished(&self, report: &PlaybackReport) {
        if self.command_tx.try_send(AppCommand::PlaybackFinished).is_err() {
            debug!(
                emitted = report.emitted,
                "Playback finished notice dropped, poll will collect it"
            );
        }
    }
}

/// Main application state.
///
/// Runs on the async runtime thread and owns the only [`Session`].
/// Communicates tray icon updates back to the main thread via `tray_proxy`
/// because `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) session: Session,
    pub(crate) recordings: RecordingFile,
    pub(crate) notifier: Notifier,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) recordings_menu_id: MenuId,
    pub(crate) exit_menu_id: MenuId,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Auto-Grind starting");

        // MenuEvent::receiver() is a crossbeam receiver with a blocking
        // recv(), so one blocking task forwards without polling. It exits on
        // the first blocking_send after tray_event_rx is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        let mut playback_poll = tokio::time::interval(PLAYBACK_POLL);
        playback_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    self.handle_tray_event(event).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Chord(chord) => self.handle_chord(chord),
                        AppCommand::Input(raw) => {
                            if let InputOutcome::Trigger(result) = self.session.on_raw_event(&raw) {
                                self.apply(result);
                            }
                        }
                        AppCommand::PlaybackFinished => self.collect_playback(),
                        AppCommand::PlaybackWarning(warning) => {
                            self.notifier.notify(warning.to_string());
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                _ = playback_poll.tick() => {
                    if self.session.state() == SessionState::Playing {
                        self.collect_playback();
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        self.session.teardown();
        let _ = self.shutdown_tx.send(true);
        info!("Auto-Grind shut down successfully");

        Ok(())
    }

    /// Apply a global hotkey chord to the session.
    #[instrument(skip(self, chord), fields(chord = %chord))]
    fn handle_chord(&mut self, chord: Chord) {
        let result = self.session.handle_chord(&chord);
        self.apply(result);
    }

    /// React to what a trigger did to the session.
    fn apply(&mut self, result: CoreResult<Outcome>) {
        match result {
            Ok(Outcome::Ignored) => {}
            Ok(Outcome::Transitioned { to, .. }) => self.set_tray_state(to),
            Ok(Outcome::Save(recording)) => self.save(recording),
            Err(e) => {
                warn!(error = %e, "Hotkey rejected");
                self.notifier.notify(e.to_string());
            }
        }
    }

    /// Write a released recording to disk. On failure it goes back into
    /// the session so nothing is lost.
    #[instrument(skip(self, recording), fields(event_count = recording.len()))]
    fn save(&mut self, recording: Recording) {
        match self.recordings.save(&recording) {
            Ok(path) => {
                self.notifier
                    .notify(format!("Recording saved to {}", path.display()));
            }
            Err(e) => {
                error!(error = ?e, "Failed to save recording");
                self.notifier.notify(format!("Saving failed: {}", e));
                self.session.load(recording);
            }
        }
    }

    /// Collect a playback run that ended on its own.
    fn collect_playback(&mut self) {
        if let Some(report) = self.session.on_playback_finished() {
            info!(
                emitted = report.emitted,
                failed = report.failed,
                elapsed_ms = report.elapsed.as_millis(),
                "Playback complete"
            );
            if report.failed > 0 {
                self.notifier.notify(format!(
                    "Playback finished, {} of {} events could not be emitted",
                    report.failed,
                    report.position()
                ));
            }
            self.set_tray_state(self.session.state());
        }
    }

    fn set_tray_state(&self, state: SessionState) {
        if self
            .tray_proxy
            .send_event(TrayCommand::SetState(TrayIconState::from(state)))
            .is_err()
        {
            debug!("Tray event loop closed");
        }
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) {
        let event_id = &event.id;

        if *event_id == self.recordings_menu_id {
            match open::that(self.recordings.dir()) {
                Ok(()) => info!("Opened recordings folder"),
                Err(e) => warn!(error = %e, "Failed to open recordings folder"),
            }
        } else if *event_id == self.exit_menu_id {
            info!("Exit requested from tray menu");
            let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
        }
    }
}
