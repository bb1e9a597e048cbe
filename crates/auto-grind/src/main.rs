//! Auto-Grind: record mouse, keyboard and gamepad input and replay it with
//! the same timing, driven by global hotkeys.

mod app;
mod app_command;
mod config;
mod enigo_sink;
mod error;
mod hotkey_handler;
mod input_guard;
mod input_hook;
mod keymap;
mod logging;
mod notifier;
mod recording_file;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;
mod virtual_pad;

pub(crate) use {
    app::{App, ChannelObserver},
    app_command::AppCommand,
    enigo_sink::EnigoSinkFactory,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    input_guard::InputGuard,
    notifier::Notifier,
    recording_file::RecordingFile,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::config::Config;

use auto_grind_core::Session;

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Capacity of the control loop's queue. Input hooks fill it in bursts
/// (mouse moves), so it is far deeper than the hotkey queue.
const COMMAND_QUEUE: usize = 1024;

/// Application entry point.
fn main() {
    let log_guard = logging::init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations. Dropping it unregisters the hotkeys.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let chords = match config.chord_table() {
                    Ok(chords) => chords,
                    Err(e) => {
                        error!("Invalid hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let recordings = match Config::recordings_dir() {
                    Ok(dir) => RecordingFile::new(dir),
                    Err(e) => {
                        error!("Failed to prepare recordings directory: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register hotkeys on the main thread -- tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let (manager, bindings) = match HotkeyHandler::register_hotkeys(&chords) {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let engine_config = config.engine_config();

                if let Err(e) = input_hook::spawn_keyboard_mouse_hook(command_tx.clone()) {
                    error!("Failed to start input hook: {:?}", e);
                    std::process::exit(1);
                }

                if engine_config.enable_controller {
                    if let Err(e) = input_hook::spawn_controller_poller(
                        engine_config.interval,
                        command_tx.clone(),
                        shutdown_rx.clone(),
                    ) {
                        warn!(error = ?e, "Controllers will not be captured");
                    }
                }

                let tray_proxy = tray_proxy.clone();
                let recordings_menu_id = tray_manager.recordings_item_id().clone();
                let exit_menu_id = tray_manager.exit_item_id().clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let mut session = Session::new(
                            engine_config,
                            chords,
                            Arc::new(EnigoSinkFactory),
                            Arc::new(ChannelObserver {
                                command_tx: command_tx.clone(),
                            }),
                        );

                        if config.behavior.load_last_recording {
                            load_latest(&recordings, &mut session);
                        }

                        let hotkey_handler = HotkeyHandler::new(bindings, command_tx.clone());

                        let app = App {
                            session,
                            recordings,
                            notifier: Notifier::new(config.behavior.notify_warnings),
                            tray_proxy,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            recordings_menu_id,
                            exit_menu_id,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager and the log writer alive in the closure for
        // the app's lifetime.
        let _ = (&hotkey_manager, &log_guard);
    });
}

/// Put the newest saved recording into the session, if there is one.
fn load_latest(recordings: &RecordingFile, session: &mut Session) {
    let path = match recordings.latest() {
        Ok(Some(path)) => path,
        Ok(None) => {
            info!("No saved recording to load");
            return;
        }
        Err(e) => {
            warn!(error = ?e, "Failed to scan recordings directory");
            return;
        }
    };

    match RecordingFile::load(&path) {
        Ok(recording) => {
            info!(path = ?path, event_count = recording.len(), "Loaded last recording");
            session.load(recording);
        }
        Err(e) => warn!(error = ?e, "Failed to load last recording"),
    }
}
