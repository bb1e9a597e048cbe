//! Global hotkey registration and forwarding.
//!
//! Registers one global hotkey per distinct chord with modifiers in the
//! [`ChordTable`] and forwards presses to the app as [`AppCommand::Chord`].
//! Which trigger a chord fires is decided by the session, since that depends
//! on its state.
//!
//! Bare chords such as `Escape` are not registered: an OS hotkey takes its
//! key from every application, so the game would never see it. The session
//! matches those on the input hook stream instead.

use crate::{AppCommand, AppError, AppResult};

use auto_grind_core::{Chord, ChordTable, KeyCode};

use std::{collections::HashMap, panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards global hotkey presses to the app.
pub struct HotkeyHandler {
    bindings: HashMap<u32, Chord>,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register every distinct chord of `chords` that has modifiers as a
    /// global hotkey.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao`/`winit` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkeys to remain registered.
    #[track_caller]
    #[instrument(skip(chords))]
    pub fn register_hotkeys(
        chords: &ChordTable,
    ) -> AppResult<(GlobalHotKeyManager, HashMap<u32, Chord>)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut bindings = HashMap::new();
        for chord in os_chords(chords) {
            let hotkey = hotkey_for(&chord)?;

            manager
                .register(hotkey)
                .map_err(|e| AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to register {}: {}", chord, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            info!(hotkey = %chord, "Global hotkey registered");
            bindings.insert(hotkey.id(), chord);
        }

        Ok((manager, bindings))
    }

    /// Create a handler for previously registered hotkeys.
    ///
    /// `bindings` should come from [`HotkeyHandler::register_hotkeys`]. This
    /// struct is `Send` and can live on any thread; it only listens on the
    /// global [`GlobalHotKeyEvent`] channel.
    pub fn new(bindings: HashMap<u32, Chord>, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            bindings,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a crossbeam receiver with a
        // blocking recv(), so one blocking task forwards without polling.
        // It exits on the first blocking_send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if let Err(e) = self.handle_event(event).await {
                        warn!(error = ?e, "Hotkey press not delivered");
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may sit in recv() until another hotkey arrives.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Forward a pressed hotkey. Releases and unknown ids are ignored.
    #[instrument(skip(self))]
    pub(crate) async fn handle_event(&self, event: GlobalHotKeyEvent) -> AppResult<()> {
        if event.state != HotKeyState::Pressed {
            return Ok(());
        }
        let Some(chord) = self.bindings.get(&event.id) else {
            return Ok(());
        };

        self.command_tx
            .send(AppCommand::Chord(*chord))
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send chord {}: {}", chord, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(chord = %chord, "Hotkey forwarded");
        Ok(())
    }
}

/// Chords to register with the OS: those with modifiers. Bare chords stay
/// with the input hook.
pub(crate) fn os_chords(chords: &ChordTable) -> Vec<Chord> {
    chords
        .chords()
        .into_iter()
        .filter(|chord| {
            if chord.is_bare() {
                info!(hotkey = %chord, "Hotkey matched from the input hook");
            }
            !chord.is_bare()
        })
        .collect()
}

/// Global hotkey matching `chord`.
#[track_caller]
pub(crate) fn hotkey_for(chord: &Chord) -> AppResult<HotKey> {
    let mut modifiers = Modifiers::empty();
    if chord.modifiers.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if chord.modifiers.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if chord.modifiers.alt {
        modifiers |= Modifiers::ALT;
    }
    if chord.modifiers.meta {
        modifiers |= Modifiers::META;
    }

    let code = code_for(chord.key).ok_or_else(|| AppError::HotkeyRegistrationFailed {
        reason: format!("Key {} cannot be used in a global hotkey", chord.key),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}

fn code_for(key: KeyCode) -> Option<Code> {
    let code = match key {
        KeyCode::KeyA => Code::KeyA,
        KeyCode::KeyB => Code::KeyB,
        KeyCode::KeyC => Code::KeyC,
        KeyCode::KeyD => Code::KeyD,
        KeyCode::KeyE => Code::KeyE,
        KeyCode::KeyF => Code::KeyF,
        KeyCode::KeyG => Code::KeyG,
        KeyCode::KeyH => Code::KeyH,
        KeyCode::KeyI => Code::KeyI,
        KeyCode::KeyJ => Code::KeyJ,
        KeyCode::KeyK => Code::KeyK,
        KeyCode::KeyL => Code::KeyL,
        KeyCode::KeyM => Code::KeyM,
        KeyCode::KeyN => Code::KeyN,
        KeyCode::KeyO => Code::KeyO,
        KeyCode::KeyP => Code::KeyP,
        KeyCode::KeyQ => Code::KeyQ,
        KeyCode::KeyR => Code::KeyR,
        KeyCode::KeyS => Code::KeyS,
        KeyCode::KeyT => Code::KeyT,
        KeyCode::KeyU => Code::KeyU,
        KeyCode::KeyV => Code::KeyV,
        KeyCode::KeyW => Code::KeyW,
        KeyCode::KeyX => Code::KeyX,
        KeyCode::KeyY => Code::KeyY,
        KeyCode::KeyZ => Code::KeyZ,
        KeyCode::Digit0 => Code::Digit0,
        KeyCode::Digit1 => Code::Digit1,
        KeyCode::Digit2 => Code::Digit2,
        KeyCode::Digit3 => Code::Digit3,
        KeyCode::Digit4 => Code::Digit4,
        KeyCode::Digit5 => Code::Digit5,
        KeyCode::Digit6 => Code::Digit6,
        KeyCode::Digit7 => Code::Digit7,
        KeyCode::Digit8 => Code::Digit8,
        KeyCode::Digit9 => Code::Digit9,
        KeyCode::F1 => Code::F1,
        KeyCode::F2 => Code::F2,
        KeyCode::F3 => Code::F3,
        KeyCode::F4 => Code::F4,
        KeyCode::F5 => Code::F5,
        KeyCode::F6 => Code::F6,
        KeyCode::F7 => Code::F7,
        KeyCode::F8 => Code::F8,
        KeyCode::F9 => Code::F9,
        KeyCode::F10 => Code::F10,
        KeyCode::F11 => Code::F11,
        KeyCode::F12 => Code::F12,
        KeyCode::Enter => Code::Enter,
        KeyCode::Escape => Code::Escape,
        KeyCode::Space => Code::Space,
        KeyCode::Tab => Code::Tab,
        KeyCode::Backspace => Code::Backspace,
        KeyCode::Delete => Code::Delete,
        KeyCode::Insert => Code::Insert,
        KeyCode::Home => Code::Home,
        KeyCode::End => Code::End,
        KeyCode::PageUp => Code::PageUp,
        KeyCode::PageDown => Code::PageDown,
        KeyCode::ArrowUp => Code::ArrowUp,
        KeyCode::ArrowDown => Code::ArrowDown,
        KeyCode::ArrowLeft => Code::ArrowLeft,
        KeyCode::ArrowRight => Code::ArrowRight,
        KeyCode::CapsLock => Code::CapsLock,
        KeyCode::Minus => Code::Minus,
        KeyCode::Equal => Code::Equal,
        KeyCode::BracketLeft => Code::BracketLeft,
        KeyCode::BracketRight => Code::BracketRight,
        KeyCode::Backslash => Code::Backslash,
        KeyCode::Semicolon => Code::Semicolon,
        KeyCode::Quote => Code::Quote,
        KeyCode::Backquote => Code::Backquote,
        KeyCode::Comma => Code::Comma,
        KeyCode::Period => Code::Period,
        KeyCode::Slash => Code::Slash,
        KeyCode::ShiftLeft
        | KeyCode::ShiftRight
        | KeyCode::ControlLeft
        | KeyCode::ControlRight
        | KeyCode::AltLeft
        | KeyCode::AltRight
        | KeyCode::MetaLeft
        | KeyCode::MetaRight
        | KeyCode::Other(_) => return None,
    };
    Some(code)
}
