use std::time::Duration;

/// Immutable settings the engine runs with.
///
/// Loaded by the host application and handed over once at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Listener tick; also the timing tolerance playback aims for.
    pub interval: Duration,
    /// Capture mouse buttons, movement and wheel.
    pub enable_mouse: bool,
    /// Capture keyboard keys.
    pub enable_keyboard: bool,
    /// Capture gamepads 1 to 4.
    pub enable_controller: bool,
    /// Display scale factor used to normalize pointer coordinates.
    pub screen_scale: f64,
    /// While playing, a key press that is no hotkey stops the replay and
    /// keeps recording from that point.
    pub take_over: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            enable_mouse: true,
            enable_keyboard: true,
            enable_controller: false,
            screen_scale: 1.0,
            take_over: true,
        }
    }
}
