use crate::config::{default_false, default_interval_ms, default_screen_scale, default_true};

use auto_grind_core::EngineConfig;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which devices are captured and how often hooks are polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Listener tick in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Capture mouse buttons, movement and wheel.
    #[serde(default = "default_true")]
    pub enable_mouse: bool,
    /// Capture keyboard keys.
    #[serde(default = "default_true")]
    pub enable_keyboard: bool,
    /// Capture gamepads 1 to 4.
    #[serde(default = "default_false")]
    pub enable_controller: bool,
    /// Display scale factor, e.g. 1.25 for 125%.
    #[serde(default = "default_screen_scale")]
    pub screen_scale: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            enable_mouse: true,
            enable_keyboard: true,
            enable_controller: false,
            screen_scale: default_screen_scale(),
        }
    }
}

impl CaptureConfig {
    /// Engine settings for this capture section.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            interval: Duration::from_millis(self.interval_ms),
            enable_mouse: self.enable_mouse,
            enable_keyboard: self.enable_keyboard,
            enable_controller: self.enable_controller,
            screen_scale: self.screen_scale,
            ..EngineConfig::default()
        }
    }
}
