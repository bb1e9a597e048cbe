mod behaviour_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, capture_config::CaptureConfig, config::Config,
    hotkey_config::HotkeyConfig,
};

pub(crate) const DEFAULT_INTERVAL_MS: u64 = 10;
pub(crate) const DEFAULT_SCREEN_SCALE: f64 = 1.0;
pub(crate) const DEFAULT_LOAD_LAST_RECORDING: bool = true;
pub(crate) const DEFAULT_NOTIFY_WARNINGS: bool = true;

pub(crate) fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

pub(crate) fn default_screen_scale() -> f64 {
    DEFAULT_SCREEN_SCALE
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_false() -> bool {
    false
}

pub(crate) fn default_load_last_recording() -> bool {
    DEFAULT_LOAD_LAST_RECORDING
}

pub(crate) fn default_notify_warnings() -> bool {
    DEFAULT_NOTIFY_WARNINGS
}
