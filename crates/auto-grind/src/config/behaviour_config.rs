use crate::config::{default_load_last_recording, default_notify_warnings};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Load the newest saved recording at start-up.
    #[serde(default = "default_load_last_recording")]
    pub load_last_recording: bool,
    /// Show desktop notifications for playback warnings and save results.
    #[serde(default = "default_notify_warnings")]
    pub notify_warnings: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            load_last_recording: default_load_last_recording(),
            notify_warnings: default_notify_warnings(),
        }
    }
}
