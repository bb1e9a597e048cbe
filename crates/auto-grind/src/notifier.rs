use notify_rust::Notification;
use tracing::{debug, warn};

const SUMMARY: &str = "Auto-Grind";

/// Desktop notifications for things the user should see without a log.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    /// Notifier that shows nothing when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Show `body` in a desktop notification.
    ///
    /// Runs on the blocking pool since some platforms wait on a D-Bus round
    /// trip. Failures are logged and otherwise ignored.
    pub fn notify(&self, body: String) {
        if !self.enabled {
            debug!(body = %body, "Notification suppressed");
            return;
        }

        tokio::task::spawn_blocking(move || {
            if let Err(e) = Notification::new().summary(SUMMARY).body(&body).show() {
                warn!(error = %e, "Failed to show notification");
            }
        });
    }
}
