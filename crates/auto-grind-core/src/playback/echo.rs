use crate::event::KeyCode;

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// How far apart an emitted key press and its sighting by the input hook
/// may be to count as the same press.
pub(crate) const ECHO_WINDOW: Duration = Duration::from_millis(250);

const CAPACITY: usize = 64;

/// Key presses the playback thread emitted recently.
///
/// OS input hooks also see synthetic input, so without this the replay's
/// own key presses would look like the user taking over.
#[derive(Debug, Clone, Default)]
pub(crate) struct EchoLog {
    presses: Arc<Mutex<VecDeque<(Instant, KeyCode)>>>,
}

impl EchoLog {
    pub(crate) fn push(&self, at: Instant, key: KeyCode) {
        let mut presses = self.presses.lock().unwrap_or_else(|e| e.into_inner());
        if presses.len() == CAPACITY {
            presses.pop_front();
        }
        presses.push_back((at, key));
    }

    /// Whether a press of `key` seen at `seen` was one we emitted. A match
    /// is consumed so a later real press of the same key is not swallowed.
    pub(crate) fn take(&self, key: KeyCode, seen: Instant) -> bool {
        let mut presses = self.presses.lock().unwrap_or_else(|e| e.into_inner());
        let found = presses
            .iter()
            .position(|(at, emitted)| same_key(*emitted, key) && gap(*at, seen) <= ECHO_WINDOW);
        match found {
            Some(index) => {
                presses.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Left and right modifiers are emitted through one generic key, so the
/// hook may report either side.
fn same_key(emitted: KeyCode, seen: KeyCode) -> bool {
    emitted == seen || emitted.modifier().is_some_and(|m| seen.modifier() == Some(m))
}

fn gap(a: Instant, b: Instant) -> Duration {
    if a > b { a - b } else { b - a }
}
