use crate::{AppError, AppResult};

use auto_grind_core::{Chord, ChordTable, Trigger};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Chord strings for every hotkey, e.g. `"ctrl+shift+Enter"`.
///
/// The same chord may be given to triggers that are never valid in the same
/// state; Escape stops both recording and playback by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Begin a fresh recording.
    pub start_record: String,
    /// Finish the capture and keep it.
    pub stop_record: String,
    /// Finish the capture and throw it away.
    pub discard: String,
    /// Replay the last recording.
    pub start_play: String,
    /// Cancel the replay.
    pub stop_play: String,
    /// Cancel the replay and keep recording from there.
    pub stop_and_record: String,
    /// Capture onto the end of the last recording.
    pub start_record_append: String,
    /// Write the last recording to disk.
    pub save: String,
    /// While playing, any other key press stops the replay and keeps
    /// recording from that point, starting with the press itself.
    pub take_over: bool,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            start_record: "shift+Enter".to_string(),
            stop_record: "Escape".to_string(),
            discard: "shift+Escape".to_string(),
            start_play: "ctrl+Enter".to_string(),
            stop_play: "Escape".to_string(),
            stop_and_record: "shift+Enter".to_string(),
            start_record_append: "ctrl+shift+Enter".to_string(),
            save: "ctrl+shift+KeyS".to_string(),
            take_over: true,
        }
    }
}

impl HotkeyConfig {
    /// Parse every chord into a table.
    ///
    /// Two triggers valid in the same state must not share a chord, since
    /// only the first would ever fire.
    #[track_caller]
    pub fn chord_table(&self) -> AppResult<ChordTable> {
        let mut bindings: Vec<(Chord, Trigger)> = Vec::with_capacity(8);
        for (text, trigger) in self.entries() {
            let chord: Chord = text.parse().map_err(|e| AppError::ConfigError {
                reason: format!("Hotkey for {:?}: {}", trigger, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            if let Some((_, other)) = bindings
                .iter()
                .find(|(c, t)| *c == chord && shares_state(*t, trigger))
            {
                return Err(AppError::ConfigError {
                    reason: format!(
                        "Hotkey '{}' is bound to both {:?} and {:?}",
                        chord, other, trigger
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            bindings.push((chord, trigger));
        }

        Ok(bindings
            .into_iter()
            .fold(ChordTable::new(), |table, (chord, trigger)| {
                table.bind(chord, trigger)
            }))
    }

    fn entries(&self) -> [(&str, Trigger); 8] {
        [
            (self.start_record.as_str(), Trigger::StartRecord),
            (self.stop_record.as_str(), Trigger::StopRecord),
            (self.discard.as_str(), Trigger::Discard),
            (self.start_play.as_str(), Trigger::StartPlay),
            (self.stop_play.as_str(), Trigger::StopPlay),
            (self.stop_and_record.as_str(), Trigger::StopAndRecord),
            (self.start_record_append.as_str(), Trigger::StartRecordAppend),
            (self.save.as_str(), Trigger::Save),
        ]
    }
}

fn shares_state(a: Trigger, b: Trigger) -> bool {
    use auto_grind_core::SessionState;

    [
        SessionState::Idle,
        SessionState::Recording,
        SessionState::RecordingAppend,
        SessionState::Playing,
    ]
    .iter()
    .any(|state| state.accepts(a) && state.accepts(b))
}
