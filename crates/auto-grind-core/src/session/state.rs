use std::fmt;

/// Process-wide session state, owned by [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing captured or replayed.
    Idle,
    /// Capturing a new recording.
    Recording,
    /// Capturing a segment onto the tail of the last recording.
    RecordingAppend,
    /// Replaying the last recording.
    Playing,
}

/// Hotkey signal the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Begin a fresh recording.
    StartRecord,
    /// Begin capturing onto the last recording.
    StartRecordAppend,
    /// Finish the capture and keep it.
    StopRecord,
    /// Finish the capture and throw it away.
    Discard,
    /// Replay the last recording.
    StartPlay,
    /// Cancel the replay.
    StopPlay,
    /// Cancel the replay and keep recording from the current position.
    StopAndRecord,
    /// Hand the last recording to persistence.
    Save,
}

impl SessionState {
    /// Triggers this state reacts to; everything else is ignored.
    pub fn valid_triggers(&self) -> &'static [Trigger] {
        match self {
            SessionState::Idle => &[
                Trigger::StartRecord,
                Trigger::StartRecordAppend,
                Trigger::StartPlay,
                Trigger::Save,
            ],
            SessionState::Recording | SessionState::RecordingAppend => {
                &[Trigger::StopRecord, Trigger::Discard]
            }
            SessionState::Playing => &[Trigger::StopPlay, Trigger::StopAndRecord],
        }
    }

    /// Whether `trigger` is valid in this state.
    pub fn accepts(&self, trigger: Trigger) -> bool {
        self.valid_triggers().contains(&trigger)
    }

    /// Whether a capture listener is bound.
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording | SessionState::RecordingAppend)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::RecordingAppend => "recording (append)",
            SessionState::Playing => "playing",
        };
        f.write_str(name)
    }
}
