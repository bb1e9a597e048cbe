use auto_grind_core::SessionState;

/// Tray icon states corresponding to the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready for a hotkey.
    Idle,
    /// Capturing input, fresh or appending.
    Recording,
    /// Replaying the last recording.
    Playing,
}

impl From<SessionState> for TrayIconState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Idle => TrayIconState::Idle,
            SessionState::Recording | SessionState::RecordingAppend => TrayIconState::Recording,
            SessionState::Playing => TrayIconState::Playing,
        }
    }
}

impl TrayIconState {
    /// Icon fill colour as RGB.
    pub fn color(&self) -> [u8; 3] {
        match self {
            TrayIconState::Idle => [0x6b, 0x72, 0x80],
            TrayIconState::Recording => [0xdc, 0x26, 0x26],
            TrayIconState::Playing => [0x16, 0xa3, 0x4a],
        }
    }

    /// Tooltip shown next to the icon.
    pub fn tooltip(&self) -> &'static str {
        match self {
            TrayIconState::Idle => "Auto-Grind - Ready",
            TrayIconState::Recording => "Auto-Grind - Recording...",
            TrayIconState::Playing => "Auto-Grind - Playing...",
        }
    }
}
