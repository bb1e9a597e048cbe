use auto_grind_core::{Chord, PlaybackWarning, RawEvent};

/// Commands funnelled into the app's control loop.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A registered hotkey chord was pressed.
    Chord(Chord),
    /// A device notification from an OS input hook.
    Input(RawEvent),
    /// The playback thread reached the end of its run.
    PlaybackFinished,
    /// The playback thread raised a warning for the user.
    PlaybackWarning(PlaybackWarning),
    /// Request application shutdown.
    Shutdown,
}
