mod chord;
#[allow(clippy::module_inception)]
mod session;
mod state;

pub use {
    chord::{Chord, ChordParseError, ChordTable},
    session::{InputOutcome, Outcome, Session},
    state::{SessionState, Trigger},
};
