//! Declarative hotkey table.
//!
//! A [`Chord`] is written like `ctrl+shift+Enter`: any number of modifier
//! names followed by one key code. The [`ChordTable`] maps chords to the
//! [`Trigger`]s they may fire. One chord can serve several triggers (Escape
//! stops both a recording and a replay); the session state picks the one
//! that applies.

use crate::{
    event::{KeyCode, Modifier, Modifiers},
    session::{SessionState, Trigger},
};

use std::{fmt, str::FromStr};

/// Modifier set plus one key, matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    /// Modifiers that must be held, and no others.
    pub modifiers: Modifiers,
    /// Key whose press fires the chord.
    pub key: KeyCode,
}

/// Reason a chord string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordParseError(pub String);

impl fmt::Display for ChordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid chord: {}", self.0)
    }
}

impl std::error::Error for ChordParseError {}

impl Chord {
    /// Chord from a modifier set and key.
    pub const fn new(modifiers: Modifiers, key: KeyCode) -> Self {
        Self { modifiers, key }
    }

    /// Whether pressing `key` while `held` are down fires this chord.
    pub fn matches(&self, held: Modifiers, key: KeyCode) -> bool {
        self.key == key && self.modifiers == held
    }

    /// A chord without modifiers. These are matched on the observed input
    /// stream instead of being registered as OS hotkeys, which would take
    /// the key away from every other application.
    pub fn is_bare(&self) -> bool {
        self.modifiers == Modifiers::NONE
    }
}

impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key_name, modifier_names)) = parts.split_last() else {
            return Err(ChordParseError(format!("empty chord '{s}'")));
        };

        let mut modifiers = Modifiers::NONE;
        for name in modifier_names {
            let modifier = match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifier::Ctrl,
                "shift" => Modifier::Shift,
                "alt" | "option" => Modifier::Alt,
                "meta" | "super" | "win" | "cmd" | "command" => Modifier::Meta,
                other => {
                    return Err(ChordParseError(format!(
                        "unknown modifier '{other}' in '{s}'"
                    )));
                }
            };
            modifiers.set(modifier, true);
        }

        let key = KeyCode::from_name(key_name)
            .ok_or_else(|| ChordParseError(format!("unknown key '{key_name}' in '{s}'")))?;

        if key.modifier().is_some() {
            return Err(ChordParseError(format!(
                "'{s}' ends with a modifier, a chord needs a regular key"
            )));
        }

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.meta {
            f.write_str("meta+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Chord to trigger bindings, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordTable {
    bindings: Vec<(Chord, Trigger)>,
}

impl ChordTable {
    /// Table with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. Earlier bindings win when a chord maps to several
    /// triggers valid in the same state.
    pub fn bind(mut self, chord: Chord, trigger: Trigger) -> Self {
        self.bindings.push((chord, trigger));
        self
    }

    /// Stock key bindings.
    pub fn defaults() -> Self {
        let shift = Modifiers::NONE.with(Modifier::Shift);
        let ctrl = Modifiers::NONE.with(Modifier::Ctrl);
        let ctrl_shift = ctrl.with(Modifier::Shift);

        Self::new()
            .bind(Chord::new(shift, KeyCode::Enter), Trigger::StartRecord)
            .bind(Chord::new(Modifiers::NONE, KeyCode::Escape), Trigger::StopRecord)
            .bind(Chord::new(shift, KeyCode::Escape), Trigger::Discard)
            .bind(Chord::new(ctrl, KeyCode::Enter), Trigger::StartPlay)
            .bind(Chord::new(Modifiers::NONE, KeyCode::Escape), Trigger::StopPlay)
            .bind(Chord::new(shift, KeyCode::Enter), Trigger::StopAndRecord)
            .bind(Chord::new(ctrl_shift, KeyCode::Enter), Trigger::StartRecordAppend)
            .bind(Chord::new(ctrl_shift, KeyCode::KeyS), Trigger::Save)
    }

    /// Trigger `chord` fires in `state`, if any.
    pub fn resolve(&self, chord: &Chord, state: SessionState) -> Option<Trigger> {
        self.bindings
            .iter()
            .filter(|(c, _)| c == chord)
            .map(|(_, t)| *t)
            .find(|t| state.accepts(*t))
    }

    /// Whether pressing `key` with `held` modifiers is any bound chord.
    pub fn is_chord(&self, held: Modifiers, key: KeyCode) -> bool {
        self.bindings.iter().any(|(c, _)| c.matches(held, key))
    }

    /// Whether a press of `key` with `held` modifiers is a hotkey to keep
    /// out of a recording made in `state`.
    ///
    /// Chords with modifiers are held by the OS hotkey and never reach other
    /// applications, so they are always dropped. Bare chords reach the
    /// focused application and are only dropped when they act in `state`.
    pub fn is_hotkey_in(&self, held: Modifiers, key: KeyCode, state: SessionState) -> bool {
        self.bindings.iter().any(|(chord, trigger)| {
            chord.matches(held, key) && (!chord.is_bare() || state.accepts(*trigger))
        })
    }

    /// Distinct chords in declaration order.
    pub fn chords(&self) -> Vec<Chord> {
        let mut chords: Vec<Chord> = Vec::with_capacity(self.bindings.len());
        for (chord, _) in &self.bindings {
            if !chords.contains(chord) {
                chords.push(*chord);
            }
        }
        chords
    }
}
