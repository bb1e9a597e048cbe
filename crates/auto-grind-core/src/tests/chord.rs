use crate::{Chord, ChordTable, KeyCode, Modifier, Modifiers, SessionState, Trigger};

/// WHAT: Chord strings parse into modifiers plus key
/// WHY: Hotkeys are configured as text
#[test]
#[allow(clippy::unwrap_used)]
fn given_chord_string_when_parsing_then_modifiers_and_key_set() {
    // When: Parsing a three-part chord with mixed case
    let chord: Chord = "Ctrl + SHIFT + KeyS".parse().unwrap();

    // Then: Both modifiers and the key are present
    let expected = Modifiers::NONE.with(Modifier::Ctrl).with(Modifier::Shift);
    assert_eq!(chord, Chord::new(expected, KeyCode::KeyS));
}

/// WHAT: Display renders a chord that parses back to itself
/// WHY: Config files are written from parsed chords
#[test]
#[allow(clippy::unwrap_used)]
fn given_chord_when_displaying_then_canonical_text() {
    let chord: Chord = "shift+control+enter".parse().unwrap();

    assert_eq!(chord.to_string(), "ctrl+shift+Enter");
    assert_eq!(chord.to_string().parse::<Chord>().unwrap(), chord);
}

/// WHAT: Modifier aliases map to the same modifier
/// WHY: Users write cmd, win or super for the same key
#[test]
#[allow(clippy::unwrap_used)]
fn given_meta_aliases_when_parsing_then_same_chord() {
    let a: Chord = "cmd+KeyP".parse().unwrap();
    let b: Chord = "win+p".parse().unwrap();
    let c: Chord = "super+KeyP".parse().unwrap();

    assert_eq!(a, b);
    assert_eq!(b, c);
    assert!(a.modifiers.meta);
}

/// WHAT: Bad chord strings are rejected
/// WHY: A typo must surface at load time, not as a dead hotkey
#[test]
fn given_invalid_chords_when_parsing_then_error() {
    for text in ["", "ctrl+", "hyper+KeyA", "ctrl+NoSuchKey", "ctrl+ShiftLeft"] {
        assert!(text.parse::<Chord>().is_err(), "'{text}' should not parse");
    }
}

/// WHAT: One chord resolves to the trigger valid in the current state
/// WHY: Escape stops a recording and a replay alike
#[test]
fn given_shared_chord_when_resolving_then_state_picks_trigger() {
    // Given: Default bindings
    let table = ChordTable::defaults();
    let escape = Chord::new(Modifiers::NONE, KeyCode::Escape);
    let shift_enter = Chord::new(Modifiers::NONE.with(Modifier::Shift), KeyCode::Enter);

    // Then: Each state sees its own meaning
    assert_eq!(
        table.resolve(&escape, SessionState::Recording),
        Some(Trigger::StopRecord)
    );
    assert_eq!(
        table.resolve(&escape, SessionState::RecordingAppend),
        Some(Trigger::StopRecord)
    );
    assert_eq!(
        table.resolve(&escape, SessionState::Playing),
        Some(Trigger::StopPlay)
    );
    assert_eq!(table.resolve(&escape, SessionState::Idle), None);
    assert_eq!(
        table.resolve(&shift_enter, SessionState::Idle),
        Some(Trigger::StartRecord)
    );
    assert_eq!(
        table.resolve(&shift_enter, SessionState::Playing),
        Some(Trigger::StopAndRecord)
    );
}

/// WHAT: Matching requires the exact modifier set
/// WHY: ctrl+shift+Enter must not also fire ctrl+Enter
#[test]
fn given_extra_modifier_held_when_matching_then_no_match() {
    let table = ChordTable::defaults();
    let ctrl = Modifiers::NONE.with(Modifier::Ctrl);
    let ctrl_shift = ctrl.with(Modifier::Shift);
    let ctrl_alt = ctrl.with(Modifier::Alt);

    assert!(table.is_chord(ctrl, KeyCode::Enter));
    assert!(table.is_chord(ctrl_shift, KeyCode::Enter));
    assert!(!table.is_chord(ctrl_alt, KeyCode::Enter));
    assert!(!table.is_chord(Modifiers::NONE, KeyCode::Enter));
}

/// WHAT: Distinct chords are listed once each
/// WHY: Each chord is registered with the OS a single time
#[test]
fn given_default_table_when_listing_chords_then_no_duplicates() {
    let chords = ChordTable::defaults().chords();

    assert_eq!(chords.len(), 6);
    for (i, chord) in chords.iter().enumerate() {
        assert!(!chords[i + 1..].contains(chord));
    }
}

/// WHAT: Every trigger has a default chord
/// WHY: A trigger without a binding cannot be reached
#[test]
fn given_default_table_when_resolving_every_state_then_all_triggers_reachable() {
    let table = ChordTable::defaults();
    let states = [
        SessionState::Idle,
        SessionState::Recording,
        SessionState::RecordingAppend,
        SessionState::Playing,
    ];

    for state in states {
        for trigger in state.valid_triggers() {
            let reachable = table
                .chords()
                .iter()
                .any(|c| table.resolve(c, state) == Some(*trigger));
            assert!(reachable, "{trigger:?} unreachable in {state}");
        }
    }
}

/// WHAT: Chords with modifiers are hotkeys in every state, bare ones only
/// where they act
/// WHY: A bare key with no meaning in the state is ordinary input
#[test]
fn given_default_table_when_checking_hotkeys_by_state_then_bare_ones_follow_state() {
    let table = ChordTable::defaults();
    let ctrl = Modifiers::NONE.with(Modifier::Ctrl);

    assert!(table.is_hotkey_in(ctrl, KeyCode::Enter, SessionState::Recording));
    assert!(table.is_hotkey_in(Modifiers::NONE, KeyCode::Escape, SessionState::Recording));
    assert!(table.is_hotkey_in(Modifiers::NONE, KeyCode::Escape, SessionState::Playing));
    assert!(!table.is_hotkey_in(Modifiers::NONE, KeyCode::Escape, SessionState::Idle));
    assert!(!table.is_hotkey_in(Modifiers::NONE, KeyCode::Enter, SessionState::Recording));
}

/// WHAT: Only chords without modifiers count as bare
/// WHY: Bare chords are matched on the input stream, the rest by the OS
#[test]
#[allow(clippy::unwrap_used)]
fn given_chords_when_checking_bare_then_only_unmodified() {
    assert!("Escape".parse::<Chord>().unwrap().is_bare());
    assert!(!"shift+Escape".parse::<Chord>().unwrap().is_bare());
}
