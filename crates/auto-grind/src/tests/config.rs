use crate::{AppError, config::Config};

use auto_grind_core::{ChordTable, EngineConfig};

use std::{fs, path::PathBuf};

use uuid::Uuid;

#[allow(clippy::unwrap_used)]
fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("auto-grind-config-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// WHAT: Default config validates and matches the engine defaults
/// WHY: A fresh install must start without editing anything
#[test]
#[allow(clippy::unwrap_used)]
fn given_default_config_when_validated_then_matches_engine_defaults() {
    // Given: The default config
    let config = Config::default();

    // Then: It validates and maps onto the engine's own defaults
    config.validate().unwrap();
    assert_eq!(config.engine_config(), EngineConfig::default());
    assert_eq!(config.chord_table().unwrap(), ChordTable::defaults());
    assert!(config.behavior.load_last_recording);
    assert!(config.behavior.notify_warnings);
}

/// WHAT: Missing sections and keys fall back to defaults
/// WHY: Users only write the settings they change
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_toml_when_parsing_then_missing_values_defaulted() {
    // Given: Only two capture keys and one hotkey
    let text = r#"
        [capture]
        enable_mouse = false
        screen_scale = 1.5

        [hotkeys]
        save = "ctrl+alt+s"
    "#;

    // When: Parsing
    let config: Config = toml::from_str(text).unwrap();

    // Then: Given values are used, the rest defaulted
    let engine = config.engine_config();
    assert!(!engine.enable_mouse);
    assert!(engine.enable_keyboard);
    assert!(!engine.enable_controller);
    assert_eq!(engine.screen_scale, 1.5);
    assert_eq!(engine.interval.as_millis(), 10);
    assert_eq!(config.hotkeys.save, "ctrl+alt+s");
    assert_eq!(config.hotkeys.stop_record, "Escape");
    config.validate().unwrap();
}

/// WHAT: The take-over switch in [hotkeys] reaches the engine settings
/// WHY: Users who only want explicit hotkeys can turn it off
#[test]
#[allow(clippy::unwrap_used)]
fn given_take_over_disabled_when_parsing_then_engine_config_follows() {
    let default: Config = toml::from_str("").unwrap();
    let off: Config = toml::from_str("[hotkeys]\ntake_over = false\n").unwrap();

    assert!(default.engine_config().take_over);
    assert!(!off.engine_config().take_over);
    assert_eq!(off.hotkeys.stop_play, "Escape");
}

/// WHAT: Values the engine cannot use are rejected
/// WHY: A zero tick or scale would break timing and coordinates
#[test]
fn given_invalid_capture_values_when_validating_then_config_error() {
    let mut zero_interval = Config::default();
    zero_interval.capture.interval_ms = 0;

    let mut zero_scale = Config::default();
    zero_scale.capture.screen_scale = 0.0;

    let mut nan_scale = Config::default();
    nan_scale.capture.screen_scale = f64::NAN;

    for config in [zero_interval, zero_scale, nan_scale] {
        assert!(matches!(
            config.validate(),
            Err(AppError::ConfigError { .. })
        ));
    }
}

/// WHAT: Unparsable chords are rejected
/// WHY: A typo must not silently disable a hotkey
#[test]
fn given_bad_chord_when_validating_then_config_error() {
    let mut config = Config::default();
    config.hotkeys.discard = "shift+Escpae".to_string();

    assert!(matches!(
        config.validate(),
        Err(AppError::ConfigError { .. })
    ));
}

/// WHAT: Two triggers of the same state cannot share a chord
/// WHY: Only the first binding would ever fire
#[test]
fn given_conflicting_chords_when_validating_then_config_error() {
    // Given: Save and start-play both on ctrl+Enter, both valid while idle
    let mut config = Config::default();
    config.hotkeys.save = "ctrl+Enter".to_string();

    assert!(matches!(
        config.chord_table(),
        Err(AppError::ConfigError { .. })
    ));
}

/// WHAT: The same chord may serve triggers of different states
/// WHY: Escape stops both recording and playback by default
#[test]
#[allow(clippy::unwrap_used)]
fn given_shared_chord_across_states_when_building_table_then_accepted() {
    let mut config = Config::default();
    config.hotkeys.discard = "F8".to_string();
    config.hotkeys.stop_and_record = "F8".to_string();

    let table = config.chord_table().unwrap();

    assert_eq!(table.chords().len(), 6);
}

/// WHAT: Saved config loads back unchanged
/// WHY: Atomic writes must produce a readable file
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_saved_and_loaded_then_equal() {
    // Given: A non-default config
    let dir = temp_dir();
    let path = dir.join("config.toml");
    let mut config = Config::default();
    config.capture.enable_controller = true;
    config.capture.interval_ms = 4;
    config.behavior.notify_warnings = false;

    // When: Saving and loading
    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    // Then: Identical, with no temp file left behind
    assert_eq!(loaded, config);
    assert!(!path.with_extension("toml.tmp").exists());

    fs::remove_dir_all(&dir).unwrap();
}

/// WHAT: A file that fails validation is not loaded
/// WHY: Bad values must be caught at start-up
#[test]
#[allow(clippy::unwrap_used)]
fn given_invalid_file_when_loading_then_config_error() {
    let dir = temp_dir();
    let path = dir.join("config.toml");
    fs::write(&path, "[capture]\nscreen_scale = -2.0\n").unwrap();

    let result = Config::load_from(&path);

    assert!(matches!(result, Err(AppError::ConfigError { .. })));
    fs::remove_dir_all(&dir).unwrap();
}
