use crate::{
    Action, Button, DeviceKind, DeviceSinks, EngineConfig, Event, InputSink, KeyCode,
    PlaybackObserver, PlaybackReport, PlaybackWarning, RawDevice, RawEvent, RawKind, Recording,
    SinkError, SinkFactory,
};

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Shared log of everything the fake sinks emitted.
#[derive(Clone, Default)]
pub(crate) struct Emissions(Arc<Mutex<Vec<(Instant, DeviceKind, Action)>>>);

impl Emissions {
    pub(crate) fn snapshot(&self) -> Vec<(Instant, DeviceKind, Action)> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

struct FakeSink {
    device: DeviceKind,
    log: Emissions,
    fail: bool,
    replaces: bool,
}

impl InputSink for FakeSink {
    fn emit(&mut self, action: &Action) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError("rejected by test sink".to_string()));
        }
        self.log
            .0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((Instant::now(), self.device, action.clone()));
        Ok(())
    }

    fn replaces_physical_device(&self) -> bool {
        self.replaces
    }
}

/// Sink factory backed by [`FakeSink`]s.
#[derive(Clone, Default)]
pub(crate) struct FakeDevices {
    pub(crate) log: Emissions,
    /// Keyboard sink rejects every action.
    pub(crate) failing_keyboard: bool,
    /// Controller 1 sink, `Some(replaces_physical)` when attached.
    pub(crate) controller: Option<bool>,
}

impl FakeDevices {
    fn sink(&self, device: DeviceKind, fail: bool, replaces: bool) -> Box<dyn InputSink> {
        Box::new(FakeSink {
            device,
            log: self.log.clone(),
            fail,
            replaces,
        })
    }
}

impl SinkFactory for FakeDevices {
    fn open(&self) -> Result<DeviceSinks, SinkError> {
        let sinks = DeviceSinks::new(
            self.sink(DeviceKind::Mouse, false, true),
            self.sink(DeviceKind::Keyboard, self.failing_keyboard, true),
        );
        Ok(match self.controller {
            Some(replaces) => {
                sinks.with_controller(1, self.sink(DeviceKind::Controller(1), false, replaces))
            }
            None => sinks,
        })
    }
}

/// Observer remembering what the playback thread reported.
#[derive(Default)]
pub(crate) struct Observed {
    pub(crate) warnings: Mutex<Vec<PlaybackWarning>>,
    pub(crate) reports: Mutex<Vec<PlaybackReport>>,
}

impl PlaybackObserver for Observed {
    fn warning(&self, warning: &PlaybackWarning) {
        self.warnings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(warning.clone());
    }

    fn finished(&self, report: &PlaybackReport) {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report.clone());
    }
}

pub(crate) fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub(crate) fn key_press(at: Instant, key: KeyCode) -> RawEvent {
    RawEvent {
        at,
        device: RawDevice::Keyboard,
        kind: RawKind::KeyPress(key),
    }
}

pub(crate) fn key_release(at: Instant, key: KeyCode) -> RawEvent {
    RawEvent {
        at,
        device: RawDevice::Keyboard,
        kind: RawKind::KeyRelease(key),
    }
}

pub(crate) fn mouse_move(at: Instant, x: f64, y: f64) -> RawEvent {
    RawEvent {
        at,
        device: RawDevice::Mouse,
        kind: RawKind::MouseMove { x, y },
    }
}

/// Keyboard-only recording with one key press at each offset.
pub(crate) fn recording_at(offsets_ms: &[u64]) -> Recording {
    let mut recording = Recording::new();
    for offset in offsets_ms {
        recording.push(Event {
            timestamp: ms(*offset),
            device: DeviceKind::Keyboard,
            action: Action::ButtonDown(Button::Key(KeyCode::KeyA)),
        });
    }
    recording
}

pub(crate) fn timestamps_ms(recording: &Recording) -> Vec<u128> {
    recording
        .events()
        .iter()
        .map(|e| e.timestamp.as_millis())
        .collect()
}

pub(crate) fn config() -> EngineConfig {
    EngineConfig::default()
}
