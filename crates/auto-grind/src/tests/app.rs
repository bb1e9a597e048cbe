use crate::{AppCommand, ChannelObserver};

use auto_grind_core::{PlaybackObserver, PlaybackReport, PlaybackWarning};

use tokio::sync::mpsc;

/// WHAT: Playback notices never block on a full queue
/// WHY: The control loop may be joining the playback thread
#[test]
#[allow(clippy::unwrap_used)]
fn given_full_queue_when_playback_finishes_then_observer_returns() {
    // Given: A queue with no room left
    let (command_tx, mut command_rx) = mpsc::channel(1);
    command_tx.try_send(AppCommand::Shutdown).unwrap();
    let observer = ChannelObserver { command_tx };

    // When: Playback reports completion
    observer.finished(&PlaybackReport::default());

    // Then: It returned, and the notice was dropped
    assert!(matches!(command_rx.try_recv().unwrap(), AppCommand::Shutdown));
    assert!(command_rx.try_recv().is_err());
}

/// WHAT: Warnings and completion reach the control loop
/// WHY: The user is told about identity mismatches
#[test]
#[allow(clippy::unwrap_used)]
fn given_room_in_queue_when_warning_then_forwarded() {
    let (command_tx, mut command_rx) = mpsc::channel(4);
    let observer = ChannelObserver { command_tx };
    let warning = PlaybackWarning::DeviceIdentityMismatch { controller: 1 };

    observer.warning(&warning);
    observer.finished(&PlaybackReport::default());

    assert!(matches!(
        command_rx.try_recv().unwrap(),
        AppCommand::PlaybackWarning(w) if w == warning
    ));
    assert!(matches!(command_rx.try_recv().unwrap(), AppCommand::PlaybackFinished));
}

/// WHAT: The controller sink fails every emission and flags identity
/// WHY: No gamepad driver exists here, so replay must warn instead of lying
#[cfg(not(windows))]
#[test]
fn given_unavailable_controller_when_emitting_then_error_and_not_replacing() {
    use crate::enigo_sink::UnavailableControllerSink;

    use auto_grind_core::{Action, Axis, InputSink};

    let mut sink = UnavailableControllerSink;

    let result = sink.emit(&Action::AxisChange {
        axis: Axis::LeftStickX,
        value: 0.5,
    });

    assert!(result.is_err());
    assert!(!sink.replaces_physical_device());
}
