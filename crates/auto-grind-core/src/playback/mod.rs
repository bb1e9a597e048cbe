mod cancel;
mod echo;
mod engine;
mod sink;

pub use {
    cancel::{CancelToken, WaitOutcome},
    engine::{
        PlaybackEngine, PlaybackHandle, PlaybackRejected, PlaybackReport, PlaybackResult,
        PlaybackWarning,
    },
    sink::{DeviceSinks, InputSink, PlaybackObserver, SinkError, SinkFactory},
};
