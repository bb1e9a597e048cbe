mod listener;

pub use listener::{CaptureBase, CaptureDecision, CaptureListener};
