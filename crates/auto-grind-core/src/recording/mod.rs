#[allow(clippy::module_inception)]
mod recording;
mod store;

pub use {recording::Recording, store::RecordingStore};
