use crate::event::Event;

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Ordered timeline of captured events plus metadata.
///
/// Timestamps never decrease and the first event sits at zero. Events are
/// only ever appended, never reordered or dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Wall-clock time the first capture session began.
    pub created_at: SystemTime,
    /// Number of append segments concatenated onto the first capture.
    pub append_count: u32,
    events: Vec<Event>,
}

impl Recording {
    /// Empty recording created now.
    pub fn new() -> Self {
        Self {
            created_at: SystemTime::now(),
            append_count: 0,
            events: Vec::new(),
        }
    }

    /// Append one event, clamping its timestamp so ordering holds.
    ///
    /// The first event of an empty recording is re-based to zero.
    pub fn push(&mut self, mut event: Event) {
        match self.events.last() {
            None => event.timestamp = Duration::ZERO,
            Some(last) if event.timestamp < last.timestamp => {
                trace!(
                    timestamp_us = event.timestamp.as_micros(),
                    last_us = last.timestamp.as_micros(),
                    "Clamping out-of-order event"
                );
                event.timestamp = last.timestamp;
            }
            Some(_) => {}
        }
        self.events.push(event);
    }

    /// Events in playback order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Timestamp of the last event, zero when empty.
    pub fn duration(&self) -> Duration {
        self.events
            .last()
            .map(|e| e.timestamp)
            .unwrap_or(Duration::ZERO)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event was captured.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// New recording holding the first `count` events, keeping metadata.
    pub fn prefix(&self, count: usize) -> Self {
        Self {
            created_at: self.created_at,
            append_count: self.append_count,
            events: self.events.iter().take(count).cloned().collect(),
        }
    }

    /// Whether the ordering invariant holds.
    ///
    /// Always true for recordings built through [`Recording::push`]; used to
    /// vet recordings read back from disk.
    pub fn is_ordered(&self) -> bool {
        self.events.first().is_none_or(|e| e.timestamp.is_zero())
            && self
                .events
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp)
    }
}

impl Default for Recording {
    fn default() -> Self {
        Self::new()
    }
}
