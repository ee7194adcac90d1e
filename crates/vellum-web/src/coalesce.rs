#![forbid(unsafe_code)]

//! Event coalescer: per-type latest-event buffering behind a one-shot delay.
//!
//! Within one flush cycle only the most recent event of each type survives.
//! The cycle is `idle` (empty buffer, no deadline) → `pending` (buffered
//! events, one armed deadline) → `idle` again after the flush. Time is a
//! host-advanced monotonic `Duration`; the deadline is armed only on the
//! empty→non-empty transition, so at most one is outstanding at a time.
//!
//! The set of observed event types is host-controlled via watch/unwatch
//! lists. Stopping a watch only detaches the type; records it already
//! buffered still flush on the next expiry.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tracing::trace;

use crate::events::EventRecord;

/// Delay between the first buffered event of a cycle and its flush.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(100);

/// Coalescer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerConfig {
    /// How long after the first buffered event the cycle flushes.
    pub flush_delay: Duration,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            flush_delay: DEFAULT_FLUSH_DELAY,
        }
    }
}

/// Flush-cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalescerState {
    /// No buffered events, no armed deadline.
    Idle,
    /// At least one buffered event; one deadline armed.
    Pending,
}

/// Coalesces interaction events per type within a flush window.
#[derive(Debug, Clone)]
pub struct EventCoalescer {
    config: CoalescerConfig,
    watched: BTreeSet<String>,
    buffer: BTreeMap<String, EventRecord>,
    deadline: Option<Duration>,
}

impl Default for EventCoalescer {
    fn default() -> Self {
        Self::new(CoalescerConfig::default())
    }
}

impl EventCoalescer {
    #[must_use]
    pub fn new(config: CoalescerConfig) -> Self {
        Self {
            config,
            watched: BTreeSet::new(),
            buffer: BTreeMap::new(),
            deadline: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> CoalescerState {
        if self.deadline.is_some() {
            CoalescerState::Pending
        } else {
            CoalescerState::Idle
        }
    }

    /// Start observing the event types in a space-or-comma-separated list.
    /// Returns how many types were added.
    pub fn watch(&mut self, list: &str) -> usize {
        let mut added = 0;
        for kind in split_event_types(list) {
            if self.watched.insert(kind.to_string()) {
                added += 1;
            }
        }
        added
    }

    /// Stop observing the listed event types. Already-buffered records of
    /// those types still flush on the next expiry. Returns how many types
    /// were removed.
    pub fn unwatch(&mut self, list: &str) -> usize {
        let mut removed = 0;
        for kind in split_event_types(list) {
            if self.watched.remove(kind) {
                removed += 1;
            }
        }
        removed
    }

    #[must_use]
    pub fn is_watched(&self, kind: &str) -> bool {
        self.watched.contains(kind)
    }

    /// Buffer a record, overwriting any previous record of the same type.
    /// Arms the flush deadline when the buffer was empty. Records of
    /// unwatched types are ignored; returns whether the record was buffered.
    pub fn observe(&mut self, record: EventRecord, now: Duration) -> bool {
        if !self.is_watched(record.kind()) {
            trace!(kind = record.kind(), "ignoring unwatched event");
            return false;
        }
        if self.deadline.is_none() {
            self.deadline = Some(now + self.config.flush_delay);
        }
        trace!(kind = record.kind(), "buffered event");
        self.buffer.insert(record.kind().to_string(), record);
        true
    }

    /// Next flush instant, for hosts scheduling their own wakeup.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Flush if the armed deadline has passed. The buffer is swapped out
    /// atomically; one record per buffered type is returned, in type order,
    /// and the coalescer returns to idle.
    pub fn poll(&mut self, now: Duration) -> Vec<EventRecord> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let buffer = std::mem::take(&mut self.buffer);
                buffer.into_values().collect()
            }
            _ => Vec::new(),
        }
    }
}

fn split_event_types(list: &str) -> impl Iterator<Item = &str> {
    list.split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|token| !token.is_empty())
}
