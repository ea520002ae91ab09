//! `EventQueue` — the globally ordered pending-event store.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use mmt_core::SimTime;

use crate::{Event, EventKind};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EventError {
    /// An event was pushed with a timestamp strictly before the last popped
    /// time.  This is a programming error in whatever scheduled it: the past
    /// is finalized and may not be appended to.
    #[error("causality violation: cannot schedule {kind:?} at {time}, last popped time is {last_popped}")]
    CausalityViolation {
        time: SimTime,
        last_popped: SimTime,
        kind: EventKind,
    },
}

pub type EventResult<T> = Result<T, EventError>;

// ── EventQueue ────────────────────────────────────────────────────────────────

/// Min-heap of pending events ordered by `(time, priority, sequence)`.
///
/// `pop` on an empty queue returns `None` — the normal simulation-termination
/// signal, not an error.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
    /// Monotonically increasing stamp assigned to each pushed event.
    next_sequence: u64,
    /// Timestamp of the most recently popped event; the causality floor.
    last_popped: Option<SimTime>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `time` with the kind's default priority.
    ///
    /// Rejects `time` strictly before the last popped time with
    /// [`EventError::CausalityViolation`].  Scheduling *at* the current time
    /// is allowed — handlers routinely enqueue follow-up events for the same
    /// instant (at a later priority or sequence).
    pub fn push(&mut self, time: SimTime, kind: EventKind) -> EventResult<()> {
        self.push_with_priority(time, kind.priority(), kind)
    }

    /// Schedule `kind` at `time` with an explicit priority value.
    ///
    /// Escape hatch for callers that need to order events within a timestamp
    /// differently from the kind's precedence class; the kernel itself
    /// always goes through [`push`][Self::push].
    pub fn push_with_priority(
        &mut self,
        time: SimTime,
        priority: u8,
        kind: EventKind,
    ) -> EventResult<()> {
        if let Some(last) = self.last_popped
            && time < last
        {
            return Err(EventError::CausalityViolation {
                time,
                last_popped: last,
                kind,
            });
        }
        let event = Event {
            time,
            priority,
            sequence: self.next_sequence,
            kind,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(event));
        Ok(())
    }

    /// Remove and return the next event, or `None` if the queue is empty.
    ///
    /// Records the popped timestamp as the new causality floor.
    pub fn pop(&mut self) -> Option<Event> {
        let Reverse(event) = self.heap.pop()?;
        self.last_popped = Some(event.time);
        Some(event)
    }

    /// Timestamp of the next event without removing it.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(e)| e.time)
    }

    /// Timestamp of the most recently popped event.
    pub fn last_popped_time(&self) -> Option<SimTime> {
        self.last_popped
    }

    /// Discard all pending events (used by `stop`).  The causality floor is
    /// kept so a stopped queue cannot be rewound and reused.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
