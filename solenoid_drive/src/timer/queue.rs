//! Cooperative timer queue on a virtual monotonic clock.
//!
//! The queue never fires anything itself: the owner pops due timers with
//! [`TimerQueue::pop_due`] and dispatches them, which keeps every callback
//! on the caller's thread and in deadline order.

use std::time::Duration;

use tracing::trace;

use super::{Continuation, Scheduler, TimerKey};

/// A pending timer entry.
#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    key: TimerKey,
    deadline: Duration,
    /// Insertion order, breaks deadline ties.
    seq: u64,
    continuation: Continuation,
}

/// A timer popped from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Slot that fired.
    pub key: TimerKey,
    /// Clock value at which it fired.
    pub deadline: Duration,
    /// What to do.
    pub continuation: Continuation,
}

/// Name-keyed timer queue.
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Virtual clock, time since the queue was created.
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    /// Empty queue at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether `key` is pending.
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.iter().any(|t| t.key == key)
    }

    /// Deadline of `key`, if pending.
    pub fn deadline(&self, key: TimerKey) -> Option<Duration> {
        self.pending.iter().find(|t| t.key == key).map(|t| t.deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves forward to the popped deadline. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<FiredTimer> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(idx, _)| idx)?;

        let timer = self.pending.remove(idx);
        self.now = self.now.max(timer.deadline);
        trace!("fire {} at {:?}", timer.key, self.now);
        Some(FiredTimer {
            key: timer.key,
            deadline: timer.deadline,
            continuation: timer.continuation,
        })
    }

    /// Move the clock forward to `to`. Never moves backwards.
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, key: TimerKey, delay: Duration, continuation: Continuation) {
        self.pending.retain(|t| t.key != key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            key,
            deadline: self.now + delay,
            seq,
            continuation,
        });
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.key != key);
        before != self.pending.len()
    }
}
