//! Single-slot scheduled action.

use std::time::Duration;

use solenoid_common::solenoid::config::ActuatorId;
use tracing::trace;

use super::{Continuation, Scheduler, TimerKey, TimerName};

/// At most one outstanding timer per actuator and name.
///
/// [`TimerSlot::arm`] always cancels before scheduling, so two timers of the
/// same slot can never race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSlot {
    key: TimerKey,
}

impl TimerSlot {
    /// Slot `name` of `actuator`.
    pub const fn new(actuator: ActuatorId, name: TimerName) -> Self {
        Self {
            key: TimerKey::new(actuator, name),
        }
    }

    /// Key of this slot.
    #[inline]
    pub const fn key(&self) -> TimerKey {
        self.key
    }

    /// Replace whatever is pending with `continuation` after `delay`.
    pub fn arm(&self, timers: &mut dyn Scheduler, delay: Duration, continuation: Continuation) {
        timers.cancel(self.key);
        trace!("arm {} in {:?}: {:?}", self.key, delay, continuation);
        timers.schedule(self.key, delay, continuation);
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&self, timers: &mut dyn Scheduler) -> bool {
        let cancelled = timers.cancel(self.key);
        if cancelled {
            trace!("disarm {}", self.key);
        }
        cancelled
    }
}
