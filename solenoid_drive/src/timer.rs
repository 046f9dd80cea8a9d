//! Named, cancelable delayed continuations.
//!
//! The scheduler contract is two calls: schedule a continuation under a
//! name, cancel by name. Continuations are plain data; the controller
//! interprets them against live state when they fire.

mod queue;
mod slot;

pub use queue::{FiredTimer, TimerQueue};
pub use slot::TimerSlot;

use core::fmt;
use solenoid_common::solenoid::config::ActuatorId;
use std::time::Duration;

/// Timer names, one slot each per actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerName {
    /// Deferred interlock re-check.
    Interlock,
    /// Monostable energise → hold transition.
    StartHold,
    /// Any step of the latch pulse sequence.
    LatchPulse,
}

impl TimerName {
    /// Short name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interlock => "interlock",
            Self::StartHold => "start_hold",
            Self::LatchPulse => "latch_pulse",
        }
    }
}

/// Identity of a pending timer: actuator plus timer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerKey {
    /// Owning actuator.
    pub actuator: ActuatorId,
    /// Slot name.
    pub name: TimerName,
}

impl TimerKey {
    /// Build a key.
    pub const fn new(actuator: ActuatorId, name: TimerName) -> Self {
        Self { actuator, name }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.actuator, self.name.as_str())
    }
}

/// Deferred drive-sequence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStep {
    /// Monostable: drop from energise to hold power.
    ReachHold,
    /// Latching: end of pulse, fall back to the brake pair.
    LatchRelease,
    /// Latching: pulse again towards the live target state.
    LatchRedo,
    /// Latching, 3-pin only: disable the bridge and coast.
    LatchSettle,
}

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Re-issue the full command with the captured logical target.
    Interlock {
        /// Logical state that was requested.
        desired: bool,
    },
    /// Continue the drive sequence.
    Drive(DriveStep),
}

/// Scheduler contract consumed by the drive strategies and interlocks.
///
/// Scheduling under a pending key replaces it. Callers in this crate cancel
/// explicitly before rescheduling regardless.
pub trait Scheduler {
    /// Run `continuation` for `key` after `delay`.
    fn schedule(&mut self, key: TimerKey, delay: Duration, continuation: Continuation);

    /// Drop the pending timer for `key`. Returns whether one was pending.
    fn cancel(&mut self, key: TimerKey) -> bool;
}
