//! Interlocks: at most one member of a group may be energised.
//!
//! Activating a solenoid commands every other ON member of its group OFF.
//! With a non-zero wait time the activation is deferred and re-issued
//! later through the full command path, so whatever was requested last
//! wins.

use std::time::Duration;

use heapless::Vec as HVec;
use solenoid_common::consts::MAX_INTERLOCK_MEMBERS;
use solenoid_common::solenoid::config::ActuatorId;
use tracing::debug;

use crate::error::SolenoidError;
use crate::timer::{Continuation, Scheduler, TimerName, TimerSlot};

// ─── InterlockGroup ─────────────────────────────────────────────────

/// Members of an interlock group and the settle delay.
///
/// A solenoid may list itself; it is skipped when looking for conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterlockGroup {
    members: HVec<ActuatorId, MAX_INTERLOCK_MEMBERS>,
    wait_time_ms: u32,
}

impl InterlockGroup {
    /// Empty group with the given settle delay. `0` coordinates
    /// synchronously.
    pub const fn new(wait_time_ms: u32) -> Self {
        Self {
            members: HVec::new(),
            wait_time_ms,
        }
    }

    /// Add `member` to the group owned by `owner`. Repeats are ignored.
    pub fn push(&mut self, owner: ActuatorId, member: ActuatorId) -> Result<(), SolenoidError> {
        if self.members.contains(&member) {
            return Ok(());
        }
        self.members
            .push(member)
            .map_err(|_| SolenoidError::InterlockFull {
                actuator: owner,
                max: MAX_INTERLOCK_MEMBERS,
            })
    }

    /// All members, including the owner if listed.
    #[inline]
    pub fn members(&self) -> &[ActuatorId] {
        &self.members
    }

    /// Members other than `owner`.
    pub fn peers_of(&self, owner: ActuatorId) -> impl Iterator<Item = ActuatorId> + '_ {
        self.members.iter().copied().filter(move |m| *m != owner)
    }

    /// Whether the group is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Settle delay in milliseconds.
    #[inline]
    pub const fn wait_time_ms(&self) -> u32 {
        self.wait_time_ms
    }

    /// Settle delay.
    pub fn wait_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.wait_time_ms))
    }
}

// ─── Coordination ───────────────────────────────────────────────────

/// Outcome of an activation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Drive now.
    Proceed,
    /// A re-check is scheduled; do not drive or publish.
    Deferred,
}

/// What the coordinator needs from the rest of the bank.
pub trait InterlockPeers {
    /// Logical state of `peer`.
    fn is_on(&self, peer: ActuatorId) -> bool;

    /// Run the full OFF command of `peer`.
    fn command_off(&mut self, peer: ActuatorId);

    /// Scheduler for the re-check timer.
    fn timers(&mut self) -> &mut dyn Scheduler;
}

/// Interlock state of one solenoid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterlockCoordinator {
    actuator: ActuatorId,
    group: InterlockGroup,
    recheck: TimerSlot,
}

impl InterlockCoordinator {
    /// Coordinator for `actuator` against `group`.
    pub const fn new(actuator: ActuatorId, group: InterlockGroup) -> Self {
        Self {
            actuator,
            group,
            recheck: TimerSlot::new(actuator, TimerName::Interlock),
        }
    }

    /// Owning solenoid.
    #[inline]
    pub const fn actuator(&self) -> ActuatorId {
        self.actuator
    }

    /// Group this solenoid is interlocked with.
    #[inline]
    pub fn group(&self) -> &InterlockGroup {
        &self.group
    }

    /// Force conflicting peers OFF before `actuator` is energised.
    ///
    /// `desired` is the logical state being commanded; it is replayed
    /// verbatim when a deferred re-check fires.
    pub fn request_activation(&self, desired: bool, peers: &mut dyn InterlockPeers) -> Activation {
        let mut forced = false;
        for peer in self.group.peers_of(self.actuator) {
            if peers.is_on(peer) {
                debug!("{} forces {} off", self.actuator, peer);
                peers.command_off(peer);
                forced = true;
            }
        }

        if forced && self.group.wait_time_ms != 0 {
            self.recheck.arm(
                peers.timers(),
                self.group.wait_time(),
                Continuation::Interlock { desired },
            );
            return Activation::Deferred;
        }

        self.recheck.disarm(peers.timers());
        Activation::Proceed
    }

    /// An OFF command supersedes any deferred activation.
    pub fn release(&self, timers: &mut dyn Scheduler) {
        if self.recheck.disarm(timers) {
            debug!("{} deferred activation cancelled", self.actuator);
        }
    }
}
