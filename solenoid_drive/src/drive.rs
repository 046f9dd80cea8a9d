//! Per-type drive sequences.
//!
//! The strategy is picked once from the solenoid type when the solenoid
//! is registered. Strategies reason in physical on/off terms only; inversion
//! is applied by the controller before they are called.

mod latching;
mod monostable;

pub use latching::{LatchPhase, LatchingDrive};
pub use monostable::{MonostableDrive, MonostablePhase};

use solenoid_common::hal::output::{DriveOutputs, OutputBus};
use solenoid_common::solenoid::config::{ActuatorId, SolenoidConfig};

use crate::timer::{DriveStep, Scheduler};

/// Borrowed collaborators for one drive call.
pub struct DriveContext<'a> {
    /// Output channels shared by the whole bank.
    pub outputs: &'a mut dyn OutputBus,
    /// Deferred step scheduler.
    pub timers: &'a mut dyn Scheduler,
}

/// Drive sequence of one solenoid.
#[derive(Debug, Clone)]
pub enum DriveStrategy {
    /// AC and DC coils: energise, then hold.
    Monostable(MonostableDrive),
    /// DC-latching coils: pulse, release, redo.
    Latching(LatchingDrive),
}

impl DriveStrategy {
    /// Strategy for `config`, writing to `wiring`.
    pub fn new(actuator: ActuatorId, config: &SolenoidConfig, wiring: DriveOutputs) -> Self {
        if config.solenoid_type.is_monostable() {
            Self::Monostable(MonostableDrive::new(actuator, config, wiring))
        } else {
            Self::Latching(LatchingDrive::new(actuator, config, wiring))
        }
    }

    /// Start the sequence towards `physical_on`.
    pub fn drive(&mut self, physical_on: bool, ctx: &mut DriveContext<'_>) {
        match self {
            Self::Monostable(drive) => drive.drive(physical_on, ctx),
            Self::Latching(drive) => drive.command(physical_on, ctx),
        }
    }

    /// Continue the sequence after a timer fired.
    ///
    /// `live_physical` is the physical target derived from the solenoid's
    /// current logical state, not the one the sequence started with.
    pub fn on_timer(&mut self, step: DriveStep, live_physical: bool, ctx: &mut DriveContext<'_>) {
        match (self, step) {
            (Self::Monostable(drive), DriveStep::ReachHold) => drive.reach_hold(ctx),
            (Self::Latching(drive), DriveStep::LatchRelease) => drive.release(ctx),
            (Self::Latching(drive), DriveStep::LatchRedo) => drive.redo(live_physical, ctx),
            (Self::Latching(drive), DriveStep::LatchSettle) => drive.settle(ctx),
            (_, step) => tracing::warn!("drive step {step:?} does not apply, ignored"),
        }
    }

    /// Latch redo counter; always 0 for monostable coils.
    pub fn redo_counter(&self) -> u8 {
        match self {
            Self::Monostable(_) => 0,
            Self::Latching(drive) => drive.redo_counter(),
        }
    }

    /// Short phase name for logs and snapshots.
    pub fn phase_name(&self) -> &'static str {
        match self {
            Self::Monostable(drive) => drive.phase().as_str(),
            Self::Latching(drive) => drive.phase().as_str(),
        }
    }
}
