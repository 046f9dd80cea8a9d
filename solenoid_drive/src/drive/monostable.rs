//! Energise/hold sequence for AC and DC coils.

use std::time::Duration;

use solenoid_common::hal::output::DriveOutputs;
use solenoid_common::hal::types::level_from_bool;
use solenoid_common::solenoid::config::{ActuatorId, SolenoidConfig};
use tracing::debug;

use super::DriveContext;
use crate::timer::{Continuation, DriveStep, TimerName, TimerSlot};

/// Where a monostable coil is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonostablePhase {
    /// De-energised, bridge at coast.
    #[default]
    Off,
    /// Full energise power, hold pending.
    Energise,
    /// Reduced hold power.
    Hold,
}

impl MonostablePhase {
    /// Short name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Energise => "energise",
            Self::Hold => "hold",
        }
    }
}

/// Drive for AC and DC coils.
#[derive(Debug, Clone)]
pub struct MonostableDrive {
    wiring: DriveOutputs,
    brake_level: bool,
    energise_level: f64,
    hold_level: f64,
    energise_duration: Duration,
    phase: MonostablePhase,
    start_hold: TimerSlot,
}

impl MonostableDrive {
    /// Drive for `config`. Energise and hold levels are polarity-corrected
    /// once here.
    pub fn new(actuator: ActuatorId, config: &SolenoidConfig, wiring: DriveOutputs) -> Self {
        Self {
            wiring,
            brake_level: config.brake_level(),
            energise_level: config.corrected_power(config.energise_power_percent),
            hold_level: config.corrected_power(config.hold_power_percent),
            energise_duration: config.energise_duration(),
            phase: MonostablePhase::Off,
            start_hold: TimerSlot::new(actuator, TimerName::StartHold),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MonostablePhase {
        self.phase
    }

    /// Pin A level written while energising.
    #[inline]
    pub fn energise_level(&self) -> f64 {
        self.energise_level
    }

    /// Pin A level written while holding.
    #[inline]
    pub fn hold_level(&self) -> f64 {
        self.hold_level
    }

    /// Switch the coil on or off.
    pub fn drive(&mut self, physical_on: bool, ctx: &mut DriveContext<'_>) {
        self.start_hold.disarm(ctx.timers);
        if physical_on {
            self.drive_on(ctx);
        } else {
            self.drive_off(ctx);
        }
    }

    fn drive_on(&mut self, ctx: &mut DriveContext<'_>) {
        let DriveOutputs {
            pin_a,
            pin_b,
            enable,
        } = self.wiring;
        ctx.outputs.set_state(pin_b, self.brake_level);
        ctx.outputs.set_level(pin_a, self.energise_level);
        if let Some(enable) = enable {
            ctx.outputs.turn_on(enable);
        }
        self.phase = MonostablePhase::Energise;
        self.start_hold.arm(
            ctx.timers,
            self.energise_duration,
            Continuation::Drive(DriveStep::ReachHold),
        );
    }

    fn drive_off(&mut self, ctx: &mut DriveContext<'_>) {
        let DriveOutputs {
            pin_a,
            pin_b,
            enable,
        } = self.wiring;
        // Enable goes first so the bridge never drives while the legs move.
        if let Some(enable) = enable {
            ctx.outputs.turn_off(enable);
        }
        let coast = !self.brake_level;
        ctx.outputs.set_state(pin_b, coast);
        ctx.outputs.set_level(pin_a, level_from_bool(coast));
        self.phase = MonostablePhase::Off;
    }

    /// Drop from energise to hold power.
    pub fn reach_hold(&mut self, ctx: &mut DriveContext<'_>) {
        if self.phase != MonostablePhase::Energise {
            debug!("{} hold step while {}, ignored", self.start_hold.key(), self.phase.as_str());
            return;
        }
        ctx.outputs.set_level(self.wiring.pin_a, self.hold_level);
        self.phase = MonostablePhase::Hold;
    }
}
