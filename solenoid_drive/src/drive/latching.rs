//! Pulse-and-redo sequence for DC-latching coils.
//!
//! ```text
//! Idle ─cmd─▶ Pulsing ─energise─▶ RedoWait ─interval─▶ Pulsing ─ … ─▶ SettleWait ─1s─▶ Idle
//!                                                               └─ (no enable pin) ─▶ Idle
//! ```
//!
//! There is no position feedback, so every command is followed by a fixed
//! number of redo pulses. Each redo pulses towards the solenoid's live
//! target, not the one captured when the sequence started.

use std::time::Duration;

use solenoid_common::consts::DC_LATCH_SETTLE_MS;
use solenoid_common::hal::output::DriveOutputs;
use solenoid_common::hal::types::level_from_bool;
use solenoid_common::solenoid::config::{ActuatorId, SolenoidConfig};
use tracing::debug;

use super::DriveContext;
use crate::timer::{Continuation, DriveStep, TimerName, TimerSlot};

const SETTLE_DELAY: Duration = Duration::from_millis(DC_LATCH_SETTLE_MS as u64);

/// Where a latching coil is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchPhase {
    /// Nothing pending.
    #[default]
    Idle,
    /// Pulse in progress.
    Pulsing,
    /// Between pulses.
    RedoWait,
    /// Waiting to disable the bridge.
    SettleWait,
}

impl LatchPhase {
    /// Short name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pulsing => "pulsing",
            Self::RedoWait => "redo_wait",
            Self::SettleWait => "settle_wait",
        }
    }
}

/// Drive for DC-latching coils.
#[derive(Debug, Clone)]
pub struct LatchingDrive {
    wiring: DriveOutputs,
    brake_is_high: bool,
    pulse_length: Duration,
    redo_count: u8,
    redo_interval: Duration,
    redo_counter: u8,
    pulses: u32,
    phase: LatchPhase,
    latch_pulse: TimerSlot,
}

impl LatchingDrive {
    /// Drive for `config`.
    pub fn new(actuator: ActuatorId, config: &SolenoidConfig, wiring: DriveOutputs) -> Self {
        Self {
            wiring,
            brake_is_high: config.brake_is_high,
            pulse_length: config.energise_duration(),
            redo_count: config.dc_latch_redo_count,
            redo_interval: config.redo_interval(),
            redo_counter: 0,
            pulses: 0,
            phase: LatchPhase::Idle,
            latch_pulse: TimerSlot::new(actuator, TimerName::LatchPulse),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> LatchPhase {
        self.phase
    }

    /// Redo pulses issued in the current sequence.
    #[inline]
    pub fn redo_counter(&self) -> u8 {
        self.redo_counter
    }

    /// Pulses issued since construction.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    #[inline]
    fn on_level(&self) -> bool {
        !self.brake_is_high
    }

    #[inline]
    fn off_level(&self) -> bool {
        self.brake_is_high
    }

    /// Start a fresh sequence towards `physical_on`.
    pub fn command(&mut self, physical_on: bool, ctx: &mut DriveContext<'_>) {
        self.redo_counter = 0;
        self.pulse(physical_on, ctx);
    }

    fn pulse(&mut self, physical_on: bool, ctx: &mut DriveContext<'_>) {
        self.latch_pulse.disarm(ctx.timers);

        let DriveOutputs {
            pin_a,
            pin_b,
            enable,
        } = self.wiring;
        let (a, b) = if physical_on {
            (self.on_level(), self.off_level())
        } else {
            (self.off_level(), self.on_level())
        };
        debug!(
            "{} latch pulse {} (a={a}, b={b})",
            self.latch_pulse.key(),
            if physical_on { "on" } else { "off" }
        );
        ctx.outputs.set_level(pin_a, level_from_bool(a));
        ctx.outputs.set_state(pin_b, b);
        if let Some(enable) = enable {
            ctx.outputs.turn_on(enable);
        }

        self.pulses = self.pulses.saturating_add(1);
        self.phase = LatchPhase::Pulsing;
        self.latch_pulse.arm(
            ctx.timers,
            self.pulse_length,
            Continuation::Drive(DriveStep::LatchRelease),
        );
    }

    /// End of a pulse: hold the brake pair while the field collapses, then
    /// schedule the next redo or the settle step.
    pub fn release(&mut self, ctx: &mut DriveContext<'_>) {
        if self.phase != LatchPhase::Pulsing {
            debug!("{} release while {}, ignored", self.latch_pulse.key(), self.phase.as_str());
            return;
        }
        let off = self.off_level();
        ctx.outputs.set_level(self.wiring.pin_a, level_from_bool(off));
        ctx.outputs.set_state(self.wiring.pin_b, off);

        if self.redo_counter < self.redo_count {
            self.redo_counter += 1;
            self.phase = LatchPhase::RedoWait;
            self.latch_pulse.arm(
                ctx.timers,
                self.redo_interval,
                Continuation::Drive(DriveStep::LatchRedo),
            );
            return;
        }

        self.redo_counter = 0;
        if self.wiring.has_enable() {
            self.phase = LatchPhase::SettleWait;
            self.latch_pulse.arm(ctx.timers, SETTLE_DELAY, Continuation::Drive(DriveStep::LatchSettle));
        } else {
            // Without an enable pin the legs cannot reach coast together;
            // staying at the brake pair avoids kicking the latch.
            self.phase = LatchPhase::Idle;
        }
    }

    /// Pulse again towards the live target.
    pub fn redo(&mut self, live_physical: bool, ctx: &mut DriveContext<'_>) {
        if self.phase != LatchPhase::RedoWait {
            debug!("{} redo while {}, ignored", self.latch_pulse.key(), self.phase.as_str());
            return;
        }
        self.pulse(live_physical, ctx);
    }

    /// Disable the bridge, then move both legs to coast.
    pub fn settle(&mut self, ctx: &mut DriveContext<'_>) {
        if self.phase != LatchPhase::SettleWait {
            return;
        }
        let DriveOutputs {
            pin_a,
            pin_b,
            enable,
        } = self.wiring;
        if let Some(enable) = enable {
            ctx.outputs.turn_off(enable);
        }
        let coast = !self.brake_is_high;
        ctx.outputs.set_level(pin_a, level_from_bool(coast));
        ctx.outputs.set_state(pin_b, coast);
        self.phase = LatchPhase::Idle;
    }
}
