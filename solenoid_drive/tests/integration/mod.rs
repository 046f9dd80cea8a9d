//! Shared helpers for the integration tests.

mod interlock;
mod latching;
mod monostable;
mod setup;

use std::time::Duration;

use solenoid_common::prelude::*;
use solenoid_drive::{DriveStrategy, SolenoidController};

// ── Helpers ─────────────────────────────────────────────────────────

/// Output bus keeping current levels and every write.
#[derive(Debug)]
pub struct Bus {
    pub snapshot: OutputSnapshot,
    pub journal: Vec<OutputWrite>,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            snapshot: OutputSnapshot::new(8, 8),
            journal: Vec::new(),
        }
    }
}

impl OutputBus for Bus {
    fn set_level(&mut self, channel: AnalogChannel, level: f64) {
        self.snapshot.analog[channel.index()] = level;
        self.journal.push(OutputWrite::Level { channel, level });
    }

    fn set_state(&mut self, channel: DigitalChannel, state: bool) {
        self.snapshot.digital[channel.index()] = state;
        self.journal.push(OutputWrite::State { channel, state });
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn level(c: &SolenoidController<Bus>, channel: u16) -> f64 {
    c.outputs().snapshot.analog[channel as usize]
}

pub fn state(c: &SolenoidController<Bus>, channel: u16) -> bool {
    c.outputs().snapshot.digital[channel as usize]
}

/// Latch pulses issued so far by `id`.
pub fn pulses(c: &SolenoidController<Bus>, id: ActuatorId) -> u32 {
    match c.solenoid(id).map(|s| s.drive()) {
        Some(DriveStrategy::Latching(drive)) => drive.pulses(),
        _ => 0,
    }
}

/// Advance deadline by deadline until no timer is left.
pub fn run_until_idle(c: &mut SolenoidController<Bus>) {
    while let Some(deadline) = c.next_deadline() {
        let dt = deadline.saturating_sub(c.now());
        c.advance(dt);
    }
}
