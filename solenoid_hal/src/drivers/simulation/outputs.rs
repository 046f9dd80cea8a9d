//! Simulated analog and digital outputs.
//!
//! The `SimulatedOutputs` bank keeps:
//! - the current level of every continuous and discrete output
//! - a journal of every write in issue order
//! - a count of writes addressed to channels the bank does not have

use solenoid_common::hal::output::{AnalogChannel, DigitalChannel, OutputBus};
use solenoid_common::hal::types::{OutputSnapshot, OutputWrite};
use solenoid_common::solenoid::bank::OutputCounts;
use tracing::{debug, trace, warn};

/// In-memory output bank.
#[derive(Debug, Clone)]
pub struct SimulatedOutputs {
    /// Current output levels.
    snapshot: OutputSnapshot,
    /// Every accepted write, oldest first.
    journal: Vec<OutputWrite>,
    /// Writes to missing channels.
    rejected: usize,
}

impl SimulatedOutputs {
    /// Bank with `counts` outputs, all low.
    pub fn new(counts: &OutputCounts) -> Self {
        debug!(
            "SimulatedOutputs initialized: {} AO, {} DO",
            counts.analog, counts.digital
        );
        Self {
            snapshot: OutputSnapshot::new(counts.analog as usize, counts.digital as usize),
            journal: Vec::new(),
            rejected: 0,
        }
    }

    /// Current levels.
    pub fn snapshot(&self) -> &OutputSnapshot {
        &self.snapshot
    }

    /// Level of a continuous output.
    pub fn level(&self, channel: AnalogChannel) -> Option<f64> {
        self.snapshot.level(channel)
    }

    /// State of a discrete output.
    pub fn state(&self, channel: DigitalChannel) -> Option<bool> {
        self.snapshot.state(channel)
    }

    /// Writes since construction or the last [`take_journal`](Self::take_journal).
    pub fn journal(&self) -> &[OutputWrite] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<OutputWrite> {
        std::mem::take(&mut self.journal)
    }

    /// Writes dropped because the channel does not exist.
    pub fn rejected_writes(&self) -> usize {
        self.rejected
    }
}

impl OutputBus for SimulatedOutputs {
    fn set_level(&mut self, channel: AnalogChannel, level: f64) {
        let Some(slot) = self.snapshot.analog.get_mut(channel.index()) else {
            warn!("write to missing output {channel} dropped");
            self.rejected += 1;
            return;
        };
        let level = level.clamp(0.0, 1.0);
        trace!("{channel} <- {level:.3}");
        *slot = level;
        self.journal.push(OutputWrite::Level { channel, level });
    }

    fn set_state(&mut self, channel: DigitalChannel, state: bool) {
        let Some(slot) = self.snapshot.digital.get_mut(channel.index()) else {
            warn!("write to missing output {channel} dropped");
            self.rejected += 1;
            return;
        };
        trace!("{channel} <- {state}");
        *slot = state;
        self.journal.push(OutputWrite::State { channel, state });
    }
}
