//! Output write records and snapshots.
//!
//! - `OutputWrite` - a single write issued on the bus, kept in journals
//! - `OutputSnapshot` - current level of every output in a bank

use crate::hal::output::{AnalogChannel, DigitalChannel};
use serde::{Deserialize, Serialize};

/// Continuous level equivalent of a logic level.
///
/// Brake and coast pairs drive pin A fully low or fully high.
#[inline]
pub const fn level_from_bool(state: bool) -> f64 {
    if state { 1.0 } else { 0.0 }
}

/// A single output write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputWrite {
    /// Continuous output written.
    Level {
        /// Target channel.
        channel: AnalogChannel,
        /// Level in `[0.0, 1.0]`.
        level: f64,
    },
    /// Discrete output written.
    State {
        /// Target channel.
        channel: DigitalChannel,
        /// New state.
        state: bool,
    },
}

impl OutputWrite {
    /// Whether this write targets the given continuous channel.
    pub fn is_level_on(&self, target: AnalogChannel) -> bool {
        matches!(self, Self::Level { channel, .. } if *channel == target)
    }

    /// Whether this write targets the given discrete channel.
    pub fn is_state_on(&self, target: DigitalChannel) -> bool {
        matches!(self, Self::State { channel, .. } if *channel == target)
    }
}

/// Levels of every output in a bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    /// Continuous outputs, indexed by channel.
    pub analog: Vec<f64>,
    /// Discrete outputs, indexed by channel.
    pub digital: Vec<bool>,
}

impl OutputSnapshot {
    /// Snapshot with all outputs low.
    pub fn new(analog: usize, digital: usize) -> Self {
        Self {
            analog: vec![0.0; analog],
            digital: vec![false; digital],
        }
    }

    /// Level of a continuous output, `None` if out of range.
    pub fn level(&self, channel: AnalogChannel) -> Option<f64> {
        self.analog.get(channel.index()).copied()
    }

    /// State of a discrete output, `None` if out of range.
    pub fn state(&self, channel: DigitalChannel) -> Option<bool> {
        self.digital.get(channel.index()).copied()
    }
}
