//! Output bus trait and channel handles.
//!
//! This module defines:
//! - `AnalogChannel` / `DigitalChannel` - non-owning handles to physical outputs
//! - `DriveOutputs` - the H-bridge wiring of one solenoid
//! - `OutputBus` - interface to the hardware layer that owns the outputs

use core::fmt;
use serde::{Deserialize, Serialize};

/// Handle to a continuous-level (PWM) output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalogChannel(pub u16);

/// Handle to a discrete (on/off) output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigitalChannel(pub u16);

impl AnalogChannel {
    /// Channel index into the hardware output bank.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl DigitalChannel {
    /// Channel index into the hardware output bank.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AnalogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ao{}", self.0)
    }
}

impl fmt::Display for DigitalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "do{}", self.0)
    }
}

/// H-bridge wiring of a single solenoid.
///
/// `pin_a` carries the modulated drive level, `pin_b` the polarity/brake
/// level. 3-pin bridges additionally gate the legs through `enable`.
/// Several solenoids may share a channel; ownership stays with the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveOutputs {
    /// Continuous-level output (required).
    pub pin_a: AnalogChannel,
    /// Discrete polarity/brake output (required).
    pub pin_b: DigitalChannel,
    /// Bridge enable output (3-pin bridges only).
    pub enable: Option<DigitalChannel>,
}

impl DriveOutputs {
    /// 2-pin bridge wiring.
    pub const fn two_pin(pin_a: AnalogChannel, pin_b: DigitalChannel) -> Self {
        Self {
            pin_a,
            pin_b,
            enable: None,
        }
    }

    /// 3-pin bridge wiring.
    pub const fn three_pin(pin_a: AnalogChannel, pin_b: DigitalChannel, enable: DigitalChannel) -> Self {
        Self {
            pin_a,
            pin_b,
            enable: Some(enable),
        }
    }

    /// Whether the bridge has an enable output.
    #[inline]
    pub const fn has_enable(&self) -> bool {
        self.enable.is_some()
    }
}

/// Interface to the hardware layer owning the physical outputs.
///
/// Writes never fail from the caller's point of view: I/O faults are the
/// hardware layer's concern.
pub trait OutputBus {
    /// Set a continuous output to `level` in `[0.0, 1.0]`.
    fn set_level(&mut self, channel: AnalogChannel, level: f64);

    /// Set a discrete output.
    fn set_state(&mut self, channel: DigitalChannel, state: bool);

    /// Switch a discrete output on.
    fn turn_on(&mut self, channel: DigitalChannel) {
        self.set_state(channel, true);
    }

    /// Switch a discrete output off.
    fn turn_off(&mut self, channel: DigitalChannel) {
        self.set_state(channel, false);
    }
}

impl<T: OutputBus + ?Sized> OutputBus for &mut T {
    fn set_level(&mut self, channel: AnalogChannel, level: f64) {
        (**self).set_level(channel, level);
    }

    fn set_state(&mut self, channel: DigitalChannel, state: bool) {
        (**self).set_state(channel, state);
    }
}
