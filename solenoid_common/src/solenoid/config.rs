//! Per-solenoid drive parameters.
//!
//! `SolenoidConfig` is fixed once the controller is set up. Changing it
//! while a drive sequence is in flight is not supported.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_DC_LATCH_REDO_COUNT, DEFAULT_DC_LATCH_REDO_INTERVAL_MS, DEFAULT_ENERGISE_POWER,
    DEFAULT_HOLD_POWER,
};

// ─── ActuatorId ─────────────────────────────────────────────────────

/// Arena index of a solenoid inside a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorId(pub u16);

impl ActuatorId {
    /// Index into the controller arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── SolenoidType ───────────────────────────────────────────────────

/// Solenoid construction, selecting the drive sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolenoidType {
    /// Monostable AC coil driven with DC: energise, then hold at reduced duty.
    Ac,
    /// Monostable DC coil: energise, then hold at reduced duty.
    Dc,
    /// Bistable coil held by a permanent magnet, moved by short pulses.
    DcLatching,
}

impl SolenoidType {
    /// Whether this type uses the energise/hold sequence.
    #[inline]
    pub const fn is_monostable(self) -> bool {
        matches!(self, Self::Ac | Self::Dc)
    }
}

impl fmt::Display for SolenoidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ac => write!(f, "AC"),
            Self::Dc => write!(f, "DC"),
            Self::DcLatching => write!(f, "DC Latching"),
        }
    }
}

impl FromStr for SolenoidType {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AC" => Ok(Self::Ac),
            "DC" => Ok(Self::Dc),
            "DC_LATCHING" => Ok(Self::DcLatching),
            _ => Err(ConfigError::ValidationError(format!(
                "invalid solenoid_type {s:?}, expected AC, DC or DC_LATCHING"
            ))),
        }
    }
}

// ─── SolenoidConfig ─────────────────────────────────────────────────

/// Drive parameters of one solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolenoidConfig {
    /// Drive sequence selector.
    pub solenoid_type: SolenoidType,
    /// H-bridge brake convention: `true` if both legs high short the coil.
    pub brake_is_high: bool,
    /// Length of the energise phase (monostable) or latch pulse.
    pub energise_duration_ms: u16,
    /// Duty during the energise phase, `[0, 1]`.
    pub energise_power_percent: f64,
    /// Duty during the hold phase, `[0, 1]`.
    pub hold_power_percent: f64,
    /// Extra latch pulses after the first one.
    pub dc_latch_redo_count: u8,
    /// Pause between latch pulses.
    pub dc_latch_redo_interval_ms: u16,
    /// Logical state is the inverse of the physical state.
    pub inverted: bool,
}

impl SolenoidConfig {
    /// Configuration with default powers, redo policy and brake-high bridge.
    pub const fn new(solenoid_type: SolenoidType, energise_duration_ms: u16) -> Self {
        Self {
            solenoid_type,
            brake_is_high: true,
            energise_duration_ms,
            energise_power_percent: DEFAULT_ENERGISE_POWER,
            hold_power_percent: DEFAULT_HOLD_POWER,
            dc_latch_redo_count: DEFAULT_DC_LATCH_REDO_COUNT,
            dc_latch_redo_interval_ms: DEFAULT_DC_LATCH_REDO_INTERVAL_MS,
            inverted: false,
        }
    }

    /// Set the brake convention.
    pub const fn with_brake_is_high(mut self, brake_is_high: bool) -> Self {
        self.brake_is_high = brake_is_high;
        self
    }

    /// Set energise and hold duty.
    pub const fn with_power(mut self, energise: f64, hold: f64) -> Self {
        self.energise_power_percent = energise;
        self.hold_power_percent = hold;
        self
    }

    /// Set the latch redo policy.
    pub const fn with_redo(mut self, count: u8, interval_ms: u16) -> Self {
        self.dc_latch_redo_count = count;
        self.dc_latch_redo_interval_ms = interval_ms;
        self
    }

    /// Set inversion.
    pub const fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Physical state for a logical state.
    #[inline]
    pub const fn physical_state(&self, logical: bool) -> bool {
        logical != self.inverted
    }

    /// Level pair that shorts the coil.
    #[inline]
    pub const fn brake_level(&self) -> bool {
        self.brake_is_high
    }

    /// Level pair that floats the coil.
    #[inline]
    pub const fn coast_level(&self) -> bool {
        !self.brake_is_high
    }

    /// Polarity-corrected duty for pin A.
    ///
    /// With a brake-high bridge pin B sits high while driving, so the
    /// effective duty on pin A is the complement.
    #[inline]
    pub fn corrected_power(&self, power: f64) -> f64 {
        if self.brake_is_high { 1.0 - power } else { power }
    }

    /// Energise phase / latch pulse length.
    pub fn energise_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.energise_duration_ms))
    }

    /// Pause between latch pulses.
    pub fn redo_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.dc_latch_redo_interval_ms))
    }

    /// Basic sanity checks.
    ///
    /// Powers must be finite fractions. Durations and redo counts are not
    /// range-checked here; bank files apply stricter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("energise_power_percent", self.energise_power_percent),
            ("hold_power_percent", self.hold_power_percent),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
