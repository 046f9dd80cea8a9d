//! Bank configuration (`bank.toml`).
//!
//! Binds every solenoid of a bank to its outputs, drive parameters,
//! restore mode and interlock peers.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "garden-valves"
//!
//! [outputs]
//! analog = 2
//! digital = 3
//!
//! [[solenoid]]
//! name = "lawn"
//! solenoid_type = "DC"
//! pin_a = 0
//! pin_b = 0
//! brake_is_high = true
//! energise_duration_ms = 200
//! interlock = ["beds"]
//! interlock_wait_time_ms = 500
//!
//! [[solenoid]]
//! name = "beds"
//! solenoid_type = "DC_LATCHING"
//! pin_a = 1
//! pin_b = 1
//! h_bridge_enable_pin = 2
//! brake_is_high = false
//! energise_duration_ms = 30
//! interlock = ["lawn"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{ConfigError, SharedConfig, Validate};
use crate::consts::{
    DC_LATCH_REDO_COUNT_MAX, DC_LATCH_REDO_COUNT_MIN, DC_LATCH_REDO_INTERVAL_MS_MAX,
    DC_LATCH_REDO_INTERVAL_MS_MIN, DEFAULT_DC_LATCH_REDO_COUNT, DEFAULT_DC_LATCH_REDO_INTERVAL_MS,
    DEFAULT_ENERGISE_POWER, DEFAULT_HOLD_POWER, ENERGISE_DURATION_MS_MAX,
    ENERGISE_DURATION_MS_MIN, MAX_INTERLOCK_MEMBERS, MAX_SOLENOIDS,
};
use crate::hal::output::{AnalogChannel, DigitalChannel, DriveOutputs};
use crate::solenoid::config::{SolenoidConfig, SolenoidType};
use crate::solenoid::restore::RestoreMode;

fn default_energise_power() -> f64 {
    DEFAULT_ENERGISE_POWER
}

fn default_hold_power() -> f64 {
    DEFAULT_HOLD_POWER
}

fn default_redo_count() -> u8 {
    DEFAULT_DC_LATCH_REDO_COUNT
}

fn default_redo_interval_ms() -> u16 {
    DEFAULT_DC_LATCH_REDO_INTERVAL_MS
}

/// Number of channels of the output bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputCounts {
    /// Continuous (PWM) outputs.
    #[serde(default)]
    pub analog: u16,
    /// Discrete outputs.
    #[serde(default)]
    pub digital: u16,
}

/// One `[[solenoid]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolenoidEntry {
    /// Unique solenoid name.
    pub name: String,
    /// Drive sequence selector.
    pub solenoid_type: SolenoidType,
    /// Continuous-level bridge input.
    pub pin_a: AnalogChannel,
    /// Discrete polarity/brake bridge input.
    pub pin_b: DigitalChannel,
    /// Bridge enable input (3-pin bridges).
    #[serde(default)]
    pub h_bridge_enable_pin: Option<DigitalChannel>,
    /// Brake convention of the bridge.
    pub brake_is_high: bool,
    /// Energise phase / latch pulse length.
    pub energise_duration_ms: u16,
    /// Duty during the energise phase.
    #[serde(default = "default_energise_power")]
    pub energise_power_percent: f64,
    /// Duty during the hold phase.
    #[serde(default = "default_hold_power")]
    pub hold_power_percent: f64,
    /// Extra latch pulses.
    #[serde(default = "default_redo_count")]
    pub dc_latch_redo_count: u8,
    /// Pause between latch pulses.
    #[serde(default = "default_redo_interval_ms")]
    pub dc_latch_redo_interval_ms: u16,
    /// Invert the logical state.
    #[serde(default)]
    pub inverted: bool,
    /// Power-on state selection.
    #[serde(default)]
    pub restore_mode: RestoreMode,
    /// Names of the solenoids that must never be on together with this one.
    #[serde(default)]
    pub interlock: Vec<String>,
    /// Settle delay after forcing interlocked peers off.
    #[serde(default)]
    pub interlock_wait_time_ms: u32,
}

impl SolenoidEntry {
    /// Drive parameters for the controller.
    pub fn solenoid_config(&self) -> SolenoidConfig {
        SolenoidConfig {
            solenoid_type: self.solenoid_type,
            brake_is_high: self.brake_is_high,
            energise_duration_ms: self.energise_duration_ms,
            energise_power_percent: self.energise_power_percent,
            hold_power_percent: self.hold_power_percent,
            dc_latch_redo_count: self.dc_latch_redo_count,
            dc_latch_redo_interval_ms: self.dc_latch_redo_interval_ms,
            inverted: self.inverted,
        }
    }

    /// Bridge wiring for the controller.
    pub fn drive_outputs(&self) -> DriveOutputs {
        DriveOutputs {
            pin_a: self.pin_a,
            pin_b: self.pin_b,
            enable: self.h_bridge_enable_pin,
        }
    }

    fn validate(&self, outputs: &OutputCounts) -> Result<(), ConfigError> {
        let name = &self.name;
        let invalid = |msg: String| ConfigError::ValidationError(format!("solenoid '{name}': {msg}"));

        self.solenoid_config().validate().map_err(|e| invalid(e.to_string()))?;

        if !(ENERGISE_DURATION_MS_MIN..=ENERGISE_DURATION_MS_MAX).contains(&self.energise_duration_ms) {
            return Err(invalid(format!(
                "energise_duration_ms {} outside {ENERGISE_DURATION_MS_MIN}..={ENERGISE_DURATION_MS_MAX}",
                self.energise_duration_ms
            )));
        }
        if !(DC_LATCH_REDO_COUNT_MIN..=DC_LATCH_REDO_COUNT_MAX).contains(&self.dc_latch_redo_count) {
            return Err(invalid(format!(
                "dc_latch_redo_count {} outside {DC_LATCH_REDO_COUNT_MIN}..={DC_LATCH_REDO_COUNT_MAX}",
                self.dc_latch_redo_count
            )));
        }
        if !(DC_LATCH_REDO_INTERVAL_MS_MIN..=DC_LATCH_REDO_INTERVAL_MS_MAX)
            .contains(&self.dc_latch_redo_interval_ms)
        {
            return Err(invalid(format!(
                "dc_latch_redo_interval_ms {} outside {DC_LATCH_REDO_INTERVAL_MS_MIN}..={DC_LATCH_REDO_INTERVAL_MS_MAX}",
                self.dc_latch_redo_interval_ms
            )));
        }

        if self.pin_a.0 >= outputs.analog {
            return Err(invalid(format!(
                "pin_a {} exceeds {} analog outputs",
                self.pin_a, outputs.analog
            )));
        }
        for pin in [Some(self.pin_b), self.h_bridge_enable_pin].into_iter().flatten() {
            if pin.0 >= outputs.digital {
                return Err(invalid(format!(
                    "{pin} exceeds {} digital outputs",
                    outputs.digital
                )));
            }
        }
        if self.h_bridge_enable_pin == Some(self.pin_b) {
            return Err(invalid("h_bridge_enable_pin must differ from pin_b".to_string()));
        }

        if self.interlock.len() > MAX_INTERLOCK_MEMBERS {
            return Err(invalid(format!(
                "too many interlock peers: {} (max {MAX_INTERLOCK_MEMBERS})",
                self.interlock.len()
            )));
        }
        Ok(())
    }
}

/// Complete `bank.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Service name and log level.
    pub shared: SharedConfig,
    /// Size of the output bank.
    #[serde(default)]
    pub outputs: OutputCounts,
    /// Solenoids in registration order.
    #[serde(default, rename = "solenoid")]
    pub solenoids: Vec<SolenoidEntry>,
}

impl BankConfig {
    /// Position of a solenoid by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.solenoids.iter().position(|s| s.name == name)
    }
}

impl Validate for BankConfig {
    /// # Validation Rules
    /// 1. `[shared]` is valid
    /// 2. at most `MAX_SOLENOIDS` solenoids, names non-empty and unique
    /// 3. per-solenoid parameter bounds and channel ranges
    /// 4. every interlock name refers to a declared solenoid
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.solenoids.len() > MAX_SOLENOIDS {
            return Err(ConfigError::ValidationError(format!(
                "Too many solenoids: {} (max {MAX_SOLENOIDS})",
                self.solenoids.len()
            )));
        }

        let mut names = HashSet::new();
        for entry in &self.solenoids {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "solenoid name cannot be empty".to_string(),
                ));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate solenoid name '{}'",
                    entry.name
                )));
            }
        }

        for entry in &self.solenoids {
            entry.validate(&self.outputs)?;
            if let Some(unknown) = entry.interlock.iter().find(|peer| !names.contains(peer.as_str())) {
                return Err(ConfigError::ValidationError(format!(
                    "solenoid '{}': unknown interlock peer '{unknown}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}
