//! Prelude module for common re-exports.
//!
//! `use solenoid_common::prelude::*;` pulls in the types every crate of the
//! workspace touches without listing individual paths.

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
pub use crate::solenoid::bank::{BankConfig, OutputCounts, SolenoidEntry};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DC_LATCH_SETTLE_MS, DEFAULT_DC_LATCH_REDO_COUNT, MAX_INTERLOCK_MEMBERS, MAX_SOLENOIDS};

// ─── Outputs ────────────────────────────────────────────────────────
pub use crate::hal::output::{AnalogChannel, DigitalChannel, DriveOutputs, OutputBus};
pub use crate::hal::types::{OutputSnapshot, OutputWrite, level_from_bool};

// ─── Solenoid ───────────────────────────────────────────────────────
pub use crate::solenoid::config::{ActuatorId, SolenoidConfig, SolenoidType};
pub use crate::solenoid::restore::RestoreMode;
