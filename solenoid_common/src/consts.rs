//! System-wide constants for the solenoid workspace.
//!
//! Single source of truth for default drive parameters and the bounds the
//! bank configuration file is validated against.

use static_assertions::const_assert;

/// Maximum number of members in one interlock group.
pub const MAX_INTERLOCK_MEMBERS: usize = 16;

/// Maximum number of solenoids in one bank.
pub const MAX_SOLENOIDS: usize = 64;

/// Delay between the last latch pulse and switching an enable-equipped
/// driver to coast.
pub const DC_LATCH_SETTLE_MS: u32 = 1000;

/// Default energise power (fraction of full duty).
pub const DEFAULT_ENERGISE_POWER: f64 = 0.95;

/// Default hold power (fraction of full duty).
pub const DEFAULT_HOLD_POWER: f64 = 0.55;

/// Default number of extra latch pulses after the first one.
pub const DEFAULT_DC_LATCH_REDO_COUNT: u8 = 3;

/// Default pause between latch pulses.
pub const DEFAULT_DC_LATCH_REDO_INTERVAL_MS: u16 = 500;

/// Accepted `energise_duration_ms` range in bank files.
pub const ENERGISE_DURATION_MS_MIN: u16 = 10;
/// Upper bound of `energise_duration_ms` in bank files.
pub const ENERGISE_DURATION_MS_MAX: u16 = 3000;

/// Accepted `dc_latch_redo_count` range in bank files.
pub const DC_LATCH_REDO_COUNT_MIN: u8 = 1;
/// Upper bound of `dc_latch_redo_count` in bank files.
pub const DC_LATCH_REDO_COUNT_MAX: u8 = 5;

/// Accepted `dc_latch_redo_interval_ms` range in bank files.
pub const DC_LATCH_REDO_INTERVAL_MS_MIN: u16 = 500;
/// Upper bound of `dc_latch_redo_interval_ms` in bank files.
pub const DC_LATCH_REDO_INTERVAL_MS_MAX: u16 = 3000;

/// Default bank configuration file.
pub const DEFAULT_BANK_CONFIG_PATH: &str = "/etc/solenoid/bank.toml";

const_assert!(ENERGISE_DURATION_MS_MIN < ENERGISE_DURATION_MS_MAX);
const_assert!(DC_LATCH_REDO_COUNT_MIN <= DEFAULT_DC_LATCH_REDO_COUNT);
const_assert!(DEFAULT_DC_LATCH_REDO_COUNT <= DC_LATCH_REDO_COUNT_MAX);
const_assert!(DC_LATCH_REDO_INTERVAL_MS_MIN <= DEFAULT_DC_LATCH_REDO_INTERVAL_MS);
const_assert!(MAX_INTERLOCK_MEMBERS <= MAX_SOLENOIDS);
