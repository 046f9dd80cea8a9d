//! Solenoid configuration types.
//!
//! - [`config`] - per-solenoid drive parameters and actuator identity
//! - [`restore`] - power-on state selection
//! - [`bank`] - `bank.toml` schema binding solenoids to outputs

pub mod bank;
pub mod config;
pub mod restore;
