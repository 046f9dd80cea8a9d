//! HAL error types.

use solenoid_common::config::ConfigError;
use solenoid_drive::SolenoidError;
use thiserror::Error;

/// Errors raised by the simulated bank and the command runner.
#[derive(Debug, Error)]
pub enum HalError {
    /// Bank file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bank could not be built or addressed.
    #[error("Solenoid error: {0}")]
    Solenoid(#[from] SolenoidError),

    /// Malformed `--command` entry.
    #[error("Invalid command '{input}': {reason}")]
    InvalidCommand {
        /// Text as given.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// State file could not be read or written.
    #[error("State persistence error: {0}")]
    PersistenceError(String),
}
