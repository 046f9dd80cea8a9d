//! Controller error types.
//!
//! Only setup and lookups can fail. Drive sequences themselves never return
//! errors: every failure mode leaves the outputs de-energised.

use solenoid_common::config::ConfigError;
use solenoid_common::solenoid::config::ActuatorId;
use thiserror::Error;

/// Errors raised while building or addressing a [`crate::SolenoidController`].
#[derive(Debug, Clone, Error)]
pub enum SolenoidError {
    /// No solenoid with this id.
    #[error("unknown actuator {0}")]
    UnknownActuator(ActuatorId),

    /// No solenoid with this name.
    #[error("unknown solenoid '{0}'")]
    UnknownName(String),

    /// Name already registered.
    #[error("solenoid '{0}' is already registered")]
    DuplicateName(String),

    /// Arena is full.
    #[error("too many solenoids (max {max})")]
    TooManySolenoids {
        /// Arena capacity.
        max: usize,
    },

    /// Interlock group is full.
    #[error("interlock group of {actuator} is full (max {max} members)")]
    InterlockFull {
        /// Owner of the group.
        actuator: ActuatorId,
        /// Group capacity.
        max: usize,
    },

    /// Setup call after the first command.
    #[error("configuration is fixed once the controller is running")]
    AlreadyRunning,

    /// Invalid drive parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
