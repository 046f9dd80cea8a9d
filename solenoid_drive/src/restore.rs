//! Source of persisted power-on states.

use std::collections::HashMap;

/// Persisted logical states, looked up by solenoid name.
pub trait StateRecovery {
    /// Stored state of `name`, `None` if nothing was stored.
    fn recover(&self, name: &str) -> Option<bool>;
}

/// Nothing persisted; every solenoid falls back to its restore default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecovery;

impl StateRecovery for NoRecovery {
    fn recover(&self, _name: &str) -> Option<bool> {
        None
    }
}

impl StateRecovery for HashMap<String, bool> {
    fn recover(&self, name: &str) -> Option<bool> {
        self.get(name).copied()
    }
}
