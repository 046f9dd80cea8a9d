//! Power-on state selection.
//!
//! A solenoid's initial logical state is chosen at setup from its restore
//! mode and, for the `Restore*` modes, the state recovered from persistent
//! storage (if any).

use serde::{Deserialize, Serialize};

/// Policy selecting the initial logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Recovered state, else OFF.
    #[default]
    RestoreDefaultOff,
    /// Recovered state, else ON.
    RestoreDefaultOn,
    /// Always OFF.
    AlwaysOff,
    /// Always ON.
    AlwaysOn,
    /// Inverse of the recovered state, else OFF.
    RestoreInvertedDefaultOff,
    /// Inverse of the recovered state, else ON.
    RestoreInvertedDefaultOn,
    /// No initial state; setup falls back to OFF.
    Disabled,
}

impl RestoreMode {
    /// Initial logical state for this mode.
    ///
    /// `recovered` is the persisted state, `None` if nothing was stored.
    /// Returns `None` only for [`RestoreMode::Disabled`].
    pub const fn initial_state(self, recovered: Option<bool>) -> Option<bool> {
        match (self, recovered) {
            (Self::AlwaysOff, _) => Some(false),
            (Self::AlwaysOn, _) => Some(true),
            (Self::Disabled, _) => None,
            (Self::RestoreDefaultOff | Self::RestoreDefaultOn, Some(state)) => Some(state),
            (Self::RestoreInvertedDefaultOff | Self::RestoreInvertedDefaultOn, Some(state)) => {
                Some(!state)
            }
            (Self::RestoreDefaultOff | Self::RestoreInvertedDefaultOff, None) => Some(false),
            (Self::RestoreDefaultOn | Self::RestoreInvertedDefaultOn, None) => Some(true),
        }
    }

    /// Whether this mode consults persisted state at all.
    pub const fn uses_recovery(self) -> bool {
        !matches!(self, Self::AlwaysOff | Self::AlwaysOn | Self::Disabled)
    }
}
