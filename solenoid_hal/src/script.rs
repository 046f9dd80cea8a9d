//! Timed command scripts.
//!
//! A command is written `name=action[@ms]`, where `action` is `on`, `off`
//! or `toggle` and `ms` is the time since setup (default 0).

use core::fmt;
use core::str::FromStr;
use solenoid_common::hal::output::OutputBus;
use solenoid_drive::{SolenoidController, SolenoidError};
use std::time::Duration;

use crate::error::HalError;

/// What to do with a solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Command ON.
    On,
    /// Command OFF.
    Off,
    /// Command the opposite of the published state.
    Toggle,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
        })
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(Self::On),
            "off" | "false" | "0" => Ok(Self::Off),
            "toggle" => Ok(Self::Toggle),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    /// Time since setup.
    pub at: Duration,
    /// Solenoid name.
    pub target: String,
    /// Command to issue.
    pub action: Action,
}

impl FromStr for ScriptCommand {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| HalError::InvalidCommand {
            input: s.to_string(),
            reason,
        };

        let (target, rest) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected name=action[@ms]".to_string()))?;
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid("empty solenoid name".to_string()));
        }

        let (action, at) = match rest.split_once('@') {
            Some((action, ms)) => {
                let ms: u64 = ms
                    .trim()
                    .parse()
                    .map_err(|e| invalid(format!("bad time '{ms}': {e}")))?;
                (action, Duration::from_millis(ms))
            }
            None => (rest, Duration::ZERO),
        };

        Ok(Self {
            at,
            target: target.to_string(),
            action: action.parse().map_err(invalid)?,
        })
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}@{}", self.target, self.action, self.at.as_millis())
    }
}

impl ScriptCommand {
    /// Issue this command on `controller`.
    pub fn apply<O: OutputBus>(&self, controller: &mut SolenoidController<O>) -> Result<(), HalError> {
        let id = controller
            .id_of(&self.target)
            .ok_or_else(|| SolenoidError::UnknownName(self.target.clone()))?;
        match self.action {
            Action::On => controller.turn_on(id)?,
            Action::Off => controller.turn_off(id)?,
            Action::Toggle => controller.toggle(id)?,
        }
        Ok(())
    }
}

/// Parse every entry, ordered by time. Entries with equal times keep
/// their given order.
pub fn parse_script<S: AsRef<str>>(entries: &[S]) -> Result<Vec<ScriptCommand>, HalError> {
    let mut script = entries
        .iter()
        .map(|e| e.as_ref().parse::<ScriptCommand>())
        .collect::<Result<Vec<_>, _>>()?;
    script.sort_by_key(|c| c.at);
    Ok(script)
}
