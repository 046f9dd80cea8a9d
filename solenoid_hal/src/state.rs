//! Logical state persistence across restarts.
//!
//! Switch states are saved with bincode at shutdown and fed back to
//! [`SolenoidController::setup`] as the recovered state of the `restore_*`
//! modes. The file is replaced atomically: a crash mid-save leaves the
//! previous bank state in place.

use serde::{Deserialize, Serialize};
use solenoid_common::hal::output::OutputBus;
use solenoid_drive::{SolenoidController, StateRecovery};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::error::HalError;

/// Persisted state of one solenoid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSwitchState {
    /// Solenoid name (for matching on load).
    pub name: String,
    /// Last published logical state.
    pub state: bool,
}

/// Persisted state of a whole bank.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// Version of state format (for migration).
    pub version: u32,
    /// Switch states.
    pub switches: Vec<PersistedSwitchState>,
    /// Timestamp of last save (Unix epoch seconds).
    pub saved_at: u64,
}

impl PersistedState {
    /// Current state format version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Empty state.
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            switches: Vec::new(),
            saved_at: 0,
        }
    }

    /// Capture the published states of every solenoid in `controller`.
    pub fn capture<O: OutputBus>(controller: &SolenoidController<O>) -> Self {
        Self {
            switches: controller
                .solenoids()
                .iter()
                .map(|s| PersistedSwitchState {
                    name: s.name().to_string(),
                    state: s.state(),
                })
                .collect(),
            ..Self::new()
        }
    }

    /// Whether this state was written by the current format.
    pub fn is_current(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }

    fn stamped(&self) -> Self {
        Self {
            saved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            ..self.clone()
        }
    }
}

impl StateRecovery for PersistedState {
    fn recover(&self, name: &str) -> Option<bool> {
        self.switches
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.state)
    }
}

/// Bank state file.
#[derive(Debug, Clone)]
pub struct StatePersistence {
    path: PathBuf,
}

fn persistence_error(action: &str, path: &Path, err: impl std::fmt::Display) -> HalError {
    HalError::PersistenceError(format!("{action} {}: {err}", path.display()))
}

impl StatePersistence {
    /// State file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sibling file the next save is staged in.
    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }

    /// Stage `state` next to the state file, then rename it into place.
    pub fn save(&self, state: &PersistedState) -> Result<(), HalError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| persistence_error("create", dir, e))?;
        }

        let stamped = state.stamped();
        let staged = self.staging_path();
        let mut writer = BufWriter::new(
            File::create(&staged).map_err(|e| persistence_error("create", &staged, e))?,
        );
        bincode::serialize_into(&mut writer, &stamped)
            .map_err(|e| persistence_error("encode", &staged, e))?;
        writer
            .flush()
            .map_err(|e| persistence_error("write", &staged, e))?;
        drop(writer);
        fs::rename(&staged, &self.path).map_err(|e| persistence_error("replace", &self.path, e))?;

        let on = stamped.switches.iter().filter(|s| s.state).count();
        info!(
            "Saved {} switch states ({on} on) to {}",
            stamped.switches.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Stored bank state. `Ok(None)` when nothing usable is stored: no
    /// file yet, or a file from another format version.
    pub fn load(&self) -> Result<Option<PersistedState>, HalError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No state file at {}, defaults apply", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(persistence_error("open", &self.path, e)),
        };
        let state: PersistedState = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| persistence_error("decode", &self.path, e))?;

        if !state.is_current() {
            warn!(
                "Ignoring {}: format v{}, expected v{}",
                self.path.display(),
                state.version,
                PersistedState::CURRENT_VERSION
            );
            return Ok(None);
        }
        debug!(
            "Recovered {} switch states saved at {}",
            state.switches.len(),
            state.saved_at
        );
        Ok(Some(state))
    }
}
