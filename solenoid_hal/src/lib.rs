//! # Solenoid HAL Library
//!
//! Hardware side of the solenoid workspace: a simulated output bank, bank
//! file binding, state persistence and a timed command runner.
//!
//! # Module Structure
//!
//! - [`bank`] - Bank file loading and controller construction
//! - [`drivers`] - Output bank drivers (simulation)
//! - [`error`] - HAL error type
//! - [`runner`] - Virtual and real-time script runner
//! - [`script`] - `name=action[@ms]` command parsing
//! - [`state`] - Logical state persistence
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     solenoid_hal                           │
//! │  ┌──────────────┐   ┌────────────────┐   ┌──────────────┐  │
//! │  │  bank.toml   │──►│ SolenoidCtrl   │◄──│   Runner     │  │
//! │  │ (LoadedBank) │   │ (solenoid_drive)│  │  (script)    │  │
//! │  └──────────────┘   └───────┬────────┘   └──────────────┘  │
//! │                             │ OutputBus                    │
//! │                             ▼                              │
//! │                   ┌──────────────────┐                     │
//! │                   │ SimulatedOutputs │                     │
//! │                   └──────────────────┘                     │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod bank;
pub mod drivers;
pub mod error;
pub mod runner;
pub mod script;
pub mod state;

pub use crate::bank::LoadedBank;
pub use crate::drivers::SimulatedOutputs;
pub use crate::error::HalError;
pub use crate::runner::{RunReport, Runner};
pub use crate::script::{ScriptCommand, parse_script};
pub use crate::state::{PersistedState, StatePersistence};
