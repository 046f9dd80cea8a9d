//! # Solenoid Drive Library
//!
//! Drives bistable and monostable solenoids through 2- or 3-pin H-bridges:
//! energise/hold sequencing for AC and DC coils, pulse-and-redo latching for
//! DC-latching coils, and interlocks that keep mutually exclusive solenoids
//! from being powered together.
//!
//! ## Execution Model
//!
//! Everything runs on one thread with run-to-completion semantics. Deferred
//! steps are named timers holding explicit [`timer::Continuation`] records;
//! starting a new step always cancels the previous timer of the same name,
//! and continuations re-read live controller state when they fire.
//!
//! ## Layers
//!
//! 1. [`timer`]: scheduler contract, single-slot timers, cooperative queue
//! 2. [`drive`]: per-type drive strategies
//! 3. [`interlock`]: at-most-one-on coordination among peers
//! 4. [`controller`]: solenoid arena and command dispatch
//! 5. [`restore`]: recovered power-on state

pub mod controller;
pub mod drive;
pub mod error;
pub mod interlock;
pub mod restore;
pub mod timer;

pub use crate::controller::{Solenoid, SolenoidController, StateEvent};
pub use crate::drive::DriveStrategy;
pub use crate::error::SolenoidError;
pub use crate::interlock::{Activation, InterlockCoordinator, InterlockGroup};
pub use crate::restore::{NoRecovery, StateRecovery};
pub use crate::timer::{Scheduler, TimerQueue};
