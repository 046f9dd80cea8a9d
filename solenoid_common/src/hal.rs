//! Hardware output handles and types.
//!
//! The physical outputs are owned by the hardware layer. Solenoids refer to
//! them through channel handles and write them through [`output::OutputBus`].

pub mod output;
pub mod types;
