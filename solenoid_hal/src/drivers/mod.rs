//! Output bank drivers.
//!
//! Only the simulation driver exists; it records every write so runs can
//! be inspected after the fact.

pub mod simulation;

pub use simulation::SimulatedOutputs;
