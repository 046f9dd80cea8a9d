//! Simulation driver: in-memory outputs with a write journal.

mod outputs;

pub use outputs::SimulatedOutputs;
