//! Binding a bank file to simulated outputs.

use solenoid_common::config::ConfigLoader;
use solenoid_common::solenoid::bank::BankConfig;
use solenoid_drive::SolenoidController;
use std::path::Path;
use tracing::info;

use crate::drivers::SimulatedOutputs;
use crate::error::HalError;

/// A configured bank ready for setup.
#[derive(Debug)]
pub struct LoadedBank {
    /// Configuration it was built from.
    pub config: BankConfig,
    /// Controller driving the simulated outputs.
    pub controller: SolenoidController<SimulatedOutputs>,
}

impl LoadedBank {
    /// Build a controller for an already validated `config`.
    pub fn build(config: BankConfig) -> Result<Self, HalError> {
        let outputs = SimulatedOutputs::new(&config.outputs);
        let controller = SolenoidController::from_bank(&config, outputs)?;
        info!(
            "Bank '{}' built: {} solenoids on {} AO / {} DO",
            config.shared.service_name,
            controller.solenoids().len(),
            config.outputs.analog,
            config.outputs.digital
        );
        Ok(Self { config, controller })
    }

    /// Load, validate and build the bank file at `path`.
    pub fn load(path: &Path) -> Result<Self, HalError> {
        info!("Loading bank from {:?}", path);
        let config = BankConfig::load_validated(path)?;
        Self::build(config)
    }
}
