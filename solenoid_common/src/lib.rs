//! Solenoid Common Library
//!
//! Shared constants, configuration loading and hardware output handles for
//! all crates of the solenoid drive workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Default drive parameters and validation bounds
//! - [`config`] - Configuration loading traits and types
//! - [`hal`] - Output channel handles and the `OutputBus` trait
//! - [`solenoid`] - Per-solenoid, interlock, restore and bank configuration
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use solenoid_common::prelude::*;
//!
//! let config = SolenoidConfig::new(SolenoidType::Dc, 200);
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
pub mod solenoid;
