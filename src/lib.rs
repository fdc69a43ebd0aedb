//! Turn a CSV manifest of intended virtual machines into the list of machines
//! that should currently exist, with defaults applied, expiry evaluated and
//! inventory paths resolved to identifiers.

pub mod config;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod pipeline;
pub mod policy;

pub use error::ManifestError;
pub use pipeline::{run, MachineRecord, RunOutput, RunRequest};
