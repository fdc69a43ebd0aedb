use serde::{Deserialize, Serialize};

/// A machine that should exist, with every attribute resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub hostname: String,
    pub address: String,
    pub gateway: String,
    pub subnet: u64,
    pub cpu: u64,
    pub memory: u64,
    /// `YYYY-MM-DD`
    pub expires: String,
    /// `"true"` or `"false"`
    pub power: String,
    pub template: String,
    /// Network identifier, or empty when the manifest left it blank.
    pub network: String,
    /// Resource pool identifier, or empty when the manifest left it blank.
    pub vapp: String,
    pub folder: String,
    pub disk0: u64,
    pub disk1: u64,
    pub disk2: u64,
    pub disk3: u64,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub datastore_cluster_id: String,
    pub machines: Vec<MachineRecord>,
}
