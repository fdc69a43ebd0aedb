use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::pipeline::RunRequest;
use crate::policy::{DefaultDiskSizes, QueryConstraints};

/// Run configuration, read from YAML.
///
/// ```yaml
/// datacenter_id: datacenter-2
/// datastore_cluster: ssd-pod
/// csvfile: machines.csv
/// inventory: inventory.yaml
/// query:
///   vapp: web
/// default_disks:
///   disk0: "40"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub datacenter_id: String,
    pub datastore_cluster: String,
    pub csvfile: PathBuf,
    #[serde(default)]
    pub inventory: Option<PathBuf>,
    #[serde(default)]
    pub query: QueryConstraints,
    pub default_disks: DefaultDiskSizes,
}

impl RunConfig {
    /// Load a config file. Relative `csvfile` and `inventory` paths are taken
    /// relative to the directory the config file is in.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut config: Self = serde_yaml::from_reader(file)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.csvfile = base.join(&config.csvfile);
        config.inventory = config.inventory.map(|inv| base.join(inv));
        Ok(config)
    }

    pub fn request(&self) -> RunRequest {
        RunRequest {
            csv_path: self.csvfile.clone(),
            query: self.query.clone(),
            default_disks: self.default_disks.clone(),
            datastore_cluster: self.datastore_cluster.clone(),
        }
    }
}
