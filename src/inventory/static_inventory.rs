use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs::File, path::Path};
use tracing::info;

use super::{Datacenter, InventoryResolver, ResolveError};

/// An inventory snapshot read from YAML, for running without a live
/// vCenter connection.
///
/// ```yaml
/// datacenters:
///   datacenter-2: /DC1
/// resource_pools:
///   Cluster/Resources: resgroup-8
///   web: resgroup-v12
/// networks:
///   VM Network: network-11
/// datastore_clusters:
///   ssd-pod: group-p5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticInventory {
    /// Datacenter id → absolute inventory path.
    #[serde(default)]
    pub datacenters: BTreeMap<String, String>,
    /// Pool path (`parent/name` or `name`) → identifier.
    #[serde(default)]
    pub resource_pools: BTreeMap<String, String>,
    #[serde(default)]
    pub networks: BTreeMap<String, String>,
    #[serde(default)]
    pub datastore_clusters: BTreeMap<String, String>,
}

impl StaticInventory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("opening inventory {}", path.display()))?;
        let inventory: Self = serde_yaml::from_reader(file)
            .with_context(|| format!("parsing inventory {}", path.display()))?;
        info!(
            datacenters = inventory.datacenters.len(),
            resource_pools = inventory.resource_pools.len(),
            networks = inventory.networks.len(),
            datastore_clusters = inventory.datastore_clusters.len(),
            "loaded static inventory from {}",
            path.display()
        );
        Ok(inventory)
    }

    pub fn datacenter(&self, id: &str) -> Result<Datacenter, ResolveError> {
        self.datacenters
            .get(id)
            .map(|path| Datacenter {
                id: id.to_string(),
                inventory_path: path.trim_end_matches('/').to_string(),
            })
            .ok_or_else(|| ResolveError::UnknownDatacenter { id: id.to_string() })
    }

    /// Exact key, or the key left after stripping `<datacenter>/<area>/`.
    fn lookup(
        table: &BTreeMap<String, String>,
        kind: &'static str,
        name: &str,
        datacenter: &Datacenter,
        area: &str,
    ) -> Result<String, ResolveError> {
        let prefix = format!("{}/{}/", datacenter.inventory_path, area);
        table
            .get(name)
            .or_else(|| name.strip_prefix(&prefix).and_then(|rel| table.get(rel)))
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}

/// Trim slashes off a folder path; the empty path is the root, `/`.
fn normalize_folder(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

impl InventoryResolver for StaticInventory {
    fn resolve_folder(&self, path_hint: &str) -> Result<String, ResolveError> {
        let hint = path_hint.trim_end_matches('/');
        let relative = self
            .datacenters
            .iter()
            .filter_map(|(id, _)| self.datacenter(id).ok())
            .find_map(|dc| {
                let root = dc.vm_root();
                hint.strip_prefix(&root)
                    .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                    .map(str::to_string)
            })
            .ok_or_else(|| ResolveError::OutsideRoot {
                path: path_hint.to_string(),
            })?;

        // the last element names the machine's vApp, the rest is its folder
        let parent = relative.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        Ok(normalize_folder(parent))
    }

    fn resolve_resource_pool(
        &self,
        vapp: &str,
        pool: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        let nested = if pool.is_empty() || vapp.is_empty() {
            None
        } else {
            Some(format!("{pool}/{vapp}"))
        };
        let own = if vapp.is_empty() { pool } else { vapp };

        nested
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(own))
            .filter(|key| !key.is_empty())
            .find_map(|key| {
                Self::lookup(&self.resource_pools, "resource pool", key, datacenter, "host").ok()
            })
            .ok_or_else(|| ResolveError::NotFound {
                kind: "resource pool",
                name: if pool.is_empty() {
                    vapp.to_string()
                } else {
                    format!("{vapp}:{pool}")
                },
            })
    }

    fn resolve_network(&self, path: &str, datacenter: &Datacenter) -> Result<String, ResolveError> {
        Self::lookup(&self.networks, "network", path, datacenter, "network")
    }

    fn resolve_datastore_cluster(
        &self,
        name: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        Self::lookup(
            &self.datastore_clusters,
            "datastore cluster",
            name,
            datacenter,
            "datastore",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
datacenters:
  datacenter-2: /DC1
  datacenter-9: /Lab/DC9/
resource_pools:
  Cluster/Resources: resgroup-8
  web: resgroup-v12
  prod/web: resgroup-v40
  prod: resgroup-30
networks:
  VM Network: network-11
  dmz/frontend: dvportgroup-20
datastore_clusters:
  ssd-pod: group-p5
"#;

    fn inventory() -> StaticInventory {
        serde_yaml::from_str(YAML).expect("fixture parses")
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(YAML.as_bytes())?;
        let inv = StaticInventory::load(tmp.path())?;
        assert_eq!(inv.networks.len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_unknown_sections() {
        let res: Result<StaticInventory, _> = serde_yaml::from_str("hosts: {}\n");
        assert!(res.is_err());
    }

    #[test]
    fn datacenter_paths_are_trimmed() {
        let inv = inventory();
        let dc = inv.datacenter("datacenter-9").unwrap();
        assert_eq!(dc.inventory_path, "/Lab/DC9");
        assert_eq!(dc.vm_root(), "/Lab/DC9/vm");
        assert!(matches!(
            inv.datacenter("datacenter-404"),
            Err(ResolveError::UnknownDatacenter { .. })
        ));
    }

    #[test]
    fn folder_is_parent_of_vapp_token() {
        let inv = inventory();
        assert_eq!(inv.resolve_folder("/DC1/vm/web").unwrap(), "/");
        assert_eq!(inv.resolve_folder("/DC1/vm/prod/web").unwrap(), "prod");
        assert_eq!(inv.resolve_folder("/DC1/vm/prod/team/web:pool").unwrap(), "prod/team");
        assert_eq!(inv.resolve_folder("/Lab/DC9/vm/qa/app").unwrap(), "qa");
        assert!(matches!(
            inv.resolve_folder("/DC2/vm/web"),
            Err(ResolveError::OutsideRoot { .. })
        ));
        assert!(inv.resolve_folder("/DC1/vmware/web").is_err());
    }

    #[test]
    fn resource_pool_prefers_nested_path() {
        let inv = inventory();
        let dc = inv.datacenter("datacenter-2").unwrap();
        assert_eq!(inv.resolve_resource_pool("web", "", &dc).unwrap(), "resgroup-v12");
        assert_eq!(inv.resolve_resource_pool("web", "prod", &dc).unwrap(), "resgroup-v40");
        assert_eq!(inv.resolve_resource_pool("web", "staging", &dc).unwrap(), "resgroup-v12");
        assert_eq!(inv.resolve_resource_pool("", "prod", &dc).unwrap(), "resgroup-30");
        assert_eq!(
            inv.resolve_resource_pool("/DC1/host/Cluster/Resources", "", &dc).unwrap(),
            "resgroup-8"
        );

        let err = inv.resolve_resource_pool("db", "prod", &dc).unwrap_err();
        assert_eq!(err.to_string(), "resource pool \"db:prod\" not found");
    }

    #[test]
    fn network_and_datastore_lookups() {
        let inv = inventory();
        let dc = inv.datacenter("datacenter-2").unwrap();
        assert_eq!(inv.resolve_network("VM Network", &dc).unwrap(), "network-11");
        assert_eq!(
            inv.resolve_network("/DC1/network/dmz/frontend", &dc).unwrap(),
            "dvportgroup-20"
        );
        assert!(inv.resolve_network("/DC2/network/VM Network", &dc).is_err());
        assert_eq!(inv.resolve_datastore_cluster("ssd-pod", &dc).unwrap(), "group-p5");
        assert_eq!(
            inv.resolve_datastore_cluster("/DC1/datastore/ssd-pod", &dc).unwrap(),
            "group-p5"
        );
        assert!(inv.resolve_datastore_cluster("hdd-pod", &dc).is_err());
    }
}
