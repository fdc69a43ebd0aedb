// src/inventory/mod.rs
//! Boundary to the virtual infrastructure inventory.
//!
//! The pipeline never talks to a hypervisor directly; it asks an
//! [`InventoryResolver`] to turn symbolic paths from the manifest into
//! concrete identifiers. All lookups are read-only.

pub mod cache;
pub mod static_inventory;

pub use cache::CachingResolver;
pub use static_inventory::StaticInventory;

/// The datacenter a run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Datacenter {
    pub id: String,
    /// Absolute inventory path, e.g. `/DC1`.
    pub inventory_path: String,
}

impl Datacenter {
    /// Root folder that virtual machines live under.
    pub fn vm_root(&self) -> String {
        format!("{}/vm", self.inventory_path.trim_end_matches('/'))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("path {path:?} is not under a datacenter VM folder")]
    OutsideRoot { path: String },

    #[error("cannot locate datacenter {id:?}")]
    UnknownDatacenter { id: String },
}

/// Lookups the pipeline needs from the inventory.
pub trait InventoryResolver {
    /// Turn an absolute VM path hint into a folder path relative to the
    /// datacenter VM root.
    fn resolve_folder(&self, path_hint: &str) -> Result<String, ResolveError>;

    /// Find a vApp or resource pool by name, optionally inside `pool`
    /// (empty for none), and return its identifier.
    fn resolve_resource_pool(
        &self,
        vapp: &str,
        pool: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError>;

    fn resolve_network(&self, path: &str, datacenter: &Datacenter) -> Result<String, ResolveError>;

    fn resolve_datastore_cluster(
        &self,
        name: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError>;
}

impl<T: InventoryResolver + ?Sized> InventoryResolver for &T {
    fn resolve_folder(&self, path_hint: &str) -> Result<String, ResolveError> {
        (**self).resolve_folder(path_hint)
    }

    fn resolve_resource_pool(
        &self,
        vapp: &str,
        pool: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        (**self).resolve_resource_pool(vapp, pool, datacenter)
    }

    fn resolve_network(&self, path: &str, datacenter: &Datacenter) -> Result<String, ResolveError> {
        (**self).resolve_network(path, datacenter)
    }

    fn resolve_datastore_cluster(
        &self,
        name: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        (**self).resolve_datastore_cluster(name, datacenter)
    }
}
