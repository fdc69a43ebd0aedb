use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock,
    },
};
use tracing::debug;

use super::{Datacenter, InventoryResolver, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Lookup {
    Folder(String),
    ResourcePool {
        vapp: String,
        pool: String,
        datacenter: String,
    },
    Network {
        path: String,
        datacenter: String,
    },
    DatastoreCluster {
        name: String,
        datacenter: String,
    },
}

/// Memoizes successful lookups of the wrapped resolver for the lifetime of
/// one run. Failures are passed through and retried on the next request.
pub struct CachingResolver<R> {
    inner: R,
    cache: RwLock<HashMap<Lookup, String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<R: InventoryResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// (hits, misses) so far.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn cached(
        &self,
        key: Lookup,
        resolve: impl FnOnce(&R) -> Result<String, ResolveError>,
    ) -> Result<String, ResolveError> {
        // fast path under the read lock
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(id) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(id.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let id = resolve(&self.inner)?;
        debug!(?key, id = %id, "cached inventory lookup");
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, id.clone());
        Ok(id)
    }
}

impl<R: InventoryResolver> InventoryResolver for CachingResolver<R> {
    fn resolve_folder(&self, path_hint: &str) -> Result<String, ResolveError> {
        self.cached(Lookup::Folder(path_hint.to_string()), |r| {
            r.resolve_folder(path_hint)
        })
    }

    fn resolve_resource_pool(
        &self,
        vapp: &str,
        pool: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        let key = Lookup::ResourcePool {
            vapp: vapp.to_string(),
            pool: pool.to_string(),
            datacenter: datacenter.id.clone(),
        };
        self.cached(key, |r| r.resolve_resource_pool(vapp, pool, datacenter))
    }

    fn resolve_network(&self, path: &str, datacenter: &Datacenter) -> Result<String, ResolveError> {
        let key = Lookup::Network {
            path: path.to_string(),
            datacenter: datacenter.id.clone(),
        };
        self.cached(key, |r| r.resolve_network(path, datacenter))
    }

    fn resolve_datastore_cluster(
        &self,
        name: &str,
        datacenter: &Datacenter,
    ) -> Result<String, ResolveError> {
        let key = Lookup::DatastoreCluster {
            name: name.to_string(),
            datacenter: datacenter.id.clone(),
        };
        self.cached(key, |r| r.resolve_datastore_cluster(name, datacenter))
    }
}
