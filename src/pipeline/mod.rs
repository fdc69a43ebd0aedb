// src/pipeline/mod.rs
//! Manifest → machine list.
//!
//! Each row goes through a fixed sequence of stages, each a plain function
//! returning a new value:
//!
//! 1. normalize the raw CSV cells into typed cells
//! 2. match the query against the normalized (pre-resolution) values
//! 3. evaluate expiry: run for every row, so one bad date fails the whole run
//! 4. stop here for rows that missed the query or are past the grace window
//! 5. apply default disk sizes
//! 6. resolve vApp, folder and network through the inventory
//! 7. assemble the output record
//!
//! Every error is fatal: the caller gets all machines or none.

pub mod record;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::{ManifestError, Result};
use crate::inventory::{Datacenter, InventoryResolver};
use crate::manifest::{normalize, Cell, Column, ManifestReader, NormalizedRecord, RawRow};
use crate::policy::{
    disks::{self, DefaultDiskSizes},
    expiry::{self, Expiry},
    query::{self, QueryConstraints},
};

pub use record::{MachineRecord, RunOutput};

/// Inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub csv_path: PathBuf,
    pub query: QueryConstraints,
    pub default_disks: DefaultDiskSizes,
    /// Datastore cluster the machines will be placed on; must exist.
    pub datastore_cluster: String,
}

/// Resolved placement of one machine.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement {
    vapp: String,
    folder: String,
    network: String,
}

#[derive(Debug, Default)]
struct RunStats {
    rows: usize,
    unmatched: usize,
    expired: usize,
    emitted: usize,
}

/// Run the whole pipeline for `request`, as of `today`.
#[instrument(level = "info", skip_all, fields(csv = %request.csv_path.display(), datacenter = %datacenter.id))]
pub fn run<R: InventoryResolver>(
    request: &RunRequest,
    datacenter: &Datacenter,
    resolver: &R,
    today: NaiveDate,
) -> Result<RunOutput> {
    info!(inventory_path = %datacenter.inventory_path, %today, "starting manifest run");

    let datastore_cluster_id = resolver
        .resolve_datastore_cluster(&request.datastore_cluster, datacenter)
        .map_err(|source| ManifestError::Resolution {
            kind: "datastore cluster",
            name: request.datastore_cluster.clone(),
            source,
        })?;
    debug!(%datastore_cluster_id, "datastore cluster resolved");

    let reader = ManifestReader::open(&request.csv_path)?;
    let file = reader.file().to_path_buf();
    let machines = process_rows(&file, reader, request, datacenter, resolver, today)?;

    Ok(RunOutput {
        datastore_cluster_id,
        machines,
    })
}

/// Push already-read rows through the per-row stages, in order.
pub fn process_rows<I, R>(
    file: &Path,
    rows: I,
    request: &RunRequest,
    datacenter: &Datacenter,
    resolver: &R,
    today: NaiveDate,
) -> Result<Vec<MachineRecord>>
where
    I: IntoIterator<Item = Result<RawRow>>,
    R: InventoryResolver,
{
    let mut stats = RunStats::default();
    let mut machines = Vec::new();

    for raw in rows {
        let record = normalize(file, raw?)?;
        stats.rows += 1;

        let matched = query::matches(&record, &request.query);
        let expiry = expiry::evaluate(record.get(Column::Expires), today).map_err(|e| {
            ManifestError::InvalidDateFormat {
                file: file.to_path_buf(),
                line: record.line,
                value: e.0,
            }
        })?;

        if !matched {
            stats.unmatched += 1;
            continue;
        }
        if expiry.excluded {
            debug!(
                line = record.line,
                hostname = %record.get(Column::Hostname),
                delta_hours = expiry.delta_hours,
                "past grace window, dropping"
            );
            stats.expired += 1;
            continue;
        }

        let disks = disks::apply(&record, &request.default_disks).map_err(|e| {
            ManifestError::InvalidNumber {
                file: file.to_path_buf(),
                line: record.line,
                column: e.column.as_str(),
                value: e.value,
            }
        })?;
        let placement = resolve_placement(&record, datacenter, resolver)?;

        machines.push(assemble(file, &record, &expiry, disks, placement)?);
        stats.emitted += 1;
    }

    info!(
        rows = stats.rows,
        unmatched = stats.unmatched,
        expired = stats.expired,
        emitted = stats.emitted,
        "manifest processed"
    );
    Ok(machines)
}

/// `name[:pool]`. Anything other than exactly one `:` keeps only the part
/// before the first one.
fn split_vapp(token: &str) -> (&str, &str) {
    let parts: Vec<&str> = token.split(':').collect();
    match parts.as_slice() {
        [vapp, pool] => (*vapp, *pool),
        _ => (parts[0], ""),
    }
}

fn resolve_placement<R: InventoryResolver>(
    record: &NormalizedRecord,
    datacenter: &Datacenter,
    resolver: &R,
) -> Result<Placement> {
    let mut placement = Placement {
        vapp: String::new(),
        folder: "/".to_string(),
        network: String::new(),
    };

    let vapp_token = record.get(Column::Vapp).render();
    if !vapp_token.is_empty() {
        let (vapp, pool) = split_vapp(vapp_token);

        let hint = format!("{}/{}", datacenter.vm_root(), vapp_token);
        match resolver.resolve_folder(&hint) {
            Ok(folder) => placement.folder = folder,
            Err(err) => debug!(
                %hint,
                error = %err,
                "error parsing virtual machine path, using / for folder"
            ),
        }

        placement.vapp = resolver
            .resolve_resource_pool(vapp, pool, datacenter)
            .map_err(|source| ManifestError::Resolution {
                kind: "resource pool",
                name: vapp_token.to_string(),
                source,
            })?;
        debug!(line = record.line, vapp = %placement.vapp, "resource pool resolved");
    }

    let network = record.get(Column::Network).render();
    if !network.is_empty() {
        placement.network = resolver
            .resolve_network(network, datacenter)
            .map_err(|source| ManifestError::Resolution {
                kind: "network",
                name: network.to_string(),
                source,
            })?;
    }

    Ok(placement)
}

/// Integer output column: empty reads as 0, anything else must be a
/// non-negative integer.
fn count(file: &Path, record: &NormalizedRecord, column: Column) -> Result<u64> {
    match record.get(column) {
        cell if cell.is_empty() => Ok(0),
        Cell::Int { value, .. } if *value >= 0 => Ok(*value as u64),
        other => Err(ManifestError::InvalidNumber {
            file: file.to_path_buf(),
            line: record.line,
            column: column.as_str(),
            value: other.to_string(),
        }),
    }
}

fn assemble(
    file: &Path,
    record: &NormalizedRecord,
    expiry: &Expiry,
    disks: [i64; 4],
    placement: Placement,
) -> Result<MachineRecord> {
    let mut sizes = [0u64; 4];
    for ((size, value), column) in sizes.iter_mut().zip(disks).zip(Column::DISKS) {
        *size = u64::try_from(value).map_err(|_| ManifestError::InvalidNumber {
            file: file.to_path_buf(),
            line: record.line,
            column: column.as_str(),
            value: value.to_string(),
        })?;
    }
    let text = |column: Column| record.get(column).to_string();

    Ok(MachineRecord {
        hostname: text(Column::Hostname),
        address: text(Column::Address),
        gateway: text(Column::Gateway),
        subnet: count(file, record, Column::Subnet)?,
        cpu: count(file, record, Column::Cpu)?,
        memory: count(file, record, Column::Memory)?,
        expires: expiry.expires_string(),
        power: expiry.power.to_string(),
        template: text(Column::Template),
        network: placement.network,
        vapp: placement.vapp,
        folder: placement.folder,
        disk0: sizes[0],
        disk1: sizes[1],
        disk2: sizes[2],
        disk3: sizes[3],
    })
}
