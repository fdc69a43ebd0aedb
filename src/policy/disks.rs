use std::collections::BTreeMap;

use crate::manifest::{Cell, Column, NormalizedRecord};

/// Disk slot name (`disk0`..`disk3`) → minimum size, as written in the config.
pub type DefaultDiskSizes = BTreeMap<String, String>;

/// A disk cell that is neither empty nor an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{column} is not an integer: {value:?}")]
pub struct NotAnInteger {
    pub column: Column,
    pub value: String,
}

/// Resolve the four disk sizes of a record.
///
/// An empty slot takes the default (or 0 when there is none). A filled slot is
/// raised to the default when smaller and otherwise left alone; it is never
/// lowered. Defaults that do not parse count as 0.
pub fn apply(record: &NormalizedRecord, defaults: &DefaultDiskSizes) -> Result<[i64; 4], NotAnInteger> {
    let mut sizes = [0i64; 4];
    for (slot, column) in Column::DISKS.iter().enumerate() {
        let default = defaults
            .get(column.as_str())
            .map(|raw| raw.parse::<i64>().unwrap_or(0));

        sizes[slot] = match record.get(*column) {
            cell if cell.is_empty() => default.unwrap_or(0),
            Cell::Int { value: size, .. } => match default {
                Some(min) if *size < min => min,
                _ => *size,
            },
            Cell::Text(other) => {
                return Err(NotAnInteger {
                    column: *column,
                    value: other.clone(),
                })
            }
        };
    }
    Ok(sizes)
}
