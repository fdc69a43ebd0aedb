use std::collections::BTreeMap;
use tracing::trace;

use crate::manifest::{Cell, NormalizedRecord};

/// Column name → expected value.
pub type QueryConstraints = BTreeMap<String, String>;

/// Check a record against every constraint.
///
/// A field matches when its text equals the expected value, or when it is a
/// string ending with it. Constraints naming a field the record does not have
/// reject. Values are the normalized CSV values, before any inventory lookup,
/// so `vapp` is matched against the name written in the manifest.
pub fn matches(record: &NormalizedRecord, query: &QueryConstraints) -> bool {
    query.iter().all(|(key, expected)| {
        let hit = match record.field(key) {
            Some(Cell::Text(actual)) => actual == expected || actual.ends_with(expected.as_str()),
            Some(cell @ Cell::Int { .. }) => cell.render() == expected.as_str(),
            None => false,
        };
        trace!(line = record.line, key = %key, expected = %expected, hit, "query constraint");
        hit
    })
}
