//! Per-record policies applied between normalization and output.
pub mod disks;
pub mod expiry;
pub mod query;

pub use disks::DefaultDiskSizes;
pub use expiry::{Expiry, GRACE_HOURS};
pub use query::QueryConstraints;
