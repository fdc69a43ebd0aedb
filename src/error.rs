use std::path::PathBuf;

use crate::inventory::ResolveError;

/// Everything that can abort a manifest run. Every variant is fatal: a run
/// either produces its complete list of machines or one of these.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", file.display())]
    InputNotFound {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV file {} at line {line}: {source}", file.display())]
    MalformedInput {
        file: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error(
        "{} line {line}: expected {expected} fields, found {found}",
        file.display()
    )]
    SchemaMismatch {
        file: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(
        "{} line {line}: invalid date format for expires {value:?}, format should be 'YYYY-MM-DD'",
        file.display()
    )]
    InvalidDateFormat {
        file: PathBuf,
        line: u64,
        value: String,
    },

    #[error(
        "{} line {line}: {column} must be a non-negative integer, got {value:?}",
        file.display()
    )]
    InvalidNumber {
        file: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("error loading {kind} {name:?}: {source}")]
    Resolution {
        kind: &'static str,
        name: String,
        #[source]
        source: ResolveError,
    },
}

pub type Result<T, E = ManifestError> = std::result::Result<T, E>;
