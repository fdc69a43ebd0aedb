use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::manifest::columns::is_header;

/// One CSV record as read from disk, before any typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line the record starts on.
    pub line: u64,
    pub cells: Vec<String>,
}

/// Single-pass reader over a machine manifest.
///
/// Any row equal to the column header is dropped, wherever it appears in the
/// file, not only on the first line. Field counts are not checked here; that
/// is left to the normalizer so the error can name the schema.
pub struct ManifestReader<R: Read> {
    file: PathBuf,
    records: StringRecordsIntoIter<R>,
}

impl ManifestReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ManifestError::InputNotFound {
            file: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(path, file))
    }
}

impl<R: Read> ManifestReader<R> {
    /// Wrap any byte source; `file` is only used to label errors.
    pub fn from_reader<P: AsRef<Path>>(file: P, reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self {
            file: file.as_ref().to_path_buf(),
            records,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl<R: Read> Iterator for ManifestReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(source) => {
                    let line = source.position().map(|p| p.line()).unwrap_or(0);
                    return Some(Err(ManifestError::MalformedInput {
                        file: self.file.clone(),
                        line,
                        source,
                    }));
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cells: Vec<String> = record.iter().map(str::to_string).collect();

            if is_header(&cells) {
                debug!(line, "skipping header row");
                continue;
            }
            return Some(Ok(RawRow { line, cells }));
        }
    }
}
