use std::fmt;
use std::str::FromStr;

/// One column of the machine manifest, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Hostname,
    Address,
    Gateway,
    Subnet,
    Cpu,
    Memory,
    Vapp,
    Network,
    Template,
    Disk0,
    Disk1,
    Disk2,
    Disk3,
    Expires,
}

impl Column {
    /// Every column, in the order cells appear in a row.
    pub const ALL: [Column; 14] = [
        Column::Hostname,
        Column::Address,
        Column::Gateway,
        Column::Subnet,
        Column::Cpu,
        Column::Memory,
        Column::Vapp,
        Column::Network,
        Column::Template,
        Column::Disk0,
        Column::Disk1,
        Column::Disk2,
        Column::Disk3,
        Column::Expires,
    ];

    pub const DISKS: [Column; 4] = [Column::Disk0, Column::Disk1, Column::Disk2, Column::Disk3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Hostname => "hostname",
            Column::Address => "address",
            Column::Gateway => "gateway",
            Column::Subnet => "subnet",
            Column::Cpu => "cpu",
            Column::Memory => "memory",
            Column::Vapp => "vapp",
            Column::Network => "network",
            Column::Template => "template",
            Column::Disk0 => "disk0",
            Column::Disk1 => "disk1",
            Column::Disk2 => "disk2",
            Column::Disk3 => "disk3",
            Column::Expires => "expires",
        }
    }

    /// Position of this column within a row.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown manifest column {0:?}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// True when `cells` spell out the column names, position by position.
pub fn is_header<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.len() == Column::ALL.len()
        && cells
            .iter()
            .zip(Column::ALL.iter())
            .all(|(cell, col)| cell.as_ref() == col.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position() {
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), i);
        }
        assert_eq!(Column::Disk2.index(), 11);
    }

    #[test]
    fn parses_names() {
        assert_eq!("vapp".parse::<Column>().unwrap(), Column::Vapp);
        assert_eq!("disk3".parse::<Column>().unwrap(), Column::Disk3);
        assert!("folder".parse::<Column>().is_err());
        assert!("Hostname".parse::<Column>().is_err());
    }

    #[test]
    fn header_detection_is_exact() {
        let header: Vec<&str> = Column::ALL.iter().map(|c| c.as_str()).collect();
        assert!(is_header(&header));
        assert!(!is_header(&header[..5]));

        let mut shifted = header.clone();
        shifted.swap(0, 1);
        assert!(!is_header(&shifted));
    }
}
