use std::fmt;

/// A manifest cell after coercion: integer if the whole text parses as a
/// base-10 integer, otherwise the original text untouched.
///
/// Integer cells keep the text they were parsed from, so `007` is still
/// `007` wherever the cell is used as a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Int { value: i64, raw: String },
    Text(String),
}

impl Cell {
    pub fn from_raw(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(value) => Cell::Int {
                value,
                raw: raw.to_string(),
            },
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// Empty text counts as an absent value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int { value, .. } => Some(*value),
            Cell::Text(_) => None,
        }
    }

    /// The cell exactly as written in the CSV.
    pub fn render(&self) -> &str {
        match self {
            Cell::Int { raw, .. } => raw,
            Cell::Text(s) => s,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}
