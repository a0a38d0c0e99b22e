use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A row-column cell coordinate.
///
/// On the wire a cell is addressed as a `"row-col"` string (e.g. `"0-0"`),
/// which is what clients key their cell tables by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellRef {
    type Err = ParseCellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once('-')
            .ok_or_else(|| ParseCellRefError(s.to_string()))?;
        let row = row.parse().map_err(|_| ParseCellRefError(s.to_string()))?;
        let col = col.parse().map_err(|_| ParseCellRefError(s.to_string()))?;
        Ok(CellRef { row, col })
    }
}

#[derive(Debug)]
pub struct ParseCellRefError(String);

impl fmt::Display for ParseCellRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid cell id '{}'. Expected 'row-col'.", self.0)
    }
}

impl std::error::Error for ParseCellRefError {}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Position of a user's cursor within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CursorPosition {
    pub row: u32,
    pub col: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ref_round_trips_through_wire_format() {
        let cell = CellRef::new(3, 17);
        assert_eq!(cell.to_string(), "3-17");
        assert_eq!("3-17".parse::<CellRef>().unwrap(), cell);
        assert_eq!(serde_json::to_string(&cell).unwrap(), "\"3-17\"");
        let parsed: CellRef = serde_json::from_str("\"3-17\"").unwrap();
        assert_eq!(parsed, cell);
    }

    #[test]
    fn malformed_cell_ids_are_rejected() {
        assert!("".parse::<CellRef>().is_err());
        assert!("12".parse::<CellRef>().is_err());
        assert!("a-b".parse::<CellRef>().is_err());
        assert!(serde_json::from_str::<CellRef>("\"1-\"").is_err());
    }
}
