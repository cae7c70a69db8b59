use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid coordinate. Rows grow downwards, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Orientation of a beam skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Beam runs along a row
    Row,
    /// Beam runs along a column
    Column,
}

/// Travel direction of a beam along its axis.
///
/// `Forward` walks increasing indices (left-to-right for rows, top-to-bottom
/// for columns), `Backward` walks decreasing indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamDirection {
    Forward,
    Backward,
}

impl BeamDirection {
    pub const BOTH: [BeamDirection; 2] = [BeamDirection::Forward, BeamDirection::Backward];

    /// Short label as shown in combat logs ("ltr"/"rtl" or "ttb"/"btt").
    pub fn label(self, axis: Axis) -> &'static str {
        match (axis, self) {
            (Axis::Row, BeamDirection::Forward) => "ltr",
            (Axis::Row, BeamDirection::Backward) => "rtl",
            (Axis::Column, BeamDirection::Forward) => "ttb",
            (Axis::Column, BeamDirection::Backward) => "btt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::new(2, 3).to_string(), "(2,3)");
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(BeamDirection::Forward.label(Axis::Row), "ltr");
        assert_eq!(BeamDirection::Backward.label(Axis::Row), "rtl");
        assert_eq!(BeamDirection::Forward.label(Axis::Column), "ttb");
        assert_eq!(BeamDirection::Backward.label(Axis::Column), "btt");
    }
}
