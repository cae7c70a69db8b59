use crate::infra::{Axis, BeamDirection, Cell, beam_path};

use super::unit::{Unit, UnitKind};

/// Side length of the square battlefield.
pub const GRID_SIZE: usize = 4;

/// The N×N battlefield. Each cell holds at most one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Unit>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        GRID_SIZE
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < GRID_SIZE && cell.col < GRID_SIZE
    }

    pub fn get(&self, cell: Cell) -> Option<&Unit> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[cell.row][cell.col].as_ref()
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut Unit> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[cell.row][cell.col].as_mut()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Puts `unit` at its own position, returning whatever was there before.
    /// Out-of-bounds positions are rejected and handed back.
    pub fn insert(&mut self, unit: Unit) -> Result<Option<Unit>, Unit> {
        let cell = unit.position;
        if !self.contains(cell) {
            return Err(unit);
        }
        Ok(self.cells[cell.row][cell.col].replace(unit))
    }

    pub fn remove(&mut self, cell: Cell) -> Option<Unit> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[cell.row][cell.col].take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Unit)> {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, slot)| slot.as_ref().map(|unit| (Cell::new(row, col), unit)))
        })
    }

    pub fn occupied_cells(&self) -> Vec<Cell> {
        self.iter().map(|(cell, _)| cell).collect()
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| Cell::new(row, col)))
            .filter(|cell| !self.is_occupied(*cell))
            .collect()
    }

    pub fn cells_of(&self, kind: UnitKind) -> Vec<Cell> {
        self.iter()
            .filter(|(_, unit)| unit.kind == kind)
            .map(|(cell, _)| cell)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Unit counts indexed by [`UnitKind::index`].
    pub fn unit_counts(&self) -> [usize; UnitKind::COUNT] {
        let mut counts = [0; UnitKind::COUNT];
        for (_, unit) in self.iter() {
            counts[unit.kind.index()] += 1;
        }
        counts
    }

    pub fn total_attack_power(&self) -> i32 {
        self.iter().map(|(_, unit)| unit.attack_power.max(0)).sum()
    }

    /// Cells a beam visits along line `index`, in travel order.
    pub fn line(&self, axis: Axis, index: usize, direction: BeamDirection) -> Vec<Cell> {
        beam_path(axis, index, direction, GRID_SIZE)
    }

    /// Number of damage-dealing units (AD and Knight) on line `index`.
    pub fn damage_dealers_on_line(&self, axis: Axis, index: usize) -> usize {
        self.line(axis, index, BeamDirection::Forward)
            .into_iter()
            .filter(|cell| {
                matches!(
                    self.get(*cell).map(|unit| unit.kind),
                    Some(UnitKind::Ad | UnitKind::Knight)
                )
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(units: &[(UnitKind, usize, usize)]) -> Board {
        let mut board = Board::new();
        for &(kind, row, col) in units {
            board
                .insert(Unit::new(kind, Cell::new(row, col)))
                .expect("in bounds");
        }
        board
    }

    #[test]
    fn test_insert_and_remove() {
        let mut board = Board::new();
        assert!(board.is_empty());

        let previous = board.insert(Unit::new(UnitKind::Ad, Cell::new(1, 2))).unwrap();
        assert!(previous.is_none());
        assert!(board.is_occupied(Cell::new(1, 2)));
        assert_eq!(board.len(), 1);

        let removed = board.remove(Cell::new(1, 2)).unwrap();
        assert_eq!(removed.kind, UnitKind::Ad);
        assert!(board.is_empty());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut board = Board::new();
        let result = board.insert(Unit::new(UnitKind::Tank, Cell::new(4, 0)));
        assert!(result.is_err());
        assert!(board.get(Cell::new(9, 9)).is_none());
    }

    #[test]
    fn test_counts_and_attack() {
        let board = board_with(&[
            (UnitKind::Tank, 0, 0),
            (UnitKind::Knight, 1, 1),
            (UnitKind::Ad, 2, 2),
            (UnitKind::Ad, 3, 3),
        ]);
        assert_eq!(board.unit_counts(), [1, 1, 2]);
        assert_eq!(board.total_attack_power(), 5);
        assert_eq!(board.empty_cells().len(), 12);
        assert_eq!(board.cells_of(UnitKind::Ad), vec![Cell::new(2, 2), Cell::new(3, 3)]);
    }

    #[test]
    fn test_damage_dealers_on_line() {
        let board = board_with(&[
            (UnitKind::Tank, 1, 0),
            (UnitKind::Knight, 1, 1),
            (UnitKind::Ad, 1, 3),
            (UnitKind::Ad, 0, 3),
        ]);
        assert_eq!(board.damage_dealers_on_line(Axis::Row, 1), 2);
        assert_eq!(board.damage_dealers_on_line(Axis::Column, 3), 2);
        assert_eq!(board.damage_dealers_on_line(Axis::Column, 0), 0);
    }
}
