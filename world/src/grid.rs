//! Dense cell→defender occupancy bookkeeping.

use lane_defence_core::{CellCoord, DefenderId};

/// Row-major grid recording which defender occupies each cell.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    rows: u32,
    columns: u32,
    cells: Vec<Option<DefenderId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<DefenderId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Occupies a free in-bounds cell, reporting whether the claim succeeded.
    pub(crate) fn occupy(&mut self, defender: DefenderId, cell: CellCoord) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        match self.cells.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(defender);
                true
            }
            _ => false,
        }
    }

    /// Frees the cell if it still points at `defender`.
    pub(crate) fn vacate(&mut self, defender: DefenderId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                if *slot == Some(defender) {
                    *slot = None;
                }
            }
        }
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
