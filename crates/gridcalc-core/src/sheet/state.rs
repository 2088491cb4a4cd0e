use dashmap::DashMap;

use crate::error::{Result, SheetError};
use gridcalc_engine::engine::Position;

use super::cell::{Cell, CellView};

/// Sparse cell storage keyed by position.
///
/// Lookups take `&self`, so a formula can read other cells and fill their
/// caches while the sheet is only shared-borrowed.
pub type Grid = DashMap<Position, Cell>;

/// A sheet of cells with an acyclic dependency graph.
#[derive(Default)]
pub struct Sheet {
    pub(crate) cells: Grid,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Sheet {
            cells: Grid::new(),
        }
    }

    /// Look up a cell. Reading never creates an entry.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        check_position(pos)?;
        Ok(self.view(pos))
    }

    /// Number of stored entries, placeholders included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn view(&self, pos: Position) -> Option<CellView<'_>> {
        self.cells
            .contains_key(&pos)
            .then(|| CellView::new(self, pos))
    }
}

pub(crate) fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
