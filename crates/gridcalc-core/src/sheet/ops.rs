use crate::error::{Result, SheetError};
use gridcalc_engine::engine::Position;

use super::Sheet;
use super::cell::{Cell, CellContent};
use super::state::check_position;

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// Fails without changing anything if the position is invalid, the
    /// formula does not parse, or the formula would read its own cell
    /// directly or transitively.
    pub fn set_cell(&mut self, pos: Position, text: impl Into<String>) -> Result<()> {
        check_position(pos)?;
        let content = CellContent::parse(text.into())?;

        if self.would_create_cycle(pos, content.referenced_cells()) {
            log::debug!("Rejected circular formula at {}", pos);
            return Err(SheetError::CircularDependency(pos));
        }

        self.commit_content(pos, content);
        Ok(())
    }

    /// Clear the specified cell. The entry is removed unless another formula
    /// still reads it, in which case it stays as an empty placeholder.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;
        if self.cells.contains_key(&pos) {
            self.commit_content(pos, CellContent::Empty);
        }
        Ok(())
    }

    /// Install already-validated content at `pos`.
    fn commit_content(&mut self, pos: Position, content: CellContent) {
        let old_referenced = self
            .cells
            .get(&pos)
            .map(|cell| cell.referenced_cells().to_vec())
            .unwrap_or_default();
        let new_referenced = content.referenced_cells().to_vec();

        self.invalidate_cache(pos);
        self.remove_dependencies(pos, &old_referenced);
        self.cells
            .entry(pos)
            .or_insert_with(Cell::new)
            .set_content(content);
        self.add_dependencies(pos, &new_referenced);
        self.collect_orphan(pos);
    }
}
