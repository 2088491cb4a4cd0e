//! Table output: printable area and row-major printing of values or texts.

use std::io::{self, Write};

use gridcalc_engine::engine::{Position, Size};

use super::Sheet;
use super::cell::CellView;

/// Field separator between columns.
pub const DEFAULT_DELIMITER: &str = "\t";

impl Sheet {
    /// Smallest box anchored at A1 containing every non-empty or referenced cell.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for entry in self.cells.iter() {
            if entry.value().is_printable() {
                let pos = entry.key();
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }

    /// Print every cell's value, one line per row.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_values_with_delimiter(out, DEFAULT_DELIMITER)
    }

    /// Print every cell's text, one line per row.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_texts_with_delimiter(out, DEFAULT_DELIMITER)
    }

    pub fn print_values_with_delimiter<W: Write>(
        &self,
        out: &mut W,
        delimiter: &str,
    ) -> io::Result<()> {
        self.print_with(out, delimiter, |cell| cell.value().to_string())
    }

    pub fn print_texts_with_delimiter<W: Write>(
        &self,
        out: &mut W,
        delimiter: &str,
    ) -> io::Result<()> {
        self.print_with(out, delimiter, |cell| cell.text())
    }

    fn print_with<W, F>(&self, out: &mut W, delimiter: &str, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(delimiter.as_bytes())?;
                }
                if let Some(cell) = self.view(Position::new(row, col)) {
                    out.write_all(render(&cell).as_bytes())?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
