//! Sheet state and logic.
//!
//! The sheet owns every cell. Edges between cells are stored as positions and
//! resolved through the sheet on each access, never as references to other
//! cells.

mod cell;
mod eval;
mod graph;
mod io;
mod ops;
mod state;

pub use cell::{Cell, CellContent, CellView};
pub use io::DEFAULT_DELIMITER;
pub use state::{Grid, Sheet};
