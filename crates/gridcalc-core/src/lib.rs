//! gridcalc-core - Sheet model with an incrementally maintained dependency graph.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::{Cell, CellContent, CellView, Sheet};

pub use gridcalc_engine::engine::{FormulaError, Position, Size, Value};
