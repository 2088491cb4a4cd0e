//! Error types for Gridcalc core.

use gridcalc_engine::engine::{ParseError, Position};
use thiserror::Error;

/// Structural errors raised by sheet mutations.
///
/// A failed mutation leaves the sheet exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid position: row {}, col {}", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Formula syntax error: {0}")]
    FormulaSyntax(#[from] ParseError),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),
}

pub type Result<T> = std::result::Result<T, SheetError>;
