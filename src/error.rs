//! Error types for the Gridcalc driver

use gridcalc_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running a command script
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Error at line {line}: {source}")]
    Sheet {
        line: usize,
        #[source]
        source: SheetError,
    },
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
