//! Spreadsheet engine API.
//!
//! This module provides the leaf components the sheet is built on:
//!
//! - [`Position`], [`Size`] - Cell coordinates and their A1 labels
//! - [`Value`], [`FormulaError`] - What a cell evaluates to
//! - [`Formula`] - Parsed formula: evaluation, canonical text, referenced cells
//! - [`extract_dependencies`] - Referenced cells of a parsed expression
//! - [`format_number`] - Number formatting for output
//! - [`config`] - Sheet bounds and reserved characters

pub mod config;
mod deps;
mod format;
mod formula;
mod parser;
mod position;
mod value;

pub use deps::extract_dependencies;
pub use format::format_number;
pub use formula::Formula;
pub use parser::{BinaryOp, Expr, ParseError, UnaryOp, parse};
pub use position::{Position, Size};
pub use value::{FormulaError, Value};
