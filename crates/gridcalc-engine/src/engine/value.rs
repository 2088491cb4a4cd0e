//! Cell values and the runtime error categories a formula can produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::format::format_number;

/// Runtime error category of a formula result.
///
/// These are ordinary values: they are stored in caches, flow through
/// dependent formulas unchanged and print as their token.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FormulaError {
    /// Reference to a position outside the sheet.
    #[error("#REF!")]
    Ref,
    /// A referenced cell holds text that is not a number.
    #[error("#VALUE!")]
    Value,
    /// Division by zero or another non-finite result.
    #[error("#ARITHM!")]
    Arithmetic,
}

/// The value exposed by a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl Value {
    /// The value of an empty cell.
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    /// Interpret this value as a formula operand.
    ///
    /// Empty text counts as zero, numeric text as its number. Other text is a
    /// `#VALUE!` error and an error value propagates as-is.
    pub fn as_number(&self) -> Result<f64, FormulaError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(text) if text.is_empty() => Ok(0.0),
            Value::Text(text) => parse_numeric(text).ok_or(FormulaError::Value),
            Value::Error(err) => Err(*err),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<FormulaError> for Value {
    fn from(err: FormulaError) -> Self {
        Value::Error(err)
    }
}

impl From<Result<f64, FormulaError>> for Value {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(err) => Value::Error(err),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Parse text that is entirely a decimal float literal.
/// Leading whitespace is allowed, anything after the literal is not.
fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let starts_ok = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'));
    let body_ok = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !starts_ok || !body_ok {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
