//! Cell position parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style labels
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//! Labels are upper-case only and limited to the configured sheet bounds.
//!
//! # Examples
//!
//! ```
//! use gridcalc_engine::engine::Position;
//!
//! let pos = Position::from_str("B3");
//! assert_eq!(pos.col, 1); // 0-indexed
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::config::{MAX_COLS, MAX_POS_LETTER_COUNT, MAX_ROWS};

const LETTERS: i64 = 26;

/// A cell coordinate (0-indexed). Ordering is row-major.
#[derive(
    Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Sentinel returned by the codec for unparseable labels.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    /// Both coordinates lie inside the configured sheet bounds.
    pub fn is_valid(&self) -> bool {
        Self::NONE.row < self.row
            && self.row < MAX_ROWS
            && Self::NONE.col < self.col
            && self.col < MAX_COLS
    }

    /// Parse a label such as "A1" or "XFD16384".
    /// Returns [`Position::NONE`] if the label is malformed or out of bounds.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Position {
        Self::parse_a1(name).unwrap_or(Self::NONE)
    }

    fn parse_a1(name: &str) -> Option<Position> {
        let caps = label_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];
        if letters.len() > MAX_POS_LETTER_COUNT {
            return None;
        }

        let mut col_acc = 0i64;
        for c in letters.bytes() {
            col_acc = col_acc * LETTERS + i64::from(c - b'A') + 1;
        }
        let col = i32::try_from(col_acc - 1).ok()?;

        let row = numbers.parse::<i32>().ok()?.checked_sub(1)?;

        let pos = Position::new(row, col);
        pos.is_valid().then_some(pos)
    }

    /// Convert a column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = i64::from(col) + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % LETTERS) as u8) as char);
            n /= LETTERS;
        }
        result
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell position: {}", s))
    }
}

/// Invalid positions format as an empty string.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

fn label_re() -> &'static Regex {
    static LABEL_RE: OnceLock<Regex> = OnceLock::new();
    LABEL_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$")
            .expect("position label regex must compile")
    })
}

/// Dimensions of the printable area of a sheet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
