//! Limits and reserved characters shared by the codec and the cell model.

/// Number of addressable rows. Valid row indices are `0..MAX_ROWS`.
pub const MAX_ROWS: i32 = 16384;

/// Number of addressable columns. Valid column indices are `0..MAX_COLS`.
pub const MAX_COLS: i32 = 16384;

/// Longest column label accepted by the codec (`XFD` is the last column).
pub const MAX_POS_LETTER_COUNT: usize = 3;

/// Leading character that marks cell input as a formula.
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces cell input to be stored as text.
/// It stays in the cell text and is dropped from the cell value.
pub const ESCAPE_SIGN: char = '\'';

/// Deepest formula accepted by the parser, counting parentheses, unary signs
/// and operator chains. Evaluation and printing recurse at most this deep.
pub const MAX_FORMULA_DEPTH: usize = 256;
