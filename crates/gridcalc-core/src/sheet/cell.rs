//! Cell data structures for the sheet.
//!
//! - [`CellContent`] - What a cell holds (empty, literal text or a formula)
//! - [`Cell`] - Content plus its value cache and the reverse edges of the
//!   dependency graph
//! - [`CellView`] - Read-only handle returned by [`Sheet::get_cell`]

use std::collections::HashSet;
use std::sync::Arc;

use gridcalc_engine::engine::config::{ESCAPE_SIGN, FORMULA_SIGN};
use gridcalc_engine::engine::{Formula, ParseError, Position, Value};

use super::Sheet;

/// The content stored in a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    /// Raw input, including a leading escape character if one was typed.
    Text(String),
    Formula(Arc<Formula>),
}

impl CellContent {
    /// Classify user input.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (parsed)
    /// - Anything else, including a lone `=` -> Text
    pub fn parse(input: String) -> Result<CellContent, ParseError> {
        if input.is_empty() {
            return Ok(CellContent::Empty);
        }
        if let Some(expression) = input.strip_prefix(FORMULA_SIGN)
            && !expression.is_empty()
        {
            return Ok(CellContent::Formula(Arc::new(Formula::parse(expression)?)));
        }
        Ok(CellContent::Text(input))
    }

    /// Text as the user would edit it.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Cells this content reads. Only formulas read anything.
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Empty | CellContent::Text(_) => &[],
            CellContent::Formula(formula) => formula.referenced_cells(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

/// Result of reading a cell without evaluating anything.
pub(crate) enum Lookup {
    Ready(Value),
    /// Formula with no cached value yet.
    Pending(Arc<Formula>),
}

/// A cell in the sheet. Its identity is the position it is stored under.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    content: CellContent,
    /// Last computed value of a formula; `None` until evaluated or after invalidation.
    cache: Option<Value>,
    /// Cells whose formulas read this one.
    dependents: HashSet<Position>,
}

impl Cell {
    pub fn new() -> Cell {
        Cell::default()
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        self.content.referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn dependents(&self) -> impl Iterator<Item = &Position> {
        self.dependents.iter()
    }

    /// Counts toward the printable area of the sheet.
    pub fn is_printable(&self) -> bool {
        self.is_referenced() || !self.content.is_empty()
    }

    /// Empty and unreferenced: the sheet must not keep it.
    pub(crate) fn is_garbage(&self) -> bool {
        self.content.is_empty() && !self.is_referenced()
    }

    pub(crate) fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub(crate) fn reset_cache(&mut self) {
        self.cache = None;
    }

    pub(crate) fn store_cache(&mut self, value: Value) {
        if matches!(self.content, CellContent::Formula(_)) {
            self.cache = Some(value);
        }
    }

    pub(crate) fn lookup(&self) -> Lookup {
        match &self.content {
            CellContent::Empty => Lookup::Ready(Value::empty()),
            CellContent::Text(text) => {
                let text = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                Lookup::Ready(Value::Text(text.to_string()))
            }
            CellContent::Formula(formula) => match &self.cache {
                Some(value) => Lookup::Ready(value.clone()),
                None => Lookup::Pending(Arc::clone(formula)),
            },
        }
    }

    /// Swap in new content. The cache always starts empty for the new content.
    pub(crate) fn set_content(&mut self, content: CellContent) -> CellContent {
        self.cache = None;
        std::mem::replace(&mut self.content, content)
    }

    pub(crate) fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub(crate) fn remove_dependent(&mut self, pos: &Position) {
        self.dependents.remove(pos);
    }
}

/// Read-only view of a stored cell.
///
/// Holds the position, not the cell: every accessor resolves through the
/// sheet, so a view can never observe a removed entry.
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(sheet: &'a Sheet, pos: Position) -> CellView<'a> {
        CellView { sheet, pos }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Current value, evaluating and caching a formula if needed.
    pub fn value(&self) -> Value {
        self.sheet.cell_value(self.pos)
    }

    pub fn text(&self) -> String {
        self.sheet
            .cells
            .get(&self.pos)
            .map(|cell| cell.text())
            .unwrap_or_default()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.sheet
            .cells
            .get(&self.pos)
            .map(|cell| cell.referenced_cells().to_vec())
            .unwrap_or_default()
    }

    pub fn is_referenced(&self) -> bool {
        self.sheet
            .cells
            .get(&self.pos)
            .is_some_and(|cell| cell.is_referenced())
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("position", &self.pos)
            .field("text", &self.text())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_engine::engine::FormulaError;

    fn content(input: &str) -> CellContent {
        CellContent::parse(input.to_string()).unwrap()
    }

    #[test]
    fn test_classify_input() {
        assert_eq!(content(""), CellContent::Empty);
        assert_eq!(content("hello"), CellContent::Text("hello".into()));
        assert_eq!(content("="), CellContent::Text("=".into()));
        assert_eq!(content("'=1+2"), CellContent::Text("'=1+2".into()));
        assert!(matches!(content("=1+2"), CellContent::Formula(_)));
    }

    #[test]
    fn test_classify_bad_formula() {
        assert!(CellContent::parse("=1+".to_string()).is_err());
        assert!(CellContent::parse("=A1)".to_string()).is_err());
    }

    #[test]
    fn test_text_keeps_escape_value_drops_it() {
        let mut cell = Cell::new();
        cell.set_content(content("'=1+2"));
        assert_eq!(cell.text(), "'=1+2");
        assert!(matches!(cell.lookup(), Lookup::Ready(Value::Text(t)) if t == "=1+2"));
    }

    #[test]
    fn test_only_one_escape_is_dropped() {
        let mut cell = Cell::new();
        cell.set_content(content("''x"));
        assert!(matches!(cell.lookup(), Lookup::Ready(Value::Text(t)) if t == "'x"));
    }

    #[test]
    fn test_formula_text_is_canonical() {
        assert_eq!(content("= ( 1 + 2 ) * A1").text(), "=(1+2)*A1");
    }

    #[test]
    fn test_cache_follows_content() {
        let mut cell = Cell::new();
        cell.set_content(content("=1/0"));
        assert!(matches!(cell.lookup(), Lookup::Pending(_)));

        cell.store_cache(Value::Error(FormulaError::Arithmetic));
        assert!(cell.has_cache());
        assert!(matches!(
            cell.lookup(),
            Lookup::Ready(Value::Error(FormulaError::Arithmetic))
        ));

        cell.set_content(content("text"));
        assert!(!cell.has_cache());
        cell.store_cache(Value::Number(1.0));
        assert!(!cell.has_cache());
    }

    #[test]
    fn test_garbage_requires_empty_and_unreferenced() {
        let mut cell = Cell::new();
        assert!(cell.is_garbage());

        cell.add_dependent(Position::new(0, 0));
        assert!(!cell.is_garbage());
        assert!(cell.is_printable());

        cell.remove_dependent(&Position::new(0, 0));
        assert!(cell.is_garbage());
        assert!(!cell.is_printable());
    }
}
