use std::sync::Arc;

use gridcalc_engine::engine::{Formula, Position, Value};

use super::Sheet;
use super::cell::Lookup;

impl Sheet {
    /// Value of the cell at `pos`, filling formula caches on the way.
    ///
    /// Missing cells read as empty text. Uncached formulas below `pos` are
    /// evaluated first, deepest reference first, so each evaluation only
    /// reads cells that are already cached.
    pub(crate) fn cell_value(&self, pos: Position) -> Value {
        self.fill_caches(pos);
        match self.lookup(pos) {
            Some(Lookup::Ready(value)) => value,
            Some(Lookup::Pending(formula)) => self.evaluate_and_store(pos, &formula),
            None => Value::empty(),
        }
    }

    /// Evaluate every uncached formula reachable from `pos` along referenced
    /// cells, using an explicit stack instead of recursion.
    fn fill_caches(&self, pos: Position) {
        // (position, references already pushed)
        let mut stack = vec![(pos, false)];

        while let Some((current, expanded)) = stack.pop() {
            let Some(Lookup::Pending(formula)) = self.lookup(current) else {
                continue;
            };

            if expanded {
                self.evaluate_and_store(current, &formula);
                continue;
            }

            stack.push((current, true));
            for referenced in formula.referenced_cells() {
                if matches!(self.lookup(*referenced), Some(Lookup::Pending(_))) {
                    stack.push((*referenced, false));
                }
            }
        }
    }

    fn evaluate_and_store(&self, pos: Position, formula: &Arc<Formula>) -> Value {
        let value = formula.evaluate(&|referenced| match self.lookup(referenced) {
            Some(Lookup::Ready(value)) => value,
            // Not reached after fill_caches; kept correct regardless.
            Some(Lookup::Pending(_)) => self.cell_value(referenced),
            None => Value::empty(),
        });
        if let Some(mut cell) = self.cells.get_mut(&pos) {
            cell.store_cache(value.clone());
        }
        value
    }

    /// Read a cell without evaluating. No storage guard outlives the call.
    fn lookup(&self, pos: Position) -> Option<Lookup> {
        self.cells.get(&pos).map(|cell| cell.lookup())
    }
}
