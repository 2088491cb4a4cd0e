//! Dependency graph maintenance.
//!
//! Forward edges are the referenced cells of a cell's content; backward edges
//! are the `dependents` set of each cell. Both are positions resolved through
//! the sheet's storage. The steps here run at fixed points of an edit:
//!
//! 1. [`Sheet::would_create_cycle`] before anything changes
//! 2. [`Sheet::invalidate_cache`] on the edited cell and its readers
//! 3. [`Sheet::remove_dependencies`] for the old content, collecting orphans
//! 4. [`Sheet::add_dependencies`] for the new content, creating placeholders

use std::collections::HashSet;

use gridcalc_engine::engine::Position;

use super::Sheet;
use super::cell::Cell;

impl Sheet {
    /// Whether giving `target` a formula that reads `candidate` would close a
    /// cycle, i.e. whether `target` is reachable from `candidate` along the
    /// current forward edges.
    ///
    /// Positions with no stored cell have no edges yet and end the walk there.
    pub(crate) fn would_create_cycle(&self, target: Position, candidate: &[Position]) -> bool {
        let mut visited: HashSet<Position> = HashSet::new();
        let mut stack: Vec<Position> = candidate.to_vec();

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(cell) = self.cells.get(&current) {
                stack.extend(
                    cell.referenced_cells()
                        .iter()
                        .copied()
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        false
    }

    /// Drop the cache of `pos` and of every cell that transitively reads it.
    ///
    /// A reader whose cache is already empty is not descended into: nothing
    /// downstream of it can hold a value computed from the old one.
    pub(crate) fn invalidate_cache(&mut self, pos: Position) {
        let mut stack = vec![pos];
        let mut cleared = 0usize;

        while let Some(current) = stack.pop() {
            let dependents: Vec<Position> = match self.cells.get_mut(&current) {
                Some(mut cell) => {
                    cell.reset_cache();
                    cell.dependents().copied().collect()
                }
                None => continue,
            };
            cleared += 1;

            for dep in dependents {
                if self.cells.get(&dep).is_some_and(|cell| cell.has_cache()) {
                    stack.push(dep);
                }
            }
        }

        log::trace!("Invalidated {} cache(s) starting at {}", cleared, pos);
    }

    /// Remove `pos` from the dependents of each cell it used to read.
    pub(crate) fn remove_dependencies(&mut self, pos: Position, referenced: &[Position]) {
        for target in referenced {
            if let Some(mut cell) = self.cells.get_mut(target) {
                cell.remove_dependent(&pos);
            }
            self.collect_orphan(*target);
        }
    }

    /// Register `pos` as a reader of each referenced cell, creating empty
    /// placeholders for positions that have no cell yet.
    pub(crate) fn add_dependencies(&mut self, pos: Position, referenced: &[Position]) {
        for target in referenced {
            let mut cell = self.cells.entry(*target).or_insert_with(|| {
                log::debug!("Created placeholder cell {} for {}", target, pos);
                Cell::new()
            });
            cell.add_dependent(pos);
        }
    }

    /// Remove the cell at `pos` if it is empty and nothing reads it.
    pub(crate) fn collect_orphan(&mut self, pos: Position) -> bool {
        let removed = self
            .cells
            .remove_if(&pos, |_, cell| cell.is_garbage())
            .is_some();
        if removed {
            log::debug!("Collected unreferenced empty cell {}", pos);
        }
        removed
    }

    /// Check the graph invariants. Panics if any are violated.
    ///
    /// Only available in test builds.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashMap;

        let snapshot: HashMap<Position, (Vec<Position>, Vec<Position>, bool)> = self
            .cells
            .iter()
            .map(|entry| {
                let cell = entry.value();
                (
                    *entry.key(),
                    (
                        cell.referenced_cells().to_vec(),
                        cell.dependents().copied().collect(),
                        cell.is_garbage(),
                    ),
                )
            })
            .collect();

        for (pos, (referenced, dependents, garbage)) in &snapshot {
            assert!(!garbage, "Unreferenced empty cell kept at {}", pos);

            for target in referenced {
                assert!(
                    snapshot
                        .get(target)
                        .is_some_and(|(_, deps, _)| deps.contains(pos)),
                    "Missing backward edge: {} should list {} as a dependent",
                    target,
                    pos
                );
            }

            for dep in dependents {
                assert!(
                    snapshot
                        .get(dep)
                        .is_some_and(|(refs, _, _)| refs.contains(pos)),
                    "Stale backward edge: {} lists {} but does not read it",
                    pos,
                    dep
                );
            }

            assert!(
                !self.would_create_cycle(*pos, referenced),
                "Cycle through {}",
                pos
            );
        }
    }
}
