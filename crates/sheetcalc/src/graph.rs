//! Dependency tracking between cells
//!
//! Edges are stored by address in two adjacency maps kept next to the cell
//! storage. No cell ever holds a handle to another cell.

use ahash::{AHashMap, AHashSet};
use sheetcalc_core::Address;

/// Bidirectional dependency graph over cell addresses
///
/// `B` is a dependent of `A` exactly when `A` is a precedent of `B`, i.e.
/// when the formula in `B` reads `A`.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Cell → Cells it depends on (precedents)
    precedents: AHashMap<Address, AHashSet<Address>>,
    /// Cell → Cells that depend on it (dependents)
    dependents: AHashMap<Address, AHashSet<Address>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every outgoing edge of `cell` with edges to `precedents`.
    ///
    /// Invalid addresses are never stored as endpoints and are skipped.
    pub fn replace_precedents(&mut self, cell: Address, precedents: &[Address]) {
        self.clear_precedents(cell);

        let mut set = AHashSet::with_capacity(precedents.len());
        for &precedent in precedents.iter().filter(|a| a.is_valid()) {
            set.insert(precedent);
            self.dependents.entry(precedent).or_default().insert(cell);
        }
        if !set.is_empty() {
            self.precedents.insert(cell, set);
        }
    }

    /// Remove the outgoing edges of `cell`. Cells depending on `cell` keep
    /// their edges.
    pub fn clear_precedents(&mut self, cell: Address) {
        let Some(precedents) = self.precedents.remove(&cell) else {
            return;
        };
        for precedent in precedents {
            if let Some(deps) = self.dependents.get_mut(&precedent) {
                deps.remove(&cell);
                if deps.is_empty() {
                    self.dependents.remove(&precedent);
                }
            }
        }
    }

    /// Cells the given cell depends on
    pub fn precedents(&self, cell: Address) -> impl Iterator<Item = Address> + '_ {
        self.precedents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Cells that depend on the given cell
    pub fn dependents(&self, cell: Address) -> impl Iterator<Item = Address> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn has_dependents(&self, cell: Address) -> bool {
        self.dependents.contains_key(&cell)
    }

    pub fn has_precedents(&self, cell: Address) -> bool {
        self.precedents.contains_key(&cell)
    }

    /// Whether making `cell` depend on any of `candidates` would close a
    /// cycle.
    ///
    /// Walks every cell that transitively depends on `cell` (including
    /// `cell` itself) and reports a cycle as soon as one of them is a
    /// candidate.
    pub fn would_create_cycle(&self, cell: Address, candidates: &[Address]) -> bool {
        if candidates.is_empty() {
            return false;
        }

        let mut visited = AHashSet::new();
        let mut stack = vec![cell];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if candidates.contains(&current) {
                return true;
            }
            stack.extend(
                self.dependents(current)
                    .filter(|dependent| !visited.contains(dependent)),
            );
        }

        false
    }

    /// Number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.precedents.values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.precedents.is_empty()
    }
}
