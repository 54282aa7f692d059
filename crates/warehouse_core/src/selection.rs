use std::collections::BTreeSet;

use shared::domain::Coord;

/// Cells picked for the next editing action. Ordered so that notifications
/// and staged shelf placements come out row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: BTreeSet<Coord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coord` if absent, removes it otherwise. Returns whether the
    /// coordinate is selected afterwards.
    pub fn toggle(&mut self, coord: Coord) -> bool {
        if self.cells.remove(&coord) {
            false
        } else {
            self.cells.insert(coord);
            true
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The selected cell when exactly one is selected.
    pub fn single(&self) -> Option<Coord> {
        if self.cells.len() == 1 {
            self.cells.iter().next().copied()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Coord> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
