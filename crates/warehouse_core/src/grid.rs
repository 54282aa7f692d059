//! Square matrix of cell states, the single source of truth for what is
//! placed on the floor.

use shared::domain::{CellState, Coord};

pub const DEFAULT_GRID_SIZE: usize = 20;
/// Largest edge length a grid is built with.
pub const MAX_GRID_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl Grid {
    /// All-empty grid with edge length `size`, clamped to
    /// `1..=MAX_GRID_SIZE`.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(1, MAX_GRID_SIZE);
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row * self.size + coord.col)
    }

    /// Cell state, or `None` outside the grid.
    pub fn get(&self, coord: Coord) -> Option<CellState> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    pub fn is(&self, coord: Coord, state: CellState) -> bool {
        self.get(coord) == Some(state)
    }

    /// Writes `state` and returns whether the cell changed. Out-of-range
    /// writes are ignored.
    pub(crate) fn set(&mut self, coord: Coord, state: CellState) -> bool {
        let Some(idx) = self.index(coord) else {
            return false;
        };
        if self.cells[idx] == state {
            return false;
        }
        self.cells[idx] = state;
        true
    }

    /// Writes `to` only when the cell currently holds `from`.
    pub(crate) fn transition(&mut self, coord: Coord, from: CellState, to: CellState) -> bool {
        if self.is(coord, from) {
            self.set(coord, to)
        } else {
            false
        }
    }

    /// Row-major walk over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellState)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, state)| (Coord::new(idx / size, idx % size), *state))
    }

    pub fn coords_in(&self, state: CellState) -> Vec<Coord> {
        self.iter()
            .filter(|(_, cell)| *cell == state)
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Turns every start and goal marker back into an empty cell.
    pub(crate) fn strip_markers(&mut self) -> usize {
        let mut stripped = 0;
        for cell in &mut self.cells {
            if cell.is_marker() {
                *cell = CellState::Empty;
                stripped += 1;
            }
        }
        stripped
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks(self.size)
    }
}

#[cfg(test)]
#[path = "tests/grid_tests.rs"]
mod tests;
