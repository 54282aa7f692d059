//! Presentation tags derived from the grid, the selection and the simulation
//! path. Read-only: nothing here writes back into the grid.

use std::{collections::BTreeSet, fmt};

use shared::domain::{CellState, Coord};

use crate::{grid::Grid, selection::Selection, simulation::SimulationState};

/// Composed presentation of one cell: base state, then `path`, then
/// `selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTag {
    pub base: CellState,
    pub path: bool,
    pub selected: bool,
}

impl CellTag {
    pub fn glyph(&self) -> char {
        match self.base {
            CellState::Start => 'A',
            CellState::Goal => 'G',
            _ if self.path => '*',
            CellState::Empty => '.',
            CellState::Obstacle => '#',
            CellState::Shelf => 'S',
        }
    }
}

impl fmt::Display for CellTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())?;
        if self.path {
            f.write_str(" path")?;
        }
        if self.selected {
            f.write_str(" selected")?;
        }
        Ok(())
    }
}

pub struct Overlay<'a> {
    grid: &'a Grid,
    selection: Option<&'a Selection>,
    path: BTreeSet<Coord>,
}

impl<'a> Overlay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            selection: None,
            path: BTreeSet::new(),
        }
    }

    pub fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Path steps on the start or on a goal are left out.
    pub fn with_simulation(mut self, simulation: &SimulationState) -> Self {
        self.path = simulation
            .path()
            .iter()
            .copied()
            .filter(|step| simulation.start() != Some(*step) && !simulation.is_goal(*step))
            .collect();
        self
    }

    /// `None` outside the grid.
    pub fn tag(&self, coord: Coord) -> Option<CellTag> {
        let base = self.grid.get(coord)?;
        Some(CellTag {
            base,
            path: self.path.contains(&coord),
            selected: self
                .selection
                .is_some_and(|selection| selection.contains(coord)),
        })
    }

    pub fn rows(&self) -> Vec<Vec<CellTag>> {
        let size = self.grid.size();
        (0..size)
            .map(|row| {
                (0..size)
                    .filter_map(|col| self.tag(Coord::new(row, col)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/overlay_tests.rs"]
mod tests;
