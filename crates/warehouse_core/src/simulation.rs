//! Start, goals and path of the simulation mode.

use shared::domain::{CellState, Coord};

use crate::{error::ValidationError, grid::Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalToggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationState {
    start: Option<Coord>,
    goals: Vec<Coord>,
    path: Vec<Coord>,
    running: bool,
}

impl SimulationState {
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn goals(&self) -> &[Coord] {
        &self.goals
    }

    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// A path has been received and is being shown.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_goal(&self, coord: Coord) -> bool {
        self.goals.contains(&coord)
    }

    /// Marks `coord` as the start. Returns `Ok(false)` without touching the
    /// grid when a start is already set.
    pub(crate) fn place_start(
        &mut self,
        grid: &mut Grid,
        coord: Coord,
    ) -> Result<bool, ValidationError> {
        if self.start.is_some() {
            return Ok(false);
        }
        require_empty(grid, coord)?;
        grid.set(coord, CellState::Start);
        self.start = Some(coord);
        Ok(true)
    }

    /// Adds a goal on an empty cell, or removes an existing goal.
    pub(crate) fn toggle_goal(
        &mut self,
        grid: &mut Grid,
        coord: Coord,
    ) -> Result<GoalToggle, ValidationError> {
        if let Some(idx) = self.goals.iter().position(|goal| *goal == coord) {
            self.goals.remove(idx);
            grid.transition(coord, CellState::Goal, CellState::Empty);
            return Ok(GoalToggle::Removed);
        }
        require_empty(grid, coord)?;
        grid.set(coord, CellState::Goal);
        self.goals.push(coord);
        Ok(GoalToggle::Added)
    }

    /// Accepts a path only if every step is inside the grid and not an
    /// obstacle. On rejection nothing changes and the offending step is
    /// returned.
    pub(crate) fn show_path(&mut self, grid: &Grid, path: Vec<Coord>) -> Result<(), Coord> {
        if let Some(blocked) = path
            .iter()
            .copied()
            .find(|step| matches!(grid.get(*step), None | Some(CellState::Obstacle)))
        {
            return Err(blocked);
        }
        self.path = path;
        self.running = true;
        Ok(())
    }

    /// Drops start, goals and path, clearing their markers from `grid`.
    /// Obstacles and shelves are left alone.
    pub(crate) fn clear(&mut self, grid: &mut Grid) {
        if let Some(start) = self.start.take() {
            grid.transition(start, CellState::Start, CellState::Empty);
        }
        for goal in self.goals.drain(..) {
            grid.transition(goal, CellState::Goal, CellState::Empty);
        }
        self.path.clear();
        self.running = false;
    }
}

fn require_empty(grid: &Grid, coord: Coord) -> Result<(), ValidationError> {
    match grid.get(coord) {
        None => Err(ValidationError::OutOfBounds(coord)),
        Some(CellState::Empty) => Ok(()),
        Some(state) => Err(ValidationError::OccupiedCell { coord, state }),
    }
}
