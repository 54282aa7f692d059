use super::*;
use crate::{
    selection::Selection,
    simulation::{GoalToggle, SimulationState},
    snapshot::{SnapshotKind, Snapshots},
    ValidationError,
};

fn c(row: usize, col: usize) -> Coord {
    Coord::new(row, col)
}

#[test]
fn new_grid_is_empty_and_square() {
    let grid = Grid::new(4);
    assert_eq!(grid.size(), 4);
    assert_eq!(grid.count(CellState::Empty), 16);
    assert_eq!(grid.rows().count(), 4);
    assert!(grid.rows().all(|row| row.len() == 4));
    assert_eq!(Grid::default().size(), DEFAULT_GRID_SIZE);
}

#[test]
fn zero_size_is_bumped_to_one() {
    assert_eq!(Grid::new(0).size(), 1);
}

#[test]
fn out_of_range_access_is_refused() {
    let mut grid = Grid::new(3);
    assert_eq!(grid.get(c(3, 0)), None);
    assert!(!grid.set(c(0, 3), CellState::Obstacle));
    assert_eq!(grid.count(CellState::Obstacle), 0);
}

#[test]
fn transition_only_applies_from_expected_state() {
    let mut grid = Grid::new(3);
    assert!(grid.transition(c(1, 1), CellState::Empty, CellState::Obstacle));
    assert!(!grid.transition(c(1, 1), CellState::Shelf, CellState::Empty));
    assert!(grid.is(c(1, 1), CellState::Obstacle));
}

#[test]
fn iter_walks_row_major() {
    let mut grid = Grid::new(2);
    grid.set(c(1, 0), CellState::Shelf);
    let cells: Vec<_> = grid.iter().collect();
    assert_eq!(cells[2], (c(1, 0), CellState::Shelf));
    assert_eq!(grid.coords_in(CellState::Shelf), vec![c(1, 0)]);
}

#[test]
fn strip_markers_leaves_obstacles_and_shelves() {
    let mut grid = Grid::new(3);
    grid.set(c(0, 0), CellState::Start);
    grid.set(c(0, 1), CellState::Goal);
    grid.set(c(1, 1), CellState::Obstacle);
    grid.set(c(2, 2), CellState::Shelf);

    assert_eq!(grid.strip_markers(), 2);
    assert_eq!(grid.count(CellState::Empty), 7);
    assert!(grid.is(c(1, 1), CellState::Obstacle));
    assert!(grid.is(c(2, 2), CellState::Shelf));
}

#[test]
fn toggling_a_cell_twice_restores_selection() {
    let mut selection = Selection::new();
    selection.toggle(c(0, 1));
    let before = selection.clone();

    assert!(selection.toggle(c(2, 2)));
    assert!(!selection.toggle(c(2, 2)));
    assert_eq!(selection, before);
}

#[test]
fn selection_is_row_major() {
    let mut selection = Selection::new();
    selection.toggle(c(3, 0));
    selection.toggle(c(0, 5));
    selection.toggle(c(0, 2));
    assert_eq!(selection.to_vec(), vec![c(0, 2), c(0, 5), c(3, 0)]);
    assert_eq!(selection.single(), None);
}

#[test]
fn snapshot_round_trip_is_identical() {
    let mut grid = Grid::new(5);
    grid.set(c(0, 4), CellState::Obstacle);
    grid.set(c(2, 2), CellState::Shelf);
    let mut snapshots = Snapshots::default();

    snapshots.take(SnapshotKind::PreShelfForm, &grid);
    let restored = snapshots
        .restore(SnapshotKind::PreShelfForm)
        .expect("snapshot was taken");

    assert_eq!(restored, grid);
    assert!(snapshots.get(SnapshotKind::PreShelfForm).is_none());
}

#[test]
fn snapshot_does_not_alias_live_grid() {
    let mut grid = Grid::new(3);
    let mut snapshots = Snapshots::default();
    snapshots.take(SnapshotKind::PreSimulation, &grid);

    grid.set(c(1, 1), CellState::Obstacle);

    let saved = snapshots
        .get(SnapshotKind::PreSimulation)
        .expect("snapshot present");
    assert_eq!(saved.kind(), SnapshotKind::PreSimulation);
    assert!(saved.grid().is(c(1, 1), CellState::Empty));
}

#[test]
fn snapshot_kinds_are_independent() {
    let grid = Grid::new(2);
    let mut snapshots = Snapshots::default();
    snapshots.take(SnapshotKind::PreSimulation, &grid);
    snapshots.take(SnapshotKind::PreShelfForm, &grid);

    snapshots.invalidate(SnapshotKind::PreShelfForm);
    assert!(snapshots.get(SnapshotKind::PreSimulation).is_some());
    assert!(snapshots.restore(SnapshotKind::PreShelfForm).is_none());

    snapshots.invalidate_all();
    assert!(snapshots.get(SnapshotKind::PreSimulation).is_none());
}

#[test]
fn second_start_is_a_no_op() {
    let mut grid = Grid::new(4);
    let mut simulation = SimulationState::default();

    assert_eq!(simulation.place_start(&mut grid, c(0, 0)), Ok(true));
    assert_eq!(simulation.place_start(&mut grid, c(1, 1)), Ok(false));
    assert_eq!(grid.count(CellState::Start), 1);
    assert_eq!(simulation.start(), Some(c(0, 0)));
}

#[test]
fn markers_need_an_empty_cell() {
    let mut grid = Grid::new(4);
    grid.set(c(2, 2), CellState::Obstacle);
    let mut simulation = SimulationState::default();

    assert_eq!(
        simulation.place_start(&mut grid, c(2, 2)),
        Err(ValidationError::OccupiedCell {
            coord: c(2, 2),
            state: CellState::Obstacle
        })
    );
    assert_eq!(
        simulation.toggle_goal(&mut grid, c(9, 9)),
        Err(ValidationError::OutOfBounds(c(9, 9)))
    );
    assert!(simulation.goals().is_empty());
}

#[test]
fn goal_toggle_keeps_list_and_grid_in_step() {
    let mut grid = Grid::new(6);
    let mut simulation = SimulationState::default();

    assert_eq!(simulation.toggle_goal(&mut grid, c(5, 5)), Ok(GoalToggle::Added));
    assert_eq!(simulation.toggle_goal(&mut grid, c(1, 4)), Ok(GoalToggle::Added));
    assert_eq!(grid.coords_in(CellState::Goal), vec![c(1, 4), c(5, 5)]);

    assert_eq!(simulation.toggle_goal(&mut grid, c(5, 5)), Ok(GoalToggle::Removed));
    assert_eq!(simulation.goals(), &[c(1, 4)]);
    assert!(grid.is(c(5, 5), CellState::Empty));
}

#[test]
fn path_through_obstacle_is_rejected() {
    let mut grid = Grid::new(3);
    grid.set(c(0, 1), CellState::Obstacle);
    let mut simulation = SimulationState::default();

    let rejected = simulation.show_path(&grid, vec![c(0, 0), c(0, 1), c(0, 2)]);
    assert_eq!(rejected, Err(c(0, 1)));
    assert!(simulation.path().is_empty());
    assert!(!simulation.is_running());

    simulation
        .show_path(&grid, vec![c(0, 0), c(1, 0)])
        .expect("clear path accepted");
    assert!(simulation.is_running());
}

#[test]
fn clear_resets_markers_only() {
    let mut grid = Grid::new(4);
    grid.set(c(3, 3), CellState::Shelf);
    let mut simulation = SimulationState::default();
    simulation
        .place_start(&mut grid, c(0, 0))
        .expect("start placed");
    simulation
        .toggle_goal(&mut grid, c(2, 0))
        .expect("goal placed");

    simulation.clear(&mut grid);

    assert_eq!(simulation, SimulationState::default());
    assert_eq!(grid.count(CellState::Start) + grid.count(CellState::Goal), 0);
    assert!(grid.is(c(3, 3), CellState::Shelf));
}
