//! Saved copies of the grid for verbatim restoration on cancel or exit.

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    PreSimulation,
    PreShelfForm,
}

/// Immutable copy of the grid taken at a mode boundary. Holds its own cells,
/// never a view of the live grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    kind: SnapshotKind,
    grid: Grid,
}

impl Snapshot {
    pub fn take(kind: SnapshotKind, grid: &Grid) -> Self {
        Self {
            kind,
            grid: grid.clone(),
        }
    }

    pub fn kind(&self) -> SnapshotKind {
        self.kind
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the snapshot, handing back the saved grid.
    pub fn restore(self) -> Grid {
        self.grid
    }
}

/// At most one live snapshot per kind.
#[derive(Debug, Clone, Default)]
pub struct Snapshots {
    pre_simulation: Option<Snapshot>,
    pre_shelf_form: Option<Snapshot>,
}

impl Snapshots {
    fn slot(&mut self, kind: SnapshotKind) -> &mut Option<Snapshot> {
        match kind {
            SnapshotKind::PreSimulation => &mut self.pre_simulation,
            SnapshotKind::PreShelfForm => &mut self.pre_shelf_form,
        }
    }

    /// Saves `grid` under `kind`, replacing any earlier snapshot of that kind.
    pub fn take(&mut self, kind: SnapshotKind, grid: &Grid) {
        *self.slot(kind) = Some(Snapshot::take(kind, grid));
    }

    /// Removes and returns the saved grid of `kind`, if any.
    pub fn restore(&mut self, kind: SnapshotKind) -> Option<Grid> {
        self.slot(kind).take().map(Snapshot::restore)
    }

    pub fn invalidate(&mut self, kind: SnapshotKind) {
        *self.slot(kind) = None;
    }

    pub fn invalidate_all(&mut self) {
        self.pre_simulation = None;
        self.pre_shelf_form = None;
    }

    pub fn get(&self, kind: SnapshotKind) -> Option<&Snapshot> {
        match kind {
            SnapshotKind::PreSimulation => self.pre_simulation.as_ref(),
            SnapshotKind::PreShelfForm => self.pre_shelf_form.as_ref(),
        }
    }
}
