//! Session controller: owns the mode, mediates every transition, and decides
//! which service calls go out.
//!
//! Transitions are synchronous. Each returns the [`ServiceCommand`]s the
//! caller must dispatch; their results come back through
//! [`Session::complete`], the only place remote answers touch state.

use std::collections::BTreeSet;

use client_core::FloorLayout;
use shared::{
    domain::{CellState, Coord, ShelfAttributes},
    protocol::{ShelfLookupEntry, ShelfPlacement},
};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{CallKind, Completion, Reply, ServiceCommand},
    error::{SessionError, ValidationError},
    grid::{Grid, MAX_GRID_SIZE},
    inflight::InFlight,
    log::MessageLog,
    overlay::Overlay,
    selection::Selection,
    shelf_form::{FormPurpose, ShelfFields, ShelfForm},
    simulation::{GoalToggle, SimulationState},
    snapshot::{Snapshot, SnapshotKind, Snapshots},
};

pub type Commands = Vec<ServiceCommand>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    AddShelf,
    RemoveShelf,
    ModifyShelf,
    AddObstacle,
    RemoveObstacle,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::AddShelf => "add shelf",
            Self::RemoveShelf => "remove shelf",
            Self::ModifyShelf => "modify shelf",
            Self::AddObstacle => "add obstacle",
            Self::RemoveObstacle => "remove obstacle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editing {
    selection: Selection,
    shelf_form: Option<ShelfForm>,
}

impl Editing {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn shelf_form(&self) -> Option<&ShelfForm> {
        self.shelf_form.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Disconnected,
    Editing(Editing),
    Simulating(SimulationState),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Editing(_) => "editing",
            Self::Simulating(_) => "simulating",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Editing(Editing {
                shelf_form: Some(_),
                ..
            }) => "the shelf form is open",
            other => other.name(),
        }
    }
}

pub struct Session {
    grid: Grid,
    mode: Mode,
    snapshots: Snapshots,
    inflight: InFlight,
    superseded: BTreeSet<CallKind>,
    log: MessageLog,
}

impl Session {
    pub fn new(grid_size: usize) -> Self {
        Self::with_log(grid_size, MessageLog::default())
    }

    pub fn with_log(grid_size: usize, log: MessageLog) -> Self {
        Self {
            grid: Grid::new(grid_size),
            mode: Mode::Disconnected,
            snapshots: Snapshots::default(),
            inflight: InFlight::default(),
            superseded: BTreeSet::new(),
            log,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn inflight(&self) -> &InFlight {
        &self.inflight
    }

    pub fn snapshot(&self, kind: SnapshotKind) -> Option<&Snapshot> {
        self.snapshots.get(kind)
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self.mode, Mode::Disconnected)
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.mode {
            Mode::Editing(editing) => Some(&editing.selection),
            _ => None,
        }
    }

    pub fn shelf_form(&self) -> Option<&ShelfForm> {
        match &self.mode {
            Mode::Editing(editing) => editing.shelf_form.as_ref(),
            _ => None,
        }
    }

    pub fn simulation(&self) -> Option<&SimulationState> {
        match &self.mode {
            Mode::Simulating(simulation) => Some(simulation),
            _ => None,
        }
    }

    /// Clicks are refused while the shelf form is open, while a response the
    /// grid depends on is outstanding, and while a computed path is shown.
    pub fn grid_disabled(&self) -> bool {
        if self.inflight.blocks_grid() {
            return true;
        }
        match &self.mode {
            Mode::Editing(editing) => editing.shelf_form.is_some(),
            Mode::Simulating(simulation) => simulation.is_running(),
            Mode::Disconnected => false,
        }
    }

    pub fn overlay(&self) -> Overlay<'_> {
        match &self.mode {
            Mode::Editing(editing) => Overlay::new(&self.grid).with_selection(&editing.selection),
            Mode::Simulating(simulation) => Overlay::new(&self.grid).with_simulation(simulation),
            Mode::Disconnected => Overlay::new(&self.grid),
        }
    }

    fn issue(&mut self, command: ServiceCommand) -> Result<ServiceCommand, SessionError> {
        self.inflight.begin(command.kind())?;
        debug!(command = command.name(), "queued service command");
        Ok(command)
    }

    fn clear_selection(&mut self) {
        if let Mode::Editing(editing) = &mut self.mode {
            editing.selection.clear();
        }
    }

    /// Editing mode with the form closed and nothing blocking the grid.
    fn ensure_editing_idle(&self, action: &'static str) -> Result<(), SessionError> {
        match &self.mode {
            Mode::Editing(Editing {
                shelf_form: None, ..
            }) => {}
            other => {
                return Err(SessionError::InvalidMode {
                    action,
                    mode: other.describe(),
                })
            }
        }
        if self.grid_disabled() {
            return Err(SessionError::GridDisabled { action });
        }
        Ok(())
    }

    fn ensure_simulating(&self, action: &'static str) -> Result<(), SessionError> {
        match &self.mode {
            Mode::Simulating(_) => Ok(()),
            other => Err(SessionError::InvalidMode {
                action,
                mode: other.describe(),
            }),
        }
    }

    /// Replaces the grid with an empty one of `size` and clears selection,
    /// start, goals and path. Snapshots of the old grid are dropped and an
    /// open shelf form is closed.
    pub fn resize(&mut self, size: usize) {
        if size > MAX_GRID_SIZE {
            warn!(requested = size, max = MAX_GRID_SIZE, "grid size clamped");
            self.log
                .warn(format!("Grid size {size} is too large; using {MAX_GRID_SIZE}."));
        }
        self.grid = Grid::new(size);
        self.snapshots.invalidate_all();
        self.supersede_pending();
        match &mut self.mode {
            Mode::Editing(editing) => *editing = Editing::default(),
            Mode::Simulating(simulation) => *simulation = SimulationState::default(),
            Mode::Disconnected => {}
        }
        info!(size = self.grid.size(), "grid resized");
    }

    /// Returns whether the selection changed; a no-op outside editing mode,
    /// outside the grid, or while the grid is disabled.
    pub fn toggle_select(&mut self, coord: Coord) -> bool {
        if self.grid_disabled() || !self.grid.contains(coord) {
            return false;
        }
        let Mode::Editing(editing) = &mut self.mode else {
            return false;
        };
        editing.selection.toggle(coord);
        true
    }

    /// Routes a grid click: select while editing, otherwise start first and
    /// goals after.
    pub fn click(&mut self, coord: Coord) -> Result<(), SessionError> {
        match &self.mode {
            Mode::Simulating(simulation) if simulation.start().is_none() => {
                self.place_start(coord).map(drop)
            }
            Mode::Simulating(_) => self.toggle_goal(coord).map(drop),
            _ => {
                self.toggle_select(coord);
                Ok(())
            }
        }
    }

    /// `Ok(false)` when a start already exists.
    pub fn place_start(&mut self, coord: Coord) -> Result<bool, SessionError> {
        const ACTION: &str = "place the start";
        self.ensure_simulating(ACTION)?;
        if self.grid_disabled() {
            return Err(SessionError::GridDisabled { action: ACTION });
        }
        let Mode::Simulating(simulation) = &mut self.mode else {
            return Ok(false);
        };
        let placed = simulation.place_start(&mut self.grid, coord)?;
        if placed {
            info!(row = coord.row, col = coord.col, "start placed");
        }
        Ok(placed)
    }

    pub fn toggle_goal(&mut self, coord: Coord) -> Result<GoalToggle, SessionError> {
        const ACTION: &str = "toggle a goal";
        self.ensure_simulating(ACTION)?;
        if self.grid_disabled() {
            return Err(SessionError::GridDisabled { action: ACTION });
        }
        let mode = self.mode.describe();
        let Mode::Simulating(simulation) = &mut self.mode else {
            return Err(SessionError::InvalidMode {
                action: ACTION,
                mode,
            });
        };
        let toggle = simulation.toggle_goal(&mut self.grid, coord)?;
        info!(row = coord.row, col = coord.col, ?toggle, "goal toggled");
        Ok(toggle)
    }

    /// Applies an editing action to every selected cell. The selection is
    /// cleared afterwards except for `AddShelf`, which stages the shelf form.
    pub fn apply_action(&mut self, action: ActionKind) -> Result<Commands, SessionError> {
        self.ensure_editing_idle(action.label())?;
        let selected = self.selection().map(Selection::to_vec).unwrap_or_default();
        if selected.is_empty() {
            return Err(ValidationError::NoSelection.into());
        }

        let mut commands = Commands::new();
        match action {
            ActionKind::AddShelf => {
                self.open_shelf_form()?;
                return Ok(commands);
            }
            ActionKind::RemoveShelf => {
                let removed = self.transition_all(&selected, CellState::Shelf, CellState::Empty);
                if !removed.is_empty() {
                    commands.push(self.issue(ServiceCommand::RemoveShelves(removed))?);
                }
            }
            ActionKind::ModifyShelf => {
                let Some(coord) = self.selection().and_then(Selection::single) else {
                    return Err(ValidationError::ModifyNeedsSingleCell {
                        selected: selected.len(),
                    }
                    .into());
                };
                if !self.grid.is(coord, CellState::Shelf) {
                    return Err(ValidationError::NotAShelf(coord).into());
                }
                commands.push(self.issue(ServiceCommand::FetchShelfDetails(coord))?);
            }
            ActionKind::AddObstacle => {
                let added = self.transition_all(&selected, CellState::Empty, CellState::Obstacle);
                if !added.is_empty() {
                    commands.push(self.issue(ServiceCommand::AddObstacles(added))?);
                }
            }
            ActionKind::RemoveObstacle => {
                let removed =
                    self.transition_all(&selected, CellState::Obstacle, CellState::Empty);
                for coord in removed {
                    commands.push(self.issue(ServiceCommand::RemoveObstacle(coord))?);
                }
            }
        }

        self.clear_selection();
        self.log
            .info(format!("{} applied to selected cells.", action.label()));
        info!(action = action.label(), cells = selected.len(), "action applied");
        Ok(commands)
    }

    fn transition_all(&mut self, cells: &[Coord], from: CellState, to: CellState) -> Vec<Coord> {
        cells
            .iter()
            .copied()
            .filter(|coord| self.grid.transition(*coord, from, to))
            .collect()
    }

    /// Stages the shelf form for the selected cells that are empty or already
    /// shelves. The grid is saved first so that cancelling restores it; the
    /// targets are then shown as provisional shelves.
    pub fn open_shelf_form(&mut self) -> Result<(), SessionError> {
        self.ensure_editing_idle("open the shelf form")?;
        let selected = self.selection().map(Selection::to_vec).unwrap_or_default();
        if selected.is_empty() {
            return Err(ValidationError::NoSelection.into());
        }
        let targets: Vec<Coord> = selected
            .into_iter()
            .filter(|coord| {
                matches!(
                    self.grid.get(*coord),
                    Some(CellState::Empty | CellState::Shelf)
                )
            })
            .collect();
        if targets.is_empty() {
            return Err(ValidationError::NoShelfTargets.into());
        }

        self.snapshots.take(SnapshotKind::PreShelfForm, &self.grid);
        for coord in &targets {
            self.grid.transition(*coord, CellState::Empty, CellState::Shelf);
        }
        info!(targets = targets.len(), "shelf form opened");
        self.stage_form(ShelfForm::new(
            FormPurpose::Add,
            targets,
            ShelfFields::default(),
        ));
        Ok(())
    }

    fn stage_form(&mut self, form: ShelfForm) {
        if let Mode::Editing(editing) = &mut self.mode {
            editing.shelf_form = Some(form);
        }
    }

    /// Writes `shelf` into every staged cell and forwards the attributes to
    /// the service. The grid stays disabled until the service answers.
    pub fn commit_shelf_form(&mut self, fields: &ShelfFields) -> Result<Commands, SessionError> {
        let targets = match self.shelf_form() {
            Some(form) => form.targets().to_vec(),
            None => {
                return Err(SessionError::InvalidMode {
                    action: "submit the shelf form",
                    mode: "no shelf form is open",
                })
            }
        };
        let attributes = fields.to_attributes()?;
        self.inflight.check(CallKind::ShelfUpdate)?;

        for coord in &targets {
            self.grid.set(*coord, CellState::Shelf);
        }
        let placements = targets
            .iter()
            .map(|coord| ShelfPlacement::new(*coord, attributes.clone()))
            .collect();
        let command = self.issue(ServiceCommand::AddShelves(placements))?;

        if let Mode::Editing(editing) = &mut self.mode {
            *editing = Editing::default();
        }
        self.snapshots.invalidate(SnapshotKind::PreShelfForm);
        self.log.info(format!(
            "Shelf details saved for {} cell(s): {attributes}.",
            targets.len()
        ));
        info!(cells = targets.len(), "shelf form committed");
        Ok(vec![command])
    }

    /// Restores the grid saved when the form opened and clears the selection.
    pub fn cancel_shelf_form(&mut self) -> Result<(), SessionError> {
        if self.shelf_form().is_none() {
            return Err(SessionError::InvalidMode {
                action: "cancel the shelf form",
                mode: "no shelf form is open",
            });
        }
        if let Some(grid) = self.snapshots.restore(SnapshotKind::PreShelfForm) {
            self.grid = grid;
        }
        if let Mode::Editing(editing) = &mut self.mode {
            *editing = Editing::default();
        }
        self.log.info("Shelf form cancelled.");
        info!("shelf form cancelled");
        Ok(())
    }

    pub fn enter_simulation(&mut self) -> Result<(), SessionError> {
        const ACTION: &str = "enter simulation";
        if !matches!(self.mode, Mode::Editing(_)) {
            return Err(SessionError::InvalidMode {
                action: ACTION,
                mode: self.mode.describe(),
            });
        }
        if self.inflight.blocks_grid() {
            return Err(SessionError::GridDisabled { action: ACTION });
        }
        if self.shelf_form().is_some() {
            self.cancel_shelf_form()?;
        }

        self.snapshots.take(SnapshotKind::PreSimulation, &self.grid);
        self.mode = Mode::Simulating(SimulationState::default());
        self.log
            .info("Simulation mode: click a cell for the start, then the goals.");
        info!("entered simulation mode");
        Ok(())
    }

    /// Resets start, goals, path and selection without touching obstacles
    /// or shelves.
    pub fn clear_transient_simulation_state(&mut self) {
        match &mut self.mode {
            Mode::Simulating(simulation) => simulation.clear(&mut self.grid),
            Mode::Editing(editing) => editing.selection.clear(),
            Mode::Disconnected => {}
        }
    }

    /// Restores the grid saved on entering simulation, with any start or goal
    /// markers stripped from it, and returns to editing.
    pub fn exit_simulation(&mut self) -> Result<Commands, SessionError> {
        self.ensure_simulating("exit the simulation")?;
        self.clear_transient_simulation_state();

        let mut grid = self
            .snapshots
            .restore(SnapshotKind::PreSimulation)
            .unwrap_or_else(|| self.grid.clone());
        let stripped = grid.strip_markers();
        if stripped > 0 {
            warn!(stripped, "removed stale start/goal markers from restored grid");
        }
        self.grid = grid;
        self.mode = Mode::Editing(Editing::default());

        let command = self.issue(ServiceCommand::ExitSimulation)?;
        self.log.info("Exited the simulation");
        info!("left simulation mode");
        Ok(vec![command])
    }

    pub fn start_simulation_run(&mut self) -> Result<Commands, SessionError> {
        self.ensure_simulating("run the simulation")?;
        let Some(simulation) = self.simulation() else {
            return Ok(Commands::new());
        };
        if simulation.is_running() {
            warn!("simulation run rejected: a path is already shown");
            return Err(SessionError::ConcurrentOperationRejected(
                CallKind::SimulationRun,
            ));
        }
        let start = simulation.start().ok_or(ValidationError::MissingStart)?;
        if simulation.goals().is_empty() {
            return Err(ValidationError::MissingGoal.into());
        }
        let goals = simulation.goals().to_vec();

        let command = self.issue(ServiceCommand::RunSimulation { start, goals })?;
        self.log.info("Running simulation...");
        Ok(vec![command])
    }

    /// Fetches the layout from the service. Refused once connected.
    pub fn connect(&mut self) -> Result<Commands, SessionError> {
        if self.is_connected() {
            return Err(SessionError::AlreadyConnected);
        }
        let command = self.issue(ServiceCommand::FetchLayout)?;
        info!("connecting to inventory service");
        Ok(vec![command])
    }

    /// Wipes the floor locally and on the service. Declining is a no-op.
    pub fn restart_map(&mut self, confirmation: Confirmation) -> Result<Commands, SessionError> {
        if confirmation == Confirmation::Declined {
            return Ok(Commands::new());
        }
        self.inflight.check(CallKind::MapReset)?;

        self.grid = Grid::new(self.grid.size());
        self.snapshots.invalidate_all();
        self.supersede_pending();
        if self.is_connected() {
            self.mode = Mode::Editing(Editing::default());
        }
        let command = self.issue(ServiceCommand::ResetMap)?;

        self.log.clear();
        self.log.info("Map has been restarted.");
        info!("map restarted");
        Ok(vec![command])
    }

    /// Asks for the stock of the selected shelves, or of every shelf when
    /// nothing is selected. The answer lands in the message log.
    pub fn query_inventory(&mut self) -> Result<Commands, SessionError> {
        self.ensure_editing_idle("query the inventory")?;
        let selected = self.selection().map(Selection::to_vec).unwrap_or_default();
        let command = self.issue(ServiceCommand::QueryInventory(selected))?;
        Ok(vec![command])
    }

    /// Feeds the result of a dispatched command back into the session.
    /// Failures are logged and returned; local edits already made are kept.
    pub fn complete(&mut self, completion: Completion) -> Result<(), SessionError> {
        let Completion { kind, outcome } = completion;
        if !self.inflight.finish(kind) {
            debug!(call = kind.label(), "completion without a pending call");
        }
        if self.superseded.remove(&kind) {
            debug!(call = kind.label(), "result for a reset grid ignored");
            self.log.warn(format!(
                "Discarded the {} result requested before the grid was reset.",
                kind.label()
            ));
            return Ok(());
        }

        let reply = match outcome {
            Ok(reply) => reply,
            Err(message) => {
                let err = SessionError::remote(kind, message);
                error!(call = kind.label(), "service call failed: {err}");
                self.log.error(err.to_string());
                return Err(err);
            }
        };

        match reply {
            Reply::Ack => {
                debug!(call = kind.label(), "service acknowledged");
                Ok(())
            }
            Reply::Layout(layout) => {
                self.apply_layout(layout);
                Ok(())
            }
            Reply::ShelfDetails { coord, attributes } => self.stage_modify_form(coord, attributes),
            Reply::Path(path) => self.show_path(path),
            Reply::Inventory(entries) => {
                self.log_inventory(entries);
                Ok(())
            }
        }
    }

    /// Replies to these calls were computed against the grid being replaced.
    fn supersede_pending(&mut self) {
        for kind in [CallKind::SimulationRun, CallKind::ShelfLookup] {
            if self.inflight.is_pending(kind) {
                self.superseded.insert(kind);
            }
        }
    }

    fn apply_layout(&mut self, layout: FloorLayout) {
        if self.is_connected() {
            debug!("ignoring layout for an already connected session");
            return;
        }

        let mut grid = Grid::new(self.grid.size());
        let shelves = layout.shelves.iter().map(|shelf| (shelf.coord(), CellState::Shelf));
        let obstacles = layout
            .obstacles
            .iter()
            .map(|coord| (*coord, CellState::Obstacle));
        for (coord, state) in obstacles.chain(shelves) {
            if !grid.set(coord, state) && !grid.contains(coord) {
                debug!(row = coord.row, col = coord.col, "layout entry outside grid skipped");
            }
        }

        self.grid = grid;
        self.snapshots.invalidate_all();
        self.mode = Mode::Editing(Editing::default());
        self.log.info("Connected to backend successfully.");
        info!(
            obstacles = self.grid.count(CellState::Obstacle),
            shelves = self.grid.count(CellState::Shelf),
            "connected"
        );
    }

    fn stage_modify_form(
        &mut self,
        coord: Coord,
        attributes: Option<ShelfAttributes>,
    ) -> Result<(), SessionError> {
        let still_editing = matches!(
            self.mode,
            Mode::Editing(Editing {
                shelf_form: None,
                ..
            })
        );
        if !still_editing || !self.grid.is(coord, CellState::Shelf) {
            debug!(row = coord.row, col = coord.col, "stale shelf details ignored");
            return Ok(());
        }

        let Some(attributes) = attributes else {
            self.log.error("Error: Please choose a shelf, not an obstacle");
            return Err(ValidationError::NotAShelf(coord).into());
        };

        self.snapshots.take(SnapshotKind::PreShelfForm, &self.grid);
        self.stage_form(ShelfForm::new(
            FormPurpose::Modify,
            vec![coord],
            ShelfFields::from_attributes(&attributes),
        ));
        self.log
            .info(format!("Editing shelf at {coord}: {attributes}."));
        info!(row = coord.row, col = coord.col, "shelf form opened for modify");
        Ok(())
    }

    fn show_path(&mut self, path: Vec<Coord>) -> Result<(), SessionError> {
        let Mode::Simulating(simulation) = &mut self.mode else {
            debug!("path arrived after leaving simulation; ignored");
            return Ok(());
        };
        if simulation.is_running() {
            debug!("path arrived while another is shown; ignored");
            return Ok(());
        }

        let steps = format_path(&path);
        match simulation.show_path(&self.grid, path) {
            Ok(()) => {
                self.log
                    .info(format!("Simulation completed. Path: {steps}"));
                info!("simulation path received");
                Ok(())
            }
            Err(blocked) => {
                let err = SessionError::PathRejected(blocked);
                error!("{err}");
                self.log.error(err.to_string());
                Err(err)
            }
        }
    }

    fn log_inventory(&mut self, entries: Option<Vec<ShelfLookupEntry>>) {
        match entries {
            None => self
                .log
                .error("Error: the selection contains cells that are not shelves."),
            Some(entries) if entries.is_empty() => self.log.info("No shelves are stocked."),
            Some(entries) => {
                for entry in entries {
                    let line = match entry.position {
                        Some(position) => {
                            format!("{}: {}", Coord::from_pair(position), entry.attributes)
                        }
                        None => entry.attributes.to_string(),
                    };
                    self.log.info(line);
                }
            }
        }
    }
}

fn format_path(path: &[Coord]) -> String {
    let steps: Vec<String> = path
        .iter()
        .map(|coord| format!("[{},{}]", coord.row, coord.col))
        .collect();
    format!("[{}]", steps.join(","))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
