//! Calls the session asks the caller to run against the inventory service,
//! and the completions that come back.

use client_core::FloorLayout;
use shared::{
    domain::{Coord, ShelfAttributes},
    protocol::{ShelfLookupEntry, ShelfPlacement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallKind {
    Connect,
    ShelfUpdate,
    ShelfRemoval,
    ShelfLookup,
    ObstacleUpdate,
    SimulationRun,
    SimulationExit,
    MapReset,
    InventoryQuery,
}

impl CallKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ShelfUpdate => "shelf update",
            Self::ShelfRemoval => "shelf removal",
            Self::ShelfLookup => "shelf lookup",
            Self::ObstacleUpdate => "obstacle update",
            Self::SimulationRun => "simulation run",
            Self::SimulationExit => "simulation exit",
            Self::MapReset => "map reset",
            Self::InventoryQuery => "inventory query",
        }
    }

    /// Guarded kinds allow one call in flight; the rest are notifications.
    pub fn is_single_flight(self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::ShelfUpdate
                | Self::ShelfLookup
                | Self::SimulationRun
                | Self::MapReset
                | Self::InventoryQuery
        )
    }

    /// Kinds whose pending response keeps the grid from taking clicks.
    pub fn blocks_grid(self) -> bool {
        matches!(
            self,
            Self::Connect | Self::ShelfUpdate | Self::ShelfLookup | Self::SimulationRun
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommand {
    FetchLayout,
    AddShelves(Vec<ShelfPlacement>),
    RemoveShelves(Vec<Coord>),
    FetchShelfDetails(Coord),
    AddObstacles(Vec<Coord>),
    RemoveObstacle(Coord),
    /// Report start and goals, then ask for the path.
    RunSimulation { start: Coord, goals: Vec<Coord> },
    ExitSimulation,
    ResetMap,
    QueryInventory(Vec<Coord>),
}

impl ServiceCommand {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::FetchLayout => CallKind::Connect,
            Self::AddShelves(_) => CallKind::ShelfUpdate,
            Self::RemoveShelves(_) => CallKind::ShelfRemoval,
            Self::FetchShelfDetails(_) => CallKind::ShelfLookup,
            Self::AddObstacles(_) | Self::RemoveObstacle(_) => CallKind::ObstacleUpdate,
            Self::RunSimulation { .. } => CallKind::SimulationRun,
            Self::ExitSimulation => CallKind::SimulationExit,
            Self::ResetMap => CallKind::MapReset,
            Self::QueryInventory(_) => CallKind::InventoryQuery,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchLayout => "fetch_layout",
            Self::AddShelves(_) => "add_shelf",
            Self::RemoveShelves(_) => "remove_shelf",
            Self::FetchShelfDetails(_) => "get_shelf_details",
            Self::AddObstacles(_) => "add_obstacle",
            Self::RemoveObstacle(_) => "remove_obstacle",
            Self::RunSimulation { .. } => "run_simulation",
            Self::ExitSimulation => "exit_simulation",
            Self::ResetMap => "reset_map",
            Self::QueryInventory(_) => "query_inventory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Layout(FloorLayout),
    ShelfDetails {
        coord: Coord,
        attributes: Option<ShelfAttributes>,
    },
    Path(Vec<Coord>),
    Inventory(Option<Vec<ShelfLookupEntry>>),
}

/// Result of one dispatched command. Failures carry a short message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub kind: CallKind,
    pub outcome: Result<Reply, String>,
}

impl Completion {
    pub fn ok(kind: CallKind, reply: Reply) -> Self {
        Self {
            kind,
            outcome: Ok(reply),
        }
    }

    pub fn failed(kind: CallKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: Err(message.into()),
        }
    }
}
