use serde::{Deserialize, Serialize};

use crate::domain::{Coord, ShelfAttributes};

/// One shelf as listed by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfRecord {
    pub position: [usize; 2],
    #[serde(flatten)]
    pub attributes: ShelfAttributes,
}

impl ShelfRecord {
    pub fn coord(&self) -> Coord {
        Coord::from_pair(self.position)
    }
}

/// Shelf placement as sent to `/add_shelf`: coordinate and stock side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfPlacement {
    pub row: usize,
    pub col: usize,
    #[serde(flatten)]
    pub attributes: ShelfAttributes,
}

impl ShelfPlacement {
    pub fn new(coord: Coord, attributes: ShelfAttributes) -> Self {
        Self {
            row: coord.row,
            col: coord.col,
            attributes,
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

/// Entry of a `/get_shelf` answer. `position` is only present when the whole
/// inventory was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfLookupEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[usize; 2]>,
    #[serde(flatten)]
    pub attributes: ShelfAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Positions {
    One(Coord),
    Many(Vec<Coord>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddShelfRequest {
    pub details: Vec<ShelfPlacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePositionRequest {
    pub position: Positions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddObstacleRequest {
    pub positions: Vec<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfLookupRequest {
    #[serde(rename = "selectedCells")]
    pub selected_cells: Vec<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGoalRequest {
    pub start: Coord,
    pub goal: Coord,
    pub goals: Vec<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSimulationRequest {
    pub goals: Vec<Coord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub path: Vec<[usize; 2]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
