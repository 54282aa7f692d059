use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based `(row, col)` address of a floor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn from_pair([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }

    pub fn to_pair(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    Shelf,
    Start,
    Goal,
}

impl CellState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Obstacle => "obstacle",
            Self::Shelf => "shelf",
            Self::Start => "start",
            Self::Goal => "goal",
        }
    }

    /// Start and goal only exist while simulating.
    pub fn is_marker(self) -> bool {
        matches!(self, Self::Start | Self::Goal)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock metadata kept by the inventory service for one shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfAttributes {
    pub flower: String,
    pub color: String,
    pub quantity: Quantity,
}

/// Shelf quantity exactly as the service stores it. Form input arrives as
/// text and is never coerced, so `"2.5"` and `-3` both survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for ShelfAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} {}", self.quantity, self.color, self.flower)
    }
}
