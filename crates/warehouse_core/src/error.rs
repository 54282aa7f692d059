//! Session error model: what went wrong and where the user gets told.

use shared::domain::{CellState, Coord};
use thiserror::Error;

use crate::commands::CallKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select at least one cell first")]
    NoSelection,
    #[error("select exactly one shelf to modify ({selected} cells selected)")]
    ModifyNeedsSingleCell { selected: usize },
    #[error("cell {0} is not a shelf")]
    NotAShelf(Coord),
    #[error("none of the selected cells can hold a shelf")]
    NoShelfTargets,
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Coord),
    #[error("cell {coord} already holds {state}")]
    OccupiedCell { coord: Coord, state: CellState },
    #[error("set a start point before running the simulation")]
    MissingStart,
    #[error("set at least one goal before running the simulation")]
    MissingGoal,
    #[error("shelf field '{0}' is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    RemoteCallFailure,
    ConcurrentOperationRejected,
}

/// Where an error is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Blocking prompt; the session did not change.
    Prompt,
    MessageLog,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot {action} while {mode}")]
    InvalidMode {
        action: &'static str,
        mode: &'static str,
    },
    #[error("already connected to the inventory service")]
    AlreadyConnected,
    #[error("the grid is busy; wait for the pending operation before trying to {action}")]
    GridDisabled { action: &'static str },
    #[error("{} is already in progress", .0.label())]
    ConcurrentOperationRejected(CallKind),
    #[error("{} failed: {message}", .call.label())]
    RemoteCall { call: CallKind, message: String },
    #[error("path from the service crosses blocked cell {0}")]
    PathRejected(Coord),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidMode { .. } | Self::AlreadyConnected => {
                ErrorKind::Validation
            }
            Self::GridDisabled { .. } | Self::ConcurrentOperationRejected(_) => {
                ErrorKind::ConcurrentOperationRejected
            }
            Self::RemoteCall { .. } | Self::PathRejected(_) => ErrorKind::RemoteCallFailure,
        }
    }

    pub fn surface(&self) -> Surface {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::ConcurrentOperationRejected => Surface::Prompt,
            ErrorKind::RemoteCallFailure => Surface::MessageLog,
        }
    }

    pub(crate) fn remote(call: CallKind, err: impl ToString) -> Self {
        Self::RemoteCall {
            call,
            message: err.to_string(),
        }
    }
}
