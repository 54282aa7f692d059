//! Warehouse floor editing core: the grid store, the session state machine
//! and the overlay compositor.

pub mod commands;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod inflight;
pub mod log;
pub mod overlay;
pub mod selection;
pub mod session;
pub mod shelf_form;
pub mod simulation;
pub mod snapshot;

pub use commands::{CallKind, Completion, Reply, ServiceCommand};
pub use error::{ErrorKind, SessionError, Surface, ValidationError};
pub use grid::{Grid, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
pub use log::{LogEntry, LogLevel, MessageLog, DEFAULT_LOG_CAPACITY};
pub use overlay::{CellTag, Overlay};
pub use session::{ActionKind, Commands, Confirmation, Mode, Session};
pub use shelf_form::{FormPurpose, ShelfFields, ShelfForm};
pub use snapshot::SnapshotKind;
