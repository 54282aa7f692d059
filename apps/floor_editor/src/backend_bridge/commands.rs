//! Commands queued from the shell to the backend worker.

use warehouse_core::ServiceCommand;

pub enum BackendCommand {
    Execute(ServiceCommand),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute(command) => command.name(),
            Self::Shutdown => "shutdown",
        }
    }
}
