//! Runs session commands against an [`InventoryService`].

use anyhow::Result;
use client_core::{is_no_path_error, InventoryService};
use shared::protocol::Positions;
use tracing::{debug, warn};

use crate::commands::{Completion, Reply, ServiceCommand};

pub const NO_PATH_MESSAGE: &str = "No path found.";

/// Performs one command and packages the answer for [`crate::Session::complete`].
/// Never fails: transport and service errors become a failed completion.
pub async fn execute(service: &dyn InventoryService, command: ServiceCommand) -> Completion {
    let kind = command.kind();
    let name = command.name();
    debug!(command = name, "dispatching");

    match run(service, command).await {
        Ok(reply) => Completion::ok(kind, reply),
        Err(err) => {
            let message = if is_no_path_error(&err) {
                NO_PATH_MESSAGE.to_string()
            } else {
                format!("{err:#}")
            };
            warn!(command = name, "inventory call failed: {message}");
            Completion::failed(kind, message)
        }
    }
}

async fn run(service: &dyn InventoryService, command: ServiceCommand) -> Result<Reply> {
    match command {
        ServiceCommand::FetchLayout => service.fetch_layout().await.map(Reply::Layout),
        ServiceCommand::AddShelves(placements) => {
            service.add_shelf(&placements).await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::RemoveShelves(coords) => {
            service.remove_shelf(Positions::Many(coords)).await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::FetchShelfDetails(coord) => {
            let attributes = service.get_shelf_attributes(coord).await?;
            Ok(Reply::ShelfDetails { coord, attributes })
        }
        ServiceCommand::AddObstacles(coords) => {
            service.add_obstacle(&coords).await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::RemoveObstacle(coord) => {
            service.remove_obstacle(coord).await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::RunSimulation { start, goals } => {
            service.set_start_goal(start, &goals).await?;
            service.run_simulation(&goals).await.map(Reply::Path)
        }
        ServiceCommand::ExitSimulation => {
            service.exit_simulation().await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::ResetMap => {
            service.reset_map().await?;
            Ok(Reply::Ack)
        }
        ServiceCommand::QueryInventory(coords) => service
            .get_shelf_details(&coords)
            .await
            .map(Reply::Inventory),
    }
}
