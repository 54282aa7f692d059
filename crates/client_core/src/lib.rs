use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use shared::{
    domain::{Coord, ShelfAttributes},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{
        AddObstacleRequest, AddShelfRequest, MessageResponse, Positions, RemovePositionRequest,
        RunSimulationRequest, ShelfLookupEntry, ShelfLookupRequest, ShelfPlacement, ShelfRecord,
        SimulationResponse, StartGoalRequest,
    },
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no path found")]
    NoPath,
    #[error("server returned a path step with {len} coordinates, expected 2")]
    MalformedPathStep { len: usize },
    #[error("invalid inventory server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

/// Obstacles and shelves the service knows about, as loaded on connect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorLayout {
    pub obstacles: Vec<Coord>,
    pub shelves: Vec<ShelfRecord>,
}

/// Remote inventory and pathfinding service holding the authoritative floor.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn fetch_obstacles(&self) -> Result<Vec<Coord>>;
    async fn fetch_shelves(&self) -> Result<Vec<ShelfRecord>>;
    async fn add_shelf(&self, placements: &[ShelfPlacement]) -> Result<()>;
    async fn remove_shelf(&self, positions: Positions) -> Result<()>;
    /// `None` when any requested cell is not a shelf. An empty `coords` list
    /// asks for the whole inventory.
    async fn get_shelf_details(&self, coords: &[Coord]) -> Result<Option<Vec<ShelfLookupEntry>>>;
    async fn add_obstacle(&self, coords: &[Coord]) -> Result<()>;
    async fn remove_obstacle(&self, coord: Coord) -> Result<()>;
    async fn set_start_goal(&self, start: Coord, goals: &[Coord]) -> Result<()>;
    /// Fails with [`InventoryError::NoPath`] when the goals are unreachable.
    async fn run_simulation(&self, goals: &[Coord]) -> Result<Vec<Coord>>;
    async fn exit_simulation(&self) -> Result<()>;
    async fn reset_map(&self) -> Result<()>;

    async fn fetch_layout(&self) -> Result<FloorLayout> {
        let (obstacles, shelves) =
            futures::try_join!(self.fetch_obstacles(), self.fetch_shelves())?;
        Ok(FloorLayout { obstacles, shelves })
    }

    async fn get_shelf_attributes(&self, coord: Coord) -> Result<Option<ShelfAttributes>> {
        let entries = self.get_shelf_details(&[coord]).await?;
        Ok(entries.and_then(|entries| entries.into_iter().next().map(|entry| entry.attributes)))
    }
}

pub struct HttpInventoryClient {
    http: Client,
    server_url: String,
}

impl HttpInventoryClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into();
        let parsed = Url::parse(&server_url).map_err(|err| InventoryError::InvalidServerUrl {
            url: server_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(InventoryError::InvalidServerUrl {
                url: server_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }
            .into());
        }

        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn post_ack<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> Result<()> {
        let response = self
            .http
            .post(format!("{}{route}", self.server_url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to reach inventory service at {route}"))?;
        let ack: MessageResponse = ensure_success(response).await?.json().await.unwrap_or_default();
        debug!(route, message = ack.message.as_deref().unwrap_or(""), "inventory ack");
        Ok(())
    }

    async fn post_empty(&self, route: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}{route}", self.server_url))
            .send()
            .await
            .with_context(|| format!("failed to reach inventory service at {route}"))?;
        ensure_success(response).await?;
        debug!(route, "inventory ack");
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
        let code = if status == StatusCode::NOT_FOUND {
            ErrorCode::NotFound
        } else {
            ErrorCode::Internal
        };
        ApiError::new(code, format!("inventory service answered {status}"))
    });
    Err(ApiException::from(error).into())
}

fn path_from_steps(steps: Vec<[usize; 2]>) -> Vec<Coord> {
    steps.into_iter().map(Coord::from_pair).collect()
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn fetch_obstacles(&self) -> Result<Vec<Coord>> {
        let response = self
            .http
            .get(format!("{}/connect_obs", self.server_url))
            .send()
            .await
            .context("failed to connect to inventory service")?;
        let obstacles: Vec<Coord> = ensure_success(response).await?.json().await?;
        Ok(obstacles)
    }

    async fn fetch_shelves(&self) -> Result<Vec<ShelfRecord>> {
        let response = self
            .http
            .get(format!("{}/connect_shel", self.server_url))
            .send()
            .await
            .context("failed to connect to inventory service")?;
        let shelves: Vec<ShelfRecord> = ensure_success(response).await?.json().await?;
        Ok(shelves)
    }

    async fn add_shelf(&self, placements: &[ShelfPlacement]) -> Result<()> {
        info!(count = placements.len(), "inventory: add_shelf");
        self.post_ack(
            "/add_shelf",
            &AddShelfRequest {
                details: placements.to_vec(),
            },
        )
        .await
    }

    async fn remove_shelf(&self, positions: Positions) -> Result<()> {
        info!("inventory: remove_shelf");
        self.post_ack("/remove_shelf", &RemovePositionRequest { position: positions })
            .await
    }

    async fn get_shelf_details(&self, coords: &[Coord]) -> Result<Option<Vec<ShelfLookupEntry>>> {
        let response = self
            .http
            .post(format!("{}/get_shelf", self.server_url))
            .json(&ShelfLookupRequest {
                selected_cells: coords.to_vec(),
            })
            .send()
            .await
            .context("failed to reach inventory service at /get_shelf")?;
        let entries: Option<Vec<ShelfLookupEntry>> = ensure_success(response).await?.json().await?;
        Ok(entries)
    }

    async fn add_obstacle(&self, coords: &[Coord]) -> Result<()> {
        info!(count = coords.len(), "inventory: add_obstacle");
        self.post_ack(
            "/add_obstacle",
            &AddObstacleRequest {
                positions: coords.to_vec(),
            },
        )
        .await
    }

    async fn remove_obstacle(&self, coord: Coord) -> Result<()> {
        info!(row = coord.row, col = coord.col, "inventory: remove_obstacle");
        self.post_ack(
            "/remove_obstacle",
            &RemovePositionRequest {
                position: Positions::One(coord),
            },
        )
        .await
    }

    async fn set_start_goal(&self, start: Coord, goals: &[Coord]) -> Result<()> {
        let goal = *goals
            .last()
            .ok_or_else(|| anyhow!("set_start_goal requires at least one goal"))?;
        self.post_ack(
            "/set_start_goal",
            &StartGoalRequest {
                start,
                goal,
                goals: goals.to_vec(),
            },
        )
        .await
    }

    async fn run_simulation(&self, goals: &[Coord]) -> Result<Vec<Coord>> {
        let response = self
            .http
            .post(format!("{}/run_simulation", self.server_url))
            .json(&RunSimulationRequest {
                goals: goals.to_vec(),
            })
            .send()
            .await
            .context("failed to reach inventory service at /run_simulation")?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("inventory: run_simulation found no path");
            return Err(InventoryError::NoPath.into());
        }

        let body: serde_json::Value = ensure_success(response).await?.json().await?;
        let steps = body
            .get("path")
            .and_then(serde_json::Value::as_array)
            .ok_or(InventoryError::NoPath)?;
        for step in steps {
            let len = step.as_array().map_or(0, Vec::len);
            if len != 2 {
                return Err(InventoryError::MalformedPathStep { len }.into());
            }
        }
        let response: SimulationResponse = serde_json::from_value(body)?;
        Ok(path_from_steps(response.path))
    }

    async fn exit_simulation(&self) -> Result<()> {
        self.post_empty("/exit_simulation").await
    }

    async fn reset_map(&self) -> Result<()> {
        info!("inventory: reset_map");
        self.post_empty("/reset_map").await
    }
}

/// True when `err` is the service reporting that no path exists.
pub fn is_no_path_error(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<InventoryError>(), Some(InventoryError::NoPath))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
