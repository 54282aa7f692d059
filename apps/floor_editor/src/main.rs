use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

mod backend_bridge;
mod config;
mod controller;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use client_core::HttpInventoryClient;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;
use warehouse_core::{MessageLog, Session, MAX_GRID_SIZE};

use crate::backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread};
use crate::controller::{events::UiEvent, orchestration::Shell};

#[derive(Parser, Debug)]
#[command(about = "Edit a warehouse floor and preview robot paths")]
struct Args {
    /// Base URL of the inventory service.
    #[arg(long)]
    server_url: Option<String>,
    /// Edge length of the square grid.
    #[arg(long)]
    grid_size: Option<usize>,
    /// Config file to read instead of ./floor_editor.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seconds to wait for the service before giving the prompt back.
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref());
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(grid_size) = args.grid_size {
        ensure!(
            (1..=MAX_GRID_SIZE).contains(&grid_size),
            "--grid-size must be between 1 and {MAX_GRID_SIZE}"
        );
        settings.grid_size = grid_size;
    }
    tracing::info!(
        server_url = %settings.server_url,
        grid_size = settings.grid_size,
        "starting floor editor"
    );

    let client = HttpInventoryClient::new(settings.server_url.clone())
        .context("invalid inventory service url")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let worker = spawn_backend_thread(Arc::new(client), cmd_rx, ui_tx);

    let session = Session::with_log(
        settings.grid_size,
        MessageLog::with_capacity(settings.log_capacity),
    );
    let mut shell =
        Shell::new(session, cmd_tx, ui_rx).with_grid_wait(Duration::from_secs(args.wait_secs));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;
    stdout.flush()?;
    drop(shell);

    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}
