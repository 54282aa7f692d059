//! Runtime bridge between the shell command queue and the inventory service.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::InventoryService;
use crossbeam_channel::{Receiver, Sender};
use warehouse_core::dispatch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Runs queued commands one at a time, in arrival order, on a dedicated
/// tokio runtime. Each result goes back as [`UiEvent::Completed`].
pub fn spawn_backend_thread(
    service: Arc<dyn InventoryService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::debug!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let command = match cmd {
                    BackendCommand::Execute(command) => command,
                    BackendCommand::Shutdown => break,
                };
                let completion = dispatch::execute(service.as_ref(), command).await;
                if ui_tx.send(UiEvent::Completed(completion)).is_err() {
                    tracing::warn!("shell went away; stopping backend worker");
                    break;
                }
            }
            tracing::debug!("backend worker stopped");
        });
    })
}
