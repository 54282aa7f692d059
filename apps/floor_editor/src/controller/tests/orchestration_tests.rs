use std::{io::Cursor, sync::Arc, sync::Mutex, thread::JoinHandle};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::InventoryService;
use crossbeam_channel::bounded;
use shared::{
    domain::{CellState, Coord, ShelfAttributes},
    protocol::{Positions, ShelfLookupEntry, ShelfPlacement, ShelfRecord},
};
use warehouse_core::{ServiceCommand, Session};

use super::*;
use crate::backend_bridge::runtime::spawn_backend_thread;

#[derive(Default)]
struct FakeService {
    refuse_connect: bool,
    shelves: Vec<ShelfRecord>,
    calls: Mutex<Vec<&'static str>>,
    placed: Mutex<Vec<ShelfPlacement>>,
}

impl FakeService {
    fn record(&self, call: &'static str) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl InventoryService for FakeService {
    async fn fetch_obstacles(&self) -> Result<Vec<Coord>> {
        if self.refuse_connect {
            return Err(anyhow!("failed to connect to inventory service"));
        }
        Ok(vec![Coord::new(4, 4)])
    }

    async fn fetch_shelves(&self) -> Result<Vec<ShelfRecord>> {
        Ok(self.shelves.clone())
    }

    async fn add_shelf(&self, placements: &[ShelfPlacement]) -> Result<()> {
        self.record("add_shelf");
        self.placed
            .lock()
            .expect("placed lock")
            .extend_from_slice(placements);
        Ok(())
    }

    async fn remove_shelf(&self, _positions: Positions) -> Result<()> {
        self.record("remove_shelf");
        Ok(())
    }

    async fn get_shelf_details(&self, coords: &[Coord]) -> Result<Option<Vec<ShelfLookupEntry>>> {
        let entries: Vec<ShelfLookupEntry> = self
            .shelves
            .iter()
            .filter(|shelf| coords.contains(&shelf.coord()))
            .map(|shelf| ShelfLookupEntry {
                position: Some(shelf.position),
                attributes: shelf.attributes.clone(),
            })
            .collect();
        Ok((!entries.is_empty()).then_some(entries))
    }

    async fn add_obstacle(&self, _coords: &[Coord]) -> Result<()> {
        self.record("add_obstacle");
        Ok(())
    }

    async fn remove_obstacle(&self, _coord: Coord) -> Result<()> {
        self.record("remove_obstacle");
        Ok(())
    }

    async fn set_start_goal(&self, _start: Coord, _goals: &[Coord]) -> Result<()> {
        self.record("set_start_goal");
        Ok(())
    }

    async fn run_simulation(&self, goals: &[Coord]) -> Result<Vec<Coord>> {
        self.record("run_simulation");
        let goal = goals.last().copied().unwrap_or(Coord::new(0, 0));
        Ok((0..=goal.col).map(|col| Coord::new(0, col)).collect())
    }

    async fn exit_simulation(&self) -> Result<()> {
        self.record("exit_simulation");
        Ok(())
    }

    async fn reset_map(&self) -> Result<()> {
        self.record("reset_map");
        Ok(())
    }
}

fn start_shell(service: Arc<FakeService>, grid_size: usize) -> (Shell, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
    let worker = spawn_backend_thread(service, cmd_rx, ui_tx);
    let shell = Shell::new(Session::new(grid_size), cmd_tx, ui_rx)
        .with_grid_wait(Duration::from_secs(5));
    (shell, worker)
}

fn run_script(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    shell
        .run(Cursor::new(script.as_bytes().to_vec()), &mut out)
        .expect("shell run");
    String::from_utf8(out).expect("utf8 output")
}

fn stop(shell: Shell, worker: JoinHandle<()>) {
    drop(shell);
    worker.join().expect("worker joined");
}

#[test]
fn edit_and_simulate_through_worker() {
    let service = Arc::new(FakeService::default());
    let (mut shell, worker) = start_shell(service.clone(), 6);

    let output = run_script(
        &mut shell,
        "connect\nselect 2 3\nadd-obstacle\nsimulate\nclick 0 0\nclick 0 2\nrun\nquit\n",
    );

    assert!(output.contains("info: Connected to backend successfully."));
    assert!(output.contains("info: add obstacle applied to selected cells."));
    assert!(output.contains("Simulation completed. Path: [[0,0],[0,1],[0,2]]"));

    let session = shell.session();
    assert!(session.grid().is(Coord::new(4, 4), CellState::Obstacle));
    assert!(session.grid().is(Coord::new(2, 3), CellState::Obstacle));
    let simulation = session.simulation().expect("simulating");
    assert!(simulation.is_running());

    stop(shell, worker);
    assert_eq!(
        service.calls(),
        vec!["add_obstacle", "set_start_goal", "run_simulation"]
    );
}

#[test]
fn modify_form_keeps_shown_values_for_omitted_fields() {
    let service = Arc::new(FakeService {
        shelves: vec![ShelfRecord {
            position: [1, 1],
            attributes: ShelfAttributes {
                flower: "rose".to_string(),
                color: "white".to_string(),
                quantity: "2.5".into(),
            },
        }],
        ..FakeService::default()
    });
    let (mut shell, worker) = start_shell(service.clone(), 4);

    let output = run_script(
        &mut shell,
        "connect\nselect 1 1\nmodify-shelf\nform - - 7\nquit\n",
    );

    assert!(output.contains("quantity='2.5'"));
    assert!(!output.contains("is required"));
    assert!(shell.session().shelf_form().is_none());

    stop(shell, worker);
    let placed = service.placed.lock().expect("placed lock").clone();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].attributes.flower, "rose");
    assert_eq!(placed[0].attributes.color, "white");
    assert_eq!(placed[0].attributes.quantity.to_string(), "7");
}

#[test]
fn validation_errors_print_as_prompts() {
    let service = Arc::new(FakeService::default());
    let (mut shell, worker) = start_shell(service, 4);

    let output = run_script(&mut shell, "connect\nadd-obstacle\nrun\nfly\nquit\n");

    assert!(output.contains("! select at least one cell first"));
    assert!(output.contains("! cannot run the simulation while editing"));
    assert!(output.contains("! unknown command 'fly'; type 'help'"));
    stop(shell, worker);
}

#[test]
fn restart_asks_for_confirmation() {
    let service = Arc::new(FakeService::default());
    let (mut shell, worker) = start_shell(service.clone(), 6);

    let output = run_script(
        &mut shell,
        "connect\nrestart\nn\nshow\nrestart\ny\nquit\n",
    );

    assert!(output.contains("[y/N]"));
    assert!(output.contains("info: Map has been restarted."));
    assert_eq!(shell.session().grid().count(CellState::Obstacle), 0);
    assert_eq!(shell.session().log().len(), 1);

    stop(shell, worker);
    assert_eq!(service.calls(), vec!["reset_map"]);
}

#[test]
fn unreachable_service_gets_a_hint() {
    let service = Arc::new(FakeService {
        refuse_connect: true,
        ..FakeService::default()
    });
    let (mut shell, worker) = start_shell(service, 4);

    let output = run_script(&mut shell, "connect\nquit\n");

    assert!(output.contains(
        "! Inventory service unreachable; check the server URL and retry connect."
    ));
    assert!(output.contains("error: connect failed: failed to connect to inventory service"));
    assert!(!shell.session().is_connected());
    stop(shell, worker);
}

#[test]
fn dispatch_reports_stopped_worker() {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
    let mut status = String::new();

    assert!(dispatch_backend_command(
        &cmd_tx,
        BackendCommand::Execute(ServiceCommand::ResetMap),
        &mut status
    ));
    assert!(!dispatch_backend_command(
        &cmd_tx,
        BackendCommand::Execute(ServiceCommand::ExitSimulation),
        &mut status
    ));
    assert_eq!(status, "backend command queue is full; please retry");

    drop(cmd_rx);
    assert!(!dispatch_backend_command(
        &cmd_tx,
        BackendCommand::Shutdown,
        &mut status
    ));
    assert!(status.starts_with("backend worker disconnected"));
}
