//! Drives a [`Session`] from shell lines and routes its service commands to
//! the backend worker.

use std::{
    io::{self, BufRead, Write},
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use warehouse_core::{
    CallKind, Commands, Completion, Confirmation, LogEntry, Session, SessionError, Surface,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{classify_connect_failure, UiError, UiErrorContext, UiEvent},
    input::{self, ShellCommand, HELP},
    view,
};

pub const DEFAULT_GRID_WAIT: Duration = Duration::from_secs(30);

/// Queues `cmd` for the worker. On failure `status` explains why and false
/// is returned.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued shell->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "backend command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "backend worker disconnected (possible startup/runtime failure); restart the editor"
                .to_string();
            false
        }
    }
}

pub struct Shell {
    session: Session,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    grid_wait: Duration,
    last_echoed: Option<LogEntry>,
}

impl Shell {
    pub fn new(session: Session, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            session,
            cmd_tx,
            ui_rx,
            status: String::new(),
            grid_wait: DEFAULT_GRID_WAIT,
            last_echoed: None,
        }
    }

    pub fn with_grid_wait(mut self, grid_wait: Duration) -> Self {
        self.grid_wait = grid_wait;
        self
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads commands until `quit` or end of input, then stops the worker.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Warehouse floor editor. Type 'help' for commands.")?;
        view::render_grid(&self.session, out)?;

        let mut lines = input.lines();
        loop {
            self.drain_events(out)?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let command = match input::parse(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(ShellCommand::Restart) => {
                    write!(
                        out,
                        "Restart the map? Every obstacle and shelf will be removed. [y/N] "
                    )?;
                    out.flush()?;
                    let answer = lines.next().transpose()?.unwrap_or_default();
                    let confirmation = if input::is_yes(&answer) {
                        Confirmation::Confirmed
                    } else {
                        Confirmation::Declined
                    };
                    let result = self.session.restart_map(confirmation);
                    if let Err(err) = self.apply(result) {
                        self.report(&err, out)?;
                    }
                    self.finish_command(out)?;
                    continue;
                }
                Ok(command) => command,
                Err(message) => {
                    writeln!(out, "! {message}")?;
                    continue;
                }
            };

            match command {
                ShellCommand::Help => writeln!(out, "{HELP}")?,
                ShellCommand::Log => {
                    for entry in self.session.log().entries() {
                        writeln!(out, "{}", view::format_entry(entry))?;
                    }
                }
                command => {
                    let result = self.execute(command, out)?;
                    if let Err(err) = self.apply(result) {
                        self.report(&err, out)?;
                    }
                    self.finish_command(out)?;
                }
            }
        }

        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
        Ok(())
    }

    fn execute(
        &mut self,
        command: ShellCommand,
        out: &mut impl Write,
    ) -> io::Result<Result<Commands, SessionError>> {
        let session = &mut self.session;
        let result = match command {
            ShellCommand::Connect => session.connect(),
            ShellCommand::Click(coord) => session.click(coord).map(|()| Commands::new()),
            ShellCommand::Select(coord) => {
                if !session.toggle_select(coord) {
                    writeln!(out, "! cell {coord} cannot be selected right now")?;
                }
                Ok(Commands::new())
            }
            ShellCommand::Action(action) => session.apply_action(action),
            ShellCommand::Form(fields) => {
                let fields = match session.shelf_form() {
                    Some(form) => fields.filled_from(form.fields()),
                    None => fields,
                };
                session.commit_shelf_form(&fields)
            }
            ShellCommand::Cancel => session.cancel_shelf_form().map(|()| Commands::new()),
            ShellCommand::Simulate => session.enter_simulation().map(|()| Commands::new()),
            ShellCommand::Start(coord) => session.place_start(coord).map(|placed| {
                if !placed {
                    tracing::info!("start already placed; ignoring");
                }
                Commands::new()
            }),
            ShellCommand::Goal(coord) => session.toggle_goal(coord).map(|_| Commands::new()),
            ShellCommand::Run => session.start_simulation_run(),
            ShellCommand::Exit => session.exit_simulation(),
            ShellCommand::Inventory => session.query_inventory(),
            ShellCommand::Resize(size) => {
                session.resize(size);
                Ok(Commands::new())
            }
            ShellCommand::Show
            | ShellCommand::Restart
            | ShellCommand::Log
            | ShellCommand::Help
            | ShellCommand::Quit => Ok(Commands::new()),
        };
        Ok(result)
    }

    /// Queues the commands of a successful transition. A command that cannot
    /// be queued is completed as failed so its guard slot is released.
    fn apply(&mut self, result: Result<Commands, SessionError>) -> Result<(), SessionError> {
        for command in result? {
            let kind = command.kind();
            let queued = dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::Execute(command),
                &mut self.status,
            );
            if !queued {
                let _ = self
                    .session
                    .complete(Completion::failed(kind, self.status.clone()));
            }
        }
        Ok(())
    }

    fn finish_command(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.await_grid(out)?;
        if !self.status.is_empty() {
            writeln!(out, "! {}", std::mem::take(&mut self.status))?;
        }
        self.echo_log(out)?;
        view::render_grid(&self.session, out)
    }

    /// Blocks while a call the grid depends on is outstanding, up to the
    /// configured wait.
    fn await_grid(&mut self, out: &mut impl Write) -> io::Result<()> {
        let deadline = Instant::now() + self.grid_wait;
        while self.session.inflight().blocks_grid() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.ui_rx.recv_timeout(remaining) {
                Ok(event) => self.handle_event(event, out)?,
                Err(RecvTimeoutError::Timeout) => {
                    writeln!(
                        out,
                        "! still waiting on the inventory service; the grid stays disabled"
                    )?;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.status = "backend worker stopped".to_string();
                    break;
                }
            }
        }
        Ok(())
    }

    fn drain_events(&mut self, out: &mut impl Write) -> io::Result<()> {
        let mut handled = false;
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event, out)?;
            handled = true;
        }
        if handled {
            self.echo_log(out)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: UiEvent, out: &mut impl Write) -> io::Result<()> {
        match event {
            UiEvent::Completed(completion) => {
                let kind = completion.kind;
                if let Err(err) = self.session.complete(completion) {
                    if kind == CallKind::Connect {
                        if let SessionError::RemoteCall { message, .. } = &err {
                            writeln!(out, "! {}", classify_connect_failure(message))?;
                        }
                    }
                    self.report(&err, out)?;
                }
            }
            UiEvent::Error(err) => {
                if err.context() == UiErrorContext::BackendStartup {
                    tracing::error!("{}", err.message());
                }
                writeln!(out, "{}", err.prompt_line())?;
            }
        }
        Ok(())
    }

    /// Prompt-class errors are printed at once; the rest already went to the
    /// message log.
    fn report(&mut self, err: &SessionError, out: &mut impl Write) -> io::Result<()> {
        match err.surface() {
            Surface::Prompt => writeln!(out, "{}", UiError::from_session(err).prompt_line()),
            Surface::MessageLog => {
                tracing::debug!("reported through message log: {err}");
                Ok(())
            }
        }
    }

    /// Prints log entries added since the last echo.
    fn echo_log(&mut self, out: &mut impl Write) -> io::Result<()> {
        let entries: Vec<&LogEntry> = self.session.log().entries().collect();
        let start = self
            .last_echoed
            .as_ref()
            .and_then(|seen| entries.iter().rposition(|entry| *entry == seen))
            .map_or(0, |idx| idx + 1);
        for entry in &entries[start..] {
            writeln!(out, "{}", view::format_entry(entry))?;
        }
        self.last_echoed = entries.last().map(|entry| (*entry).clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
