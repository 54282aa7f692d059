//! Text rendering of the session for the shell.

use std::io::{self, Write};

use warehouse_core::{FormPurpose, LogEntry, LogLevel, Mode, Session};

pub fn render_grid(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let size = session.grid().size();
    write!(out, "    ")?;
    for col in 0..size {
        write!(out, "{:^3}", col % 100)?;
    }
    writeln!(out)?;

    for (row, tags) in session.overlay().rows().iter().enumerate() {
        write!(out, "{row:>3} ")?;
        for tag in tags {
            if tag.selected {
                write!(out, "[{}]", tag.glyph())?;
            } else {
                write!(out, " {} ", tag.glyph())?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", status_line(session))
}

pub fn status_line(session: &Session) -> String {
    let mut parts = vec![format!("mode: {}", session.mode().name())];
    match session.mode() {
        Mode::Disconnected => parts.push("type 'connect' to load the floor".to_string()),
        Mode::Editing(editing) => {
            parts.push(format!("selected: {}", editing.selection().len()));
            if let Some(form) = editing.shelf_form() {
                let purpose = match form.purpose() {
                    FormPurpose::Add => "add",
                    FormPurpose::Modify => "modify",
                };
                let fields = form.fields();
                parts.push(format!(
                    "shelf form ({purpose}) open for {} cell(s): flower='{}' color='{}' quantity='{}'",
                    form.targets().len(),
                    fields.flower,
                    fields.color,
                    fields.quantity
                ));
            }
        }
        Mode::Simulating(simulation) => {
            let start = simulation
                .start()
                .map_or_else(|| "-".to_string(), |coord| coord.to_string());
            let goals: Vec<String> = simulation.goals().iter().map(ToString::to_string).collect();
            parts.push(format!("start: {start}"));
            parts.push(format!("goals: [{}]", goals.join(", ")));
            if simulation.is_running() {
                parts.push(format!("path: {} steps", simulation.path().len()));
            }
        }
    }

    let pending: Vec<&str> = session.inflight().pending().map(|kind| kind.label()).collect();
    if !pending.is_empty() {
        parts.push(format!("waiting on: {}", pending.join(", ")));
    }
    if session.grid_disabled() {
        parts.push("grid disabled".to_string());
    }
    parts.join(" | ")
}

pub fn format_entry(entry: &LogEntry) -> String {
    let level = match entry.level {
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error => "error",
    };
    format!("[{}] {level}: {}", entry.at.format("%H:%M:%S"), entry.text)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
