use std::{fs, path::Path};

use warehouse_core::{DEFAULT_GRID_SIZE, DEFAULT_LOG_CAPACITY, MAX_GRID_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = "floor_editor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub grid_size: usize,
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            grid_size: DEFAULT_GRID_SIZE,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Defaults, then the config file, then environment overrides. Command-line
/// flags are applied by the caller on top.
pub fn load_settings(config_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw),
        Err(err) if config_path.is_some() => {
            tracing::warn!(path = %path.display(), "config file not read: {err}");
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<toml::Table>(raw) {
        Ok(table) => table,
        Err(err) => {
            tracing::warn!("ignoring malformed config file: {err}");
            return;
        }
    };

    if let Some(v) = file_cfg.get("server_url").and_then(value_text) {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.get("grid_size").and_then(value_text) {
        set_grid_size(&mut settings.grid_size, &v);
    }
    if let Some(v) = file_cfg.get("log_capacity").and_then(value_text) {
        set_count(&mut settings.log_capacity, &v);
    }
}

fn value_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Integer(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("FLOOR_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("FLOOR_GRID_SIZE") {
        set_grid_size(&mut settings.grid_size, &v);
    }
    if let Some(v) = lookup("APP__GRID_SIZE") {
        set_grid_size(&mut settings.grid_size, &v);
    }

    if let Some(v) = lookup("APP__LOG_CAPACITY") {
        set_count(&mut settings.log_capacity, &v);
    }
}

/// Unparseable or zero values leave the current setting alone.
fn set_count(target: &mut usize, raw: &str) {
    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => *target = parsed,
        _ => tracing::warn!(value = raw, "ignoring invalid numeric setting"),
    }
}

fn set_grid_size(target: &mut usize, raw: &str) {
    match raw.trim().parse::<usize>() {
        Ok(parsed) if (1..=MAX_GRID_SIZE).contains(&parsed) => *target = parsed,
        _ => tracing::warn!(
            value = raw,
            max = MAX_GRID_SIZE,
            "ignoring out-of-range grid size"
        ),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
