//! Worker-to-shell events and error presentation.

use warehouse_core::{Completion, ErrorKind, SessionError};

pub enum UiEvent {
    Completed(Completion),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Busy,
    Transport,
    Service,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Command,
    ServiceCall,
}

/// Turns a failed connect into advice the user can act on.
pub fn classify_connect_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker failed to start; restart the editor.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Inventory service unreachable; check the server URL and retry connect.".to_string()
    } else {
        format!("Inventory service error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("timed out")
            || lower.contains("connect")
            || lower.contains("network")
            || lower.contains("unreachable")
            || lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if lower.contains("answered")
            || lower.contains("status")
            || lower.contains("no path")
            || lower.contains("unavailable")
        {
            UiErrorCategory::Service
        } else if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_session(err: &SessionError) -> Self {
        let category = match err.kind() {
            ErrorKind::Validation => UiErrorCategory::Validation,
            ErrorKind::ConcurrentOperationRejected => UiErrorCategory::Busy,
            ErrorKind::RemoteCallFailure => {
                return Self::from_message(UiErrorContext::ServiceCall, err.to_string())
            }
        };
        Self {
            category,
            context: UiErrorContext::Command,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Line shown to the user, prefixed like every prompt.
    pub fn prompt_line(&self) -> String {
        match self.category {
            UiErrorCategory::Busy => format!("! busy: {}", self.message),
            _ => format!("! {}", self.message),
        }
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
