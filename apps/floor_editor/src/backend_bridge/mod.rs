//! Worker side of the shell: a background thread that performs service calls.

pub mod commands;
pub mod runtime;
