//! Controller layer: shell input, worker events, rendering and command orchestration.

pub mod events;
pub mod input;
pub mod orchestration;
pub mod view;
