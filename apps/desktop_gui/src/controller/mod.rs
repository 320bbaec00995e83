//! Controller layer: backend events and command orchestration around `client_core::Controller`.

pub mod events;
pub mod orchestration;
