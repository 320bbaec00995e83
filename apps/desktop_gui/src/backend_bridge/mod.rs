//! Bridge between the egui thread and the async service client.

pub mod commands;
pub mod runtime;
