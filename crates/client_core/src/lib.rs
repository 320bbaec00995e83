pub mod clipboard;
pub mod controller;
pub mod error;
pub mod service;

pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use controller::{
    Analysis, AnalyzeCall, AnalyzeState, Applied, Controller, ResultStats, ReviseCall,
    ReviseState, Ticket,
};
pub use error::{ControllerError, ServiceError};
pub use service::{DocService, HttpDocService};
