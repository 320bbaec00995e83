//! Backend commands queued from UI to backend worker.

use client_core::Ticket;
use shared::protocol::{AnalyzeRequest, ReviseRequest};

pub enum BackendCommand {
    Analyze {
        ticket: Ticket,
        request: AnalyzeRequest,
    },
    Revise {
        ticket: Ticket,
        request: ReviseRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Analyze { .. } => "analyze",
            BackendCommand::Revise { .. } => "revise",
        }
    }
}
