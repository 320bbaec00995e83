//! Backend-to-UI events and how they land in the controller.

use client_core::{Applied, Controller, ServiceError, Ticket};
use shared::protocol::{AnalyzeResponse, ReviseResponse};

pub enum UiEvent {
    Info(String),
    BackendFailed(String),
    AnalyzeFinished {
        ticket: Ticket,
        outcome: Result<AnalyzeResponse, ServiceError>,
    },
    ReviseFinished {
        ticket: Ticket,
        outcome: Result<ReviseResponse, ServiceError>,
    },
}

pub fn apply_ui_event(controller: &mut Controller, event: UiEvent, status: &mut String) {
    match event {
        UiEvent::Info(message) => {
            *status = message;
        }
        UiEvent::BackendFailed(message) => {
            tracing::error!("{message}");
            *status = message;
        }
        UiEvent::AnalyzeFinished { ticket, outcome } => {
            if controller.finish_analyze(ticket, outcome) == Applied::Stale {
                tracing::debug!(ticket = ticket.get(), "ignored superseded analysis result");
            }
        }
        UiEvent::ReviseFinished { ticket, outcome } => {
            if controller.finish_revise(ticket, outcome) == Applied::Stale {
                tracing::debug!(ticket = ticket.get(), "ignored superseded revision result");
            }
        }
    }
}
