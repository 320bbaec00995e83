//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{Controller, ServiceError};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Err(
            "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string(),
        ),
    }
}

/// Starts an analysis and queues it. A command that cannot be queued is
/// finished on the spot as a failure so the loading state never sticks.
pub fn request_analysis(
    controller: &mut Controller,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) {
    let call = match controller.begin_analyze() {
        Ok(call) => call,
        Err(err) => {
            *status = err.to_string();
            return;
        }
    };
    let ticket = call.ticket;
    let cmd = BackendCommand::Analyze {
        ticket,
        request: call.request,
    };
    if let Err(reason) = dispatch_backend_command(cmd_tx, cmd) {
        controller.finish_analyze(ticket, Err(ServiceError::Transport(reason.clone())));
        *status = reason;
    }
}

pub fn request_revision(
    controller: &mut Controller,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) {
    let Some(call) = controller.begin_revise() else {
        return;
    };
    let ticket = call.ticket;
    let cmd = BackendCommand::Revise {
        ticket,
        request: call.request,
    };
    if let Err(reason) = dispatch_backend_command(cmd_tx, cmd) {
        controller.finish_revise(ticket, Err(ServiceError::Transport(reason.clone())));
        *status = reason;
    }
}
