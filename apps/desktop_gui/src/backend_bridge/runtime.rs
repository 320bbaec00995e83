//! Backend worker: owns the tokio runtime and performs service calls off the UI thread.

use std::{sync::Arc, thread};

use client_core::{DocService, HttpDocService};
use crossbeam_channel::{Receiver, Sender};
use shared::endpoints::ServiceEndpoints;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(endpoints: ServiceEndpoints, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let service: Arc<dyn DocService> = Arc::new(HttpDocService::new(endpoints));
    thread::spawn(move || run_worker(service, cmd_rx, ui_tx));
}

pub(crate) fn run_worker(
    service: Arc<dyn DocService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                "backend worker startup failure: failed to build runtime: {err}"
            )));
            return;
        }
    };
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    // Each command gets its own task so a slow analysis never holds up a
    // revision (or a newer analysis) queued behind it.
    while let Ok(cmd) = cmd_rx.recv() {
        let service = Arc::clone(&service);
        let ui_tx = ui_tx.clone();
        runtime.spawn(async move {
            let event = match cmd {
                BackendCommand::Analyze { ticket, request } => UiEvent::AnalyzeFinished {
                    ticket,
                    outcome: service.analyze(&request).await,
                },
                BackendCommand::Revise { ticket, request } => UiEvent::ReviseFinished {
                    ticket,
                    outcome: service.revise(&request).await,
                },
            };
            if ui_tx.send(event).is_err() {
                tracing::debug!("ui event receiver dropped; discarding backend result");
            }
        });
    }

    tracing::info!("ui command channel closed; backend worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use client_core::{Controller, ServiceError};
    use crossbeam_channel::bounded;
    use serde_json::json;
    use shared::protocol::{AnalyzeRequest, AnalyzeResponse, ReviseRequest, ReviseResponse};
    use std::time::Duration;

    struct EchoService;

    #[async_trait]
    impl DocService for EchoService {
        async fn analyze(
            &self,
            request: &AnalyzeRequest,
        ) -> Result<AnalyzeResponse, ServiceError> {
            Ok(AnalyzeResponse {
                analysis: format!("analysis of {}", request.url),
                content: json!("C"),
            })
        }

        async fn revise(&self, _request: &ReviseRequest) -> Result<ReviseResponse, ServiceError> {
            Err(ServiceError::Transport("revise offline".to_string()))
        }
    }

    #[test]
    fn worker_round_trips_commands_into_ui_events() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let worker = thread::spawn(move || run_worker(Arc::new(EchoService), cmd_rx, ui_tx));

        let mut controller = Controller::new();
        controller.set_url_input("https://docs.example.com");
        let call = controller.begin_analyze().expect("begin");
        cmd_tx
            .send(BackendCommand::Analyze {
                ticket: call.ticket,
                request: call.request,
            })
            .expect("send");

        let mut analyzed = false;
        while !analyzed {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("ui event") {
                UiEvent::AnalyzeFinished { ticket, outcome } => {
                    controller.finish_analyze(ticket, outcome);
                    analyzed = true;
                }
                UiEvent::Info(_) => {}
                _ => panic!("unexpected event"),
            }
        }
        assert_eq!(controller.result(), Some("analysis of https://docs.example.com"));

        let revise = controller.begin_revise().expect("revise");
        cmd_tx
            .send(BackendCommand::Revise {
                ticket: revise.ticket,
                request: revise.request,
            })
            .expect("send");
        match ui_rx.recv_timeout(Duration::from_secs(5)).expect("ui event") {
            UiEvent::ReviseFinished { ticket, outcome } => {
                controller.finish_revise(ticket, outcome);
            }
            _ => panic!("expected revise result"),
        }
        assert!(controller
            .revise_error()
            .expect("revise error")
            .contains("revise offline"));

        drop(cmd_tx);
        worker.join().expect("worker exits when commands close");
    }
}
