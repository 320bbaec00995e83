mod backend_bridge;
mod config;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::StartupConfig;
use crate::controller::events::UiEvent;
use crate::ui::DocAnalyzerApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let startup = StartupConfig::from_env();
    let endpoints = startup.endpoints()?;
    let service_label = endpoints.to_string();
    tracing::info!(service = %service_label, "starting desktop analyzer");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(endpoints, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AI Doc Analyzer")
            .with_inner_size([1024.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "AI Doc Analyzer",
        options,
        Box::new(move |_cc| Ok(Box::new(DocAnalyzerApp::new(cmd_tx, ui_rx, service_label)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))?;
    Ok(())
}
