use std::time::{Duration, Instant};

use client_core::Controller;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{apply_ui_event, UiEvent};
use crate::controller::orchestration::{request_analysis, request_revision};
use crate::ui::clipboard::SystemClipboard;
use crate::ui::panels::{self, PanelAction};

const PAGE_MAX_WIDTH: f32 = 900.0;

pub struct DocAnalyzerApp {
    controller: Controller,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    clipboard: SystemClipboard,
    service_label: String,
    status: String,
}

impl DocAnalyzerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        service_label: impl Into<String>,
    ) -> Self {
        Self {
            controller: Controller::new(),
            cmd_tx,
            ui_rx,
            clipboard: SystemClipboard::default(),
            service_label: service_label.into(),
            status: String::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.controller, event, &mut self.status);
        }
    }

    fn apply_action(&mut self, action: PanelAction, now: Instant) {
        match action {
            PanelAction::Analyze => {
                request_analysis(&mut self.controller, &self.cmd_tx, &mut self.status)
            }
            PanelAction::Revise => {
                request_revision(&mut self.controller, &self.cmd_tx, &mut self.status)
            }
            PanelAction::Copy => {
                if let Err(err) = self.controller.copy_result(&mut self.clipboard, now) {
                    self.status = err.to_string();
                }
            }
            PanelAction::ToggleExpanded => self.controller.toggle_expanded(),
        }
    }

    fn show_page(&mut self, ui: &mut egui::Ui, now: Instant) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        ui.set_max_width(PAGE_MAX_WIDTH);
        ui.spacing_mut().item_spacing = egui::vec2(10.0, 12.0);

        panels::show_header(ui, &self.service_label);
        ui.add_space(12.0);

        actions.extend(panels::show_url_input(ui, &mut self.controller));
        panels::show_status(ui, &self.status);

        if let Some(message) = self.controller.error() {
            panels::show_error(ui, "Analysis Failed", message);
        }
        actions.extend(panels::show_result(ui, &self.controller, now));
        if self.controller.analysis().is_some() {
            panels::show_revised(ui, &self.controller);
        }
        if self.controller.is_loading() {
            panels::show_loading(ui);
        } else if self.controller.analysis().is_none() && self.controller.error().is_none() {
            panels::show_empty_state(ui);
        }

        actions
    }
}

impl eframe::App for DocAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let now = Instant::now();
        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| self.show_page(ui, now)).inner
                    })
                    .inner
            })
            .inner;
        for action in actions {
            self.apply_action(action, now);
        }

        // Backend results arrive over a channel, so keep polling; faster while
        // a spinner or the copied indicator is on screen.
        let animating = self.controller.is_loading()
            || self.controller.is_revising()
            || self.controller.is_copied(now);
        if animating {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
