//! Page sections. Each renderer only reads controller state and reports what
//! the user clicked; the app applies the action afterwards.

use std::time::Instant;

use client_core::{Controller, ResultStats};
use eframe::egui;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf8, 0x71, 0x71);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(0x4a, 0xde, 0x80);
const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(0xa7, 0x8b, 0xfa);
const COLLAPSED_RESULT_HEIGHT: f32 = 384.0;
const EXPANDED_RESULT_HEIGHT: f32 = 900.0;
const URL_PLACEHOLDER: &str = "https://docs.example.com/api/reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Analyze,
    Revise,
    Copy,
    ToggleExpanded,
}

pub fn show_header(ui: &mut egui::Ui, service_label: &str) {
    ui.vertical_centered(|ui| {
        ui.heading(egui::RichText::new("AI Doc Analyzer").size(32.0).color(ACCENT_COLOR));
        ui.weak("Analyze documentation pages and generate revised drafts.");
        ui.small(format!("Service: {service_label}"));
    });
}

pub fn show_url_input(ui: &mut egui::Ui, controller: &mut Controller) -> Option<PanelAction> {
    let mut action = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong("Documentation URL");

        let response = ui.add(
            egui::TextEdit::singleline(controller.url_input_mut())
                .hint_text(URL_PLACEHOLDER)
                .desired_width(f32::INFINITY),
        );
        let submitted_with_enter =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let label = if controller.is_loading() {
            "Analyzing Documentation..."
        } else {
            "Analyze Documentation"
        };
        let clicked = ui
            .add_enabled(
                controller.can_submit(),
                egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0)),
            )
            .clicked();

        if clicked || (submitted_with_enter && controller.can_submit()) {
            action = Some(PanelAction::Analyze);
        }
    });
    action
}

pub fn show_status(ui: &mut egui::Ui, status: &str) {
    if !status.is_empty() {
        ui.weak(status);
    }
}

pub fn show_error(ui: &mut egui::Ui, title: &str, message: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.colored_label(ERROR_COLOR, "⚠");
            ui.vertical(|ui| {
                ui.colored_label(ERROR_COLOR, egui::RichText::new(title).strong());
                ui.label(message);
            });
        });
    });
}

pub fn show_loading(ui: &mut egui::Ui) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.spinner();
            ui.vertical(|ui| {
                ui.strong("Analyzing Documentation");
                ui.weak("The analysis service is processing the page. This may take a few moments.");
            });
        });
    });
}

pub fn show_empty_state(ui: &mut egui::Ui) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.strong("Ready to Analyze");
            ui.weak("Enter a documentation URL above to get an analysis and a revised draft.");
        });
    });
}

pub fn show_result(ui: &mut egui::Ui, controller: &Controller, now: Instant) -> Option<PanelAction> {
    let analysis = controller.analysis()?;
    let stats = analysis.stats();
    let mut action = None;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.colored_label(SUCCESS_COLOR, "✔");
            ui.strong("Analysis Complete");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let expand_label = if controller.is_expanded() {
                    "Collapse"
                } else {
                    "Expand"
                };
                if ui.button(expand_label).clicked() {
                    action = Some(PanelAction::ToggleExpanded);
                }
                let copy_label = if controller.is_copied(now) {
                    "Copied!"
                } else {
                    "Copy"
                };
                if ui.button(copy_label).clicked() {
                    action = Some(PanelAction::Copy);
                }
            });
        });
        ui.separator();

        let max_height = if controller.is_expanded() {
            EXPANDED_RESULT_HEIGHT
        } else {
            COLLAPSED_RESULT_HEIGHT
        };
        egui::ScrollArea::vertical()
            .id_salt("analysis_result")
            .max_height(max_height)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.label(egui::RichText::new(&analysis.text).monospace());
            });

        if let Some(hint) = controller.full_view_hint() {
            if ui.link(hint).clicked() {
                action = Some(PanelAction::ToggleExpanded);
            }
        }

        ui.separator();
        ui.horizontal_wrapped(|ui| {
            ui.weak(&analysis.url);
            ui.weak(format_stats(&stats));
        });

        ui.add_space(4.0);
        let revise_label = if controller.is_revising() {
            "Revising..."
        } else {
            "Revise Main Doc"
        };
        if ui
            .add_enabled(controller.can_revise(), egui::Button::new(revise_label))
            .clicked()
        {
            action = Some(PanelAction::Revise);
        }
        if controller.is_revising() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Generating a revised draft...");
            });
        }
    });

    action
}

pub fn show_revised(ui: &mut egui::Ui, controller: &Controller) {
    if let Some(message) = controller.revise_error() {
        show_error(ui, "Revision Failed", message);
        return;
    }
    let Some(revised) = controller.revised() else {
        return;
    };

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.colored_label(ACCENT_COLOR, "✎");
            ui.strong("Revised Documentation");
        });
        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("revised_document")
            .max_height(EXPANDED_RESULT_HEIGHT)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.label(egui::RichText::new(revised).monospace());
            });
    });
}

pub fn format_stats(stats: &ResultStats) -> String {
    format!(
        "{} chars · {} lines",
        group_thousands(stats.chars),
        group_thousands(stats.lines)
    )
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
