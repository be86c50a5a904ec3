//! Reusable UI components
//!
//! Small widgets used by the page views.

use crate::theme;
use eframe::egui;

/// A label column followed by a value, e.g. "Block height    1200".
pub fn value_row(ui: &mut egui::Ui, label: &str, value: &str, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LABEL_WIDTH, 0.0],
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            ),
        );
        let value = if value.trim().is_empty() { "…" } else { value.trim() };
        ui.label(
            egui::RichText::new(value)
                .size(theme::FONT_BODY)
                .color(color)
                .monospace(),
        );
    });
}

/// Colored dot + status text, used for the sync status.
pub fn status_badge(ui: &mut egui::Ui, label: &str, status: &str, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LABEL_WIDTH, 0.0],
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            ),
        );
        ui.label(
            egui::RichText::new(egui_phosphor::regular::CIRCLE)
                .size(theme::FONT_SMALL)
                .color(color),
        );
        ui.label(egui::RichText::new(status).size(theme::FONT_BODY).color(color));
    });
}
