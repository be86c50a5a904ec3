//! Shutdown notice shown once the heartbeat is lost

use super::App;
use crate::constants::*;
use crate::theme;
use eframe::egui;

impl App {
    pub fn render_shutdown_notice(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |_ui| {});

        egui::Area::new(egui::Id::new("shutdown_notice"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                theme::modal_frame().show(ui, |ui| {
                    ui.set_width(theme::MODAL_WIDTH);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::POWER)
                                .size(32.0)
                                .color(theme::status_color(Some("red"))),
                        );
                        ui.add_space(theme::SPACING_MD);
                        ui.label(
                            egui::RichText::new(SHUTDOWN_TITLE.to_uppercase())
                                .size(theme::FONT_HEADING)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        );
                        ui.add_space(theme::SPACING_SM);
                        ui.label(
                            egui::RichText::new(SHUTDOWN_MESSAGE)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_MUTED),
                        );
                    });
                });
            });
    }
}
