//! Page rendering (header, element list, footer)

use super::App;
use crate::constants::*;
use crate::page::{self, Element, ElementKind};
use crate::theme;
use crate::types::Screen;
use crate::ui::components::{status_badge, value_row};
use crate::utils::format_age;
use eframe::egui;

fn screen_title(screen: Option<Screen>) -> &'static str {
    match screen {
        Some(Screen::Bootstrapper) => "Bootstrapping",
        Some(Screen::ConsensusBuilder) => "Building Consensus",
        Some(Screen::Wallet { .. }) => "Wallet",
        None => "",
    }
}

fn render_element(ui: &mut egui::Ui, element: &Element) {
    match element.kind {
        ElementKind::Marker => {}
        ElementKind::Button => {
            if !element.value.is_empty() {
                // Opens the whale explanation in the browser GUI; display only here
                ui.add(theme::button(element.value.as_str()));
            }
        }
        ElementKind::Text if element.has_class(CLASS_STATUS) => {
            let color = theme::status_color(element.modifiers().next());
            status_badge(ui, element.label, &element.text, color);
        }
        ElementKind::Text if element.label.is_empty() => {
            if !element.text.is_empty() {
                ui.label(
                    egui::RichText::new(&element.text)
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_SECONDARY),
                );
            }
        }
        ElementKind::Text => value_row(ui, element.label, &element.text, theme::TEXT_PRIMARY),
    }
}

impl App {
    pub fn render_header(&self, ctx: &egui::Context) {
        let screen = page::lock(&self.page).screen;
        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(APP_NAME)
                            .size(theme::FONT_TITLE)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(screen_title(screen))
                                .size(theme::FONT_HEADING)
                                .color(theme::ACCENT),
                        );
                    });
                });
            });
    }

    pub fn render_footer(&self, ctx: &egui::Context) {
        let last_updated = page::lock(&self.page).last_updated;
        egui::TopBottomPanel::bottom("footer")
            .exact_height(theme::FOOTER_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.settings.server_url)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let text = match last_updated {
                            Some(at) => {
                                let age = (chrono::Local::now() - at).num_seconds();
                                format!("Updated {}", format_age(age))
                            }
                            None => "Waiting for server".to_string(),
                        };
                        ui.label(
                            egui::RichText::new(text)
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });
    }

    pub fn render_page(&self, ctx: &egui::Context) {
        let elements = page::lock(&self.page).elements.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(theme::SPACING_LG);
            theme::card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.spacing_mut().item_spacing.y = theme::SPACING_SM;
                for element in &elements {
                    render_element(ui, element);
                }
            });
        });
    }
}
