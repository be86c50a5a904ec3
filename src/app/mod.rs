//! App module - contains the main application state and logic

mod forms;
mod modals;
mod polling;
mod views;

use crate::page::{Page, SharedPage};
use crate::settings::Settings;
use crate::theme;
use crate::transport::{HttpTransport, Transport};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) page: SharedPage,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) settings: Settings,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Cancelled on exit; every poll loop watches it
    pub(crate) cancel_token: CancellationToken,
    pub(crate) polling_started: bool,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons for status dots and the shutdown notice
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            &settings.server_url,
            settings.session_id.clone(),
        ));

        info!(
            server = %settings.server_url,
            session = settings.session_id.is_some(),
            screen = ?settings.start_screen,
            "Connecting to wallet server"
        );

        Self {
            page: Arc::new(Mutex::new(Page::for_screen(settings.start_screen))),
            transport,
            settings,
            runtime: tokio::runtime::Runtime::new().expect("failed to start tokio runtime"),
            cancel_token: CancellationToken::new(),
            polling_started: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }

    /// Stop every poll loop. Called from the window-close hook.
    pub fn stop_polling(&self) {
        self.cancel_token.cancel();
    }
}
